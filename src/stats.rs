//! Per-author message statistics

use crate::core::event::EventTable;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Activity of one chatter across the whole table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatterStats {
    pub author: String,
    pub message_count: usize,
    /// Distinct non-empty message texts
    pub unique_messages: usize,
}

/// Chatters ranked by message count, ties by author name
pub fn chatter_leaderboard(table: &EventTable) -> Vec<ChatterStats> {
    let mut per_author: HashMap<&str, (usize, HashSet<&str>)> = HashMap::new();
    for event in table.iter() {
        let (count, texts) = per_author.entry(event.author.as_str()).or_default();
        *count += 1;
        if let Some(text) = event.message.as_deref().filter(|t| !t.is_empty()) {
            texts.insert(text);
        }
    }

    let mut board: Vec<ChatterStats> = per_author
        .into_iter()
        .map(|(author, (message_count, texts))| ChatterStats {
            author: author.to_string(),
            message_count,
            unique_messages: texts.len(),
        })
        .collect();
    board.sort_by(|a, b| {
        (Reverse(a.message_count), &a.author).cmp(&(Reverse(b.message_count), &b.author))
    });
    board
}

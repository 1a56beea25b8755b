use chat_peaks::ingest::load_csv;
use chat_peaks::prelude::*;
use chat_peaks::report::{peak_rows, render_rows, OutputFormat};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A 20 minute export: steady trickle of chat, bot noise, and two reactions
fn write_export() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "time,user_name,user_color,message").unwrap();
    for t in (0..1200).step_by(15) {
        writeln!(file, "{t},lurker{},#aaaaaa,chatting", t % 4).unwrap();
        writeln!(file, "{t},Nightbot,#000000,Follow the socials!").unwrap();
    }
    for i in 0..12 {
        writeln!(file, "{},viewer{i},#ff0000,NO WAY", 300 + i % 5).unwrap();
        writeln!(file, "{},viewer{i},#ff0000,!clip", 301 + i % 5).unwrap();
    }
    for i in 0..7 {
        writeln!(file, "{},viewer{i},#00ff00,@streamer gg", 900 + i).unwrap();
        writeln!(file, "{},viewer{i},#00ff00,GG", 901 + i).unwrap();
    }
    file
}

#[tokio::test]
async fn test_export_to_ranked_peaks() {
    let export = write_export();
    let table = load_csv(export.path(), &IngestConfig::default()).unwrap();
    assert!(table.iter().all(|e| e.author != "Nightbot"));
    assert!(table.iter().all(|e| !e.text().starts_with('!') && !e.text().starts_with('@')));

    let config = AnalysisConfig {
        window_size: 10,
        slack: 120,
        top_n: 3,
        ..AnalysisConfig::default()
    };
    let report = spawn_analysis(Arc::new(table), config)
        .unwrap()
        .join()
        .await
        .unwrap();

    assert!(report.peaks.len() <= 3);
    let first = &report.peaks[0];
    let second = &report.peaks[1];
    // 12 viewers plus the lurker posting at 300
    assert_eq!(first.unique_user_count(), 13);
    assert!((300..=305).contains(&first.time().as_secs()));
    assert!((900..=910).contains(&second.time().as_secs()));
    for pair in report.peaks.windows(2) {
        assert!(pair[0].unique_user_count() >= pair[1].unique_user_count());
    }

    let mut out = Vec::new();
    render_rows(&peak_rows(&report.peaks, true), OutputFormat::Csv, &mut out).unwrap();
    let csv_text = String::from_utf8(out).unwrap();
    assert_eq!(csv_text.lines().count(), report.peaks.len() + 1);
}

#[test]
fn test_policies_disagree_on_split_bursts() {
    // a burst straddling the 12s bucket edge
    let events: Vec<Event> = (0..6)
        .map(|i| Event::message(9 + i, format!("fan{i}"), "!!!"))
        .collect();
    let table = EventTable::new(events).unwrap();

    let sliding = aggregate(&table, &WindowParams::new(12, WindowPolicy::Sliding, 0).unwrap());
    let tumbling = aggregate(&table, &WindowParams::new(12, WindowPolicy::Tumbling, 0).unwrap());

    let best = |records: &[WindowRecord]| records.iter().map(|r| r.unique_user_count).max();
    assert_eq!(best(&sliding), Some(6));
    assert_eq!(best(&tumbling), Some(3));
}

#[test]
fn test_parameter_changes_rerun_cleanly() {
    let events: Vec<Event> = (0..50)
        .map(|i| Event::message(i * 3, format!("u{}", i % 7), "msg"))
        .collect();
    let table = EventTable::new(events).unwrap();

    let mut previous = usize::MAX;
    for threshold in 0..8 {
        let params = WindowParams::new(9, WindowPolicy::Sliding, threshold).unwrap();
        let count = aggregate(&table, &params).len();
        assert!(count <= previous);
        previous = count;
    }
}

//! Core data types and models

pub mod event;
pub mod temporal;
pub mod window;

pub use event::*;
pub use temporal::*;
pub use window::*;

//! Per-session run statistics, kept in memory and reported through the log

pub mod session;

pub use session::{RunSummary, SessionStats, format_clock};

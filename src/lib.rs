//! CRT Snake - Snake in the terminal with phosphor-monitor styling
//!
//! This library provides:
//! - Grid simulation with no I/O (game module)
//! - The CRT theme render pipeline and terminal presenter (render module)
//! - Keyboard mapping (input module)
//! - Session statistics (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

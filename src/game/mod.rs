//! Grid simulation for Snake
//!
//! Pure game rules with no I/O or rendering dependencies: one call to
//! [`GameEngine::step`] advances the board by exactly one tick.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepResult};
pub use state::{CollisionType, GameState, Position, RunStatus, Snake, to_coord};

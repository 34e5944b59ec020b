//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering
//! dependencies. The host feeds it key presses and frame timestamps and
//! receives events back.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{Simulation, StepResult};
pub use error::ConfigError;
pub use events::{EventSink, SimulationEvent};
pub use spawn::Spawner;
pub use state::{Cell, GameOverReason, PowerUpState, SimulationState, Snake};

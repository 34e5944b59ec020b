//! Snake Engine - a grid snake game with power-ups and high scores
//!
//! This library provides:
//! - Core simulation and rules (game module)
//! - Local score persistence and leaderboard submission
//! - Sound notifications, keyboard mapping and a terminal renderer
//! - The interactive play mode driving it all

pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod logger;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;

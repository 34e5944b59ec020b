pub mod handler;

pub use handler::{EditAction, InputHandler, KeyAction};

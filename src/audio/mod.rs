pub mod sound_board;

pub use sound_board::{Sound, SoundBoard};

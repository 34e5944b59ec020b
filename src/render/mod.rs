pub mod renderer;

pub use renderer::{cell_kind, CellKind, Hud, Renderer};

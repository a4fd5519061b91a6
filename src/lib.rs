pub mod color;
pub mod config;
pub mod driver;
pub mod grid;
pub mod render;
pub mod rules;
pub mod simulation;
pub mod surface;
pub mod term;

/// Number of consecutive generations a cell has been alive. `0` is dead.
pub type Age = u32;

/// A length measured in physical pixels of a surface.
pub type Pixels = usize;

use std::fmt;
use std::io;

use thiserror::Error;

use crate::simulation::Simulation;

pub mod raster;
pub mod svg;

pub use self::raster::CanvasRenderer;
pub use self::svg::SvgRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Pixel size must be positive, got {width}x{height}")]
    ZeroPixelSize { width: usize, height: usize },

    #[error("Surface of {width}x{height} pixels can't fit a single {cell_width}x{cell_height} cell")]
    SurfaceTooSmall {
        width: usize,
        height: usize,
        cell_width: usize,
        cell_height: usize,
    },

    #[error("Renderer draws {exp_width}x{exp_height} cells, but the board is {got_width}x{got_height}")]
    GridMismatch {
        exp_width: usize,
        exp_height: usize,
        got_width: usize,
        got_height: usize,
    },

    #[error("Failed to present frame: {0}")]
    Present(#[from] io::Error),

    #[error("Failed to write document: {0}")]
    Format(#[from] fmt::Error),
}

/// Anything that can draw the current generation of a [`Simulation`].
pub trait Render {
    /// Draw every cell of the current generation and present it as a single frame
    fn render(&mut self, simulation: &Simulation) -> Result<(), RenderError>;
}

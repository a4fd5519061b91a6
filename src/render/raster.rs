use tracing::debug;
use tracing::trace;

use crate::Age;
use crate::Pixels;
use crate::color::Palette;
use crate::color::Rgba;
use crate::render::Render;
use crate::render::RenderError;
use crate::simulation::Simulation;
use crate::surface::PixelBuffer;
use crate::surface::Surface;

/// Paints a board into a pixel buffer, one `pixel_width` by `pixel_height` block per cell.
pub struct CanvasRenderer<S> {
    surface: S,

    /// Sized to the whole surface, not just the part covered by cells
    buffer: PixelBuffer,

    palette: Palette,

    pixel_width: Pixels,
    pixel_height: Pixels,

    /// Number of cells that fit across the surface
    grid_width: usize,

    /// Number of cells that fit down the surface
    grid_height: usize,
}

impl<S> CanvasRenderer<S>
where
    S: Surface,
{
    pub fn new(
        surface: S,
        palette: Palette,
        pixel_width: Pixels,
        pixel_height: Pixels,
    ) -> Result<Self, RenderError> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(RenderError::ZeroPixelSize {
                width: pixel_width,
                height: pixel_height,
            });
        }

        let (width, height) = (surface.width(), surface.height());
        let grid_width = width / pixel_width;
        let grid_height = height / pixel_height;

        if grid_width == 0 || grid_height == 0 {
            return Err(RenderError::SurfaceTooSmall {
                width,
                height,
                cell_width: pixel_width,
                cell_height: pixel_height,
            });
        }

        debug!(
            width,
            height,
            grid_width,
            grid_height,
            pixel_width,
            pixel_height,
            "created canvas renderer"
        );

        Ok(Self {
            surface,
            buffer: PixelBuffer::new(width, height),
            palette,
            pixel_width,
            pixel_height,
            grid_width,
            grid_height,
        })
    }

    /// `(width, height)` of the board this renderer draws, in cells
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid_width, self.grid_height)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Color for a cell that has been alive for `liveness` generations
    pub fn pick_color(&self, liveness: Age) -> Rgba {
        self.palette.pick(liveness)
    }

    /// Paint the block of pixels covering cell `(x, y)`
    pub fn draw_cell(&mut self, x: usize, y: usize, liveness: Age) {
        assert!(x < self.grid_width, "x is out of bounds");
        assert!(y < self.grid_height, "y is out of bounds");

        let color = self.pick_color(liveness);

        self.buffer.fill_rect(
            x * self.pixel_width,
            y * self.pixel_height,
            self.pixel_width,
            self.pixel_height,
            color,
        );
    }

    /// Present the buffer to the surface in one go
    pub fn finish(&mut self) -> Result<(), RenderError> {
        self.surface.put_image(&self.buffer)?;

        Ok(())
    }
}

impl<S> Render for CanvasRenderer<S>
where
    S: Surface,
{
    fn render(&mut self, simulation: &Simulation) -> Result<(), RenderError> {
        let grid = simulation.grid();

        if grid.size() != self.grid_size() {
            return Err(RenderError::GridMismatch {
                exp_width: self.grid_width,
                exp_height: self.grid_height,
                got_width: grid.width(),
                got_height: grid.height(),
            });
        }

        for (x, y, age) in grid.iter() {
            self.draw_cell(x, y, age);
        }

        trace!(generation = simulation.generation(), "presenting frame");

        self.finish()
    }
}

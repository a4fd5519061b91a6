use std::fmt;
use std::fmt::Write;

use crate::color::LinearScale;
use crate::grid::Grid;
use crate::render::Render;
use crate::render::RenderError;
use crate::simulation::Simulation;

/// Draws the board as an SVG document: a `g` per row, a `rect` per cell.
///
/// Unlike [`CanvasRenderer`](super::CanvasRenderer) the document is sized by the board, and
/// colors come from a continuous [`LinearScale`] rather than a bucketed palette.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    cell_width: usize,
    cell_height: usize,
    scale: LinearScale,
    document: String,
}

impl SvgRenderer {
    pub fn new(cell_width: usize, cell_height: usize) -> Result<Self, RenderError> {
        if cell_width == 0 || cell_height == 0 {
            return Err(RenderError::ZeroPixelSize {
                width: cell_width,
                height: cell_height,
            });
        }

        Ok(Self {
            cell_width,
            cell_height,
            scale: LinearScale::default(),
            document: String::new(),
        })
    }

    pub fn with_scale(mut self, scale: LinearScale) -> Self {
        self.scale = scale;
        self
    }

    /// The most recently rendered document. Empty until the first render.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            cell_width: 10,
            cell_height: 10,
            scale: LinearScale::default(),
            document: String::new(),
        }
    }
}

impl SvgRenderer {
    fn write_document(&self, grid: &Grid, doc: &mut String) -> fmt::Result {
        let (cw, ch) = (self.cell_width, self.cell_height);

        writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            cw * grid.width(),
            ch * grid.height()
        )?;

        for (y, row) in grid.rows().enumerate() {
            writeln!(
                doc,
                r#"  <g class="row" transform="translate(0,{})">"#,
                ch * y
            )?;

            for (x, &age) in row.iter().enumerate() {
                let fill = self.scale.color(age as f64);
                writeln!(
                    doc,
                    r#"    <rect class="cell" width="{cw}" height="{ch}" x="{}" style="fill: {fill}"/>"#,
                    cw * x
                )?;
            }

            doc.push_str("  </g>\n");
        }

        doc.push_str("</svg>\n");

        Ok(())
    }
}

impl Render for SvgRenderer {
    fn render(&mut self, simulation: &Simulation) -> Result<(), RenderError> {
        let grid = simulation.grid();

        let mut doc = String::with_capacity(64 * (grid.width() + 1) * grid.height());
        self.write_document(grid, &mut doc)?;

        self.document = doc;

        Ok(())
    }
}

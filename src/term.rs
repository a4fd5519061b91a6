use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style;
use crossterm::style::Color;

use crate::Pixels;
use crate::color::Rgba;
use crate::surface::PixelBuffer;
use crate::surface::Surface;

/// Upper half block. The foreground paints the top pixel, the background the bottom one.
const UPPER_HALF: char = '\u{2580}';

/// A terminal used as a raster.
///
/// Each character cell holds two pixels stacked vertically, so a terminal of `cols` by `rows`
/// characters is a `cols` by `2 * rows` pixel surface. Terminals have no alpha, so every pixel is
/// composited over `backdrop` before it's drawn.
pub struct TerminalSurface<W> {
    out: W,
    cols: u16,
    rows: u16,
    backdrop: Rgba,
}

impl<W> TerminalSurface<W>
where
    W: Write,
{
    pub fn new(out: W, cols: u16, rows: u16, backdrop: Rgba) -> Self {
        Self {
            out,
            cols,
            rows,
            backdrop: backdrop.over(Rgba::WHITE),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn color(&self, px: Rgba) -> Color {
        let Rgba { r, g, b, .. } = px.over(self.backdrop);
        Color::Rgb { r, g, b }
    }
}

impl<W> Surface for TerminalSurface<W>
where
    W: Write,
{
    fn width(&self) -> Pixels {
        self.cols as Pixels
    }

    fn height(&self) -> Pixels {
        2 * self.rows as Pixels
    }

    fn put_image(&mut self, image: &PixelBuffer) -> io::Result<()> {
        assert_eq!(image.width(), self.width(), "image width doesn't match");
        assert_eq!(image.height(), self.height(), "image height doesn't match");

        // only emit color changes, runs of one color are common
        let mut fg = None;
        let mut bg = None;

        let mut rows = image.rows();
        let mut line = 0;

        while let (Some(top), Some(bottom)) = (rows.next(), rows.next()) {
            queue!(self.out, cursor::MoveTo(0, line))?;

            for (t, b) in top.zip(bottom) {
                let (t, b) = (self.color(t), self.color(b));

                if fg != Some(t) {
                    queue!(self.out, style::SetForegroundColor(t))?;
                    fg = Some(t);
                }

                if bg != Some(b) {
                    queue!(self.out, style::SetBackgroundColor(b))?;
                    bg = Some(b);
                }

                queue!(self.out, style::Print(UPPER_HALF))?;
            }

            line += 1;
        }

        queue!(self.out, style::ResetColor)?;
        self.out.flush()
    }
}

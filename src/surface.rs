use std::io;

use crate::Pixels;
use crate::color::Rgba;

/// A raster target with fixed physical dimensions.
///
/// Renderers paint a [`PixelBuffer`] of the same size and hand it over in one call once a frame
/// is complete.
pub trait Surface {
    /// Width in physical pixels
    fn width(&self) -> Pixels;

    /// Height in physical pixels
    fn height(&self) -> Pixels;

    /// Present a complete frame. `image` always has the surface's dimensions.
    fn put_image(&mut self, image: &PixelBuffer) -> io::Result<()>;
}

/// RGBA8 pixels, row-major, initially transparent
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: Pixels,
    height: Pixels,
}

impl PixelBuffer {
    pub fn new(width: Pixels, height: Pixels) -> Self {
        Self {
            data: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn width(&self) -> Pixels {
        self.width
    }

    pub fn height(&self) -> Pixels {
        self.height
    }

    pub fn pixel(&self, x: Pixels, y: Pixels) -> Rgba {
        assert!(x < self.width, "x is out of bounds");
        assert!(y < self.height, "y is out of bounds");

        let i = self.offset(x, y);
        let px: [u8; 4] = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];

        Rgba::from(px)
    }

    /// Fill the `w` by `h` rectangle whose top left corner is `(x, y)`
    pub fn fill_rect(&mut self, x: Pixels, y: Pixels, w: Pixels, h: Pixels, color: Rgba) {
        assert!(x + w <= self.width, "x is out of bounds");
        assert!(y + h <= self.height, "y is out of bounds");

        let px = color.to_array();

        for row in y..y + h {
            let start = self.offset(x, row);
            let end = start + w * 4;

            for chunk in self.data[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw RGBA bytes, 4 per pixel
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Rgba> + '_> + '_ {
        self.data.chunks_exact(self.width * 4).map(|row| {
            row.chunks_exact(4)
                .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
        })
    }

    fn offset(&self, x: Pixels, y: Pixels) -> usize {
        (y * self.width + x) * 4
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// A surface that keeps the last frame it was given. Used for headless runs.
#[derive(Debug)]
pub struct MemorySurface {
    frame: PixelBuffer,
    commits: usize,
}

impl MemorySurface {
    pub fn new(width: Pixels, height: Pixels) -> Self {
        Self {
            frame: PixelBuffer::new(width, height),
            commits: 0,
        }
    }

    /// The last presented frame
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// How many frames have been presented
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl Surface for MemorySurface {
    fn width(&self) -> Pixels {
        self.frame.width
    }

    fn height(&self) -> Pixels {
        self.frame.height
    }

    fn put_image(&mut self, image: &PixelBuffer) -> io::Result<()> {
        self.frame.clone_from(image);
        self.commits += 1;

        Ok(())
    }
}

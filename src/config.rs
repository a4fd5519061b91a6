use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::color::Palette;
use crate::color::PaletteError;
use crate::color::Rgba;
use crate::driver::PlayOptions;
use crate::rules::Aging;

/// Conway's Game of Life, drawn in the terminal.
///
/// Cells are colored by how long they've been alive. Press `q` to quit.
#[derive(Parser, Debug, Clone)]
#[command(name = "bensway", version)]
pub struct Config {
    /// Chance of each cell starting alive, between 0 and 1
    #[arg(long, default_value_t = 0.1)]
    pub alive_fraction: f64,

    /// Side of the square block of pixels drawn for each cell. A terminal character holds two
    /// pixels, one above the other
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub pixel_size: u16,

    /// Upper bound on generations per second
    #[arg(long, default_value_t = 16.0)]
    pub fps: f64,

    /// Color of dead cells, as `#rrggbb[aa]` or `r,g,b[,a]`
    #[arg(long)]
    pub dead: Option<Rgba>,

    /// Colors of live cells, youngest first. Repeat for more buckets
    #[arg(long = "live")]
    pub live: Vec<Rgba>,

    /// What transparent pixels are composited over
    #[arg(long, default_value = "#ffffff")]
    pub backdrop: Rgba,

    /// Seed for the initial board. Random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Don't track cell ages, every live cell gets the first live color
    #[arg(long)]
    pub binary: bool,

    /// Write the board to this SVG file instead of animating it
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Generations to run before writing the SVG
    #[arg(long, default_value_t = 0, requires = "svg")]
    pub generations: usize,

    /// Board width in cells, for SVG output
    #[arg(long, default_value_t = 10, requires = "svg")]
    pub width: usize,

    /// Board height in cells, for SVG output
    #[arg(long, default_value_t = 10, requires = "svg")]
    pub height: usize,

    /// Side of each SVG cell
    #[arg(long, default_value_t = 10, requires = "svg")]
    pub cell_size: usize,
}

impl Config {
    /// The homepage palette, with any colors given on the command line swapped in
    pub fn palette(&self) -> Result<Palette, PaletteError> {
        let defaults = Palette::homepage();

        let dead = self.dead.unwrap_or(defaults.dead());
        let live = if self.live.is_empty() {
            defaults.live().to_vec()
        } else {
            self.live.clone()
        };

        Palette::new(dead, live)
    }

    pub fn aging(&self) -> Aging {
        if self.binary {
            Aging::Binary
        } else {
            Aging::Tracked
        }
    }

    pub fn play_options(&self) -> Result<PlayOptions, PaletteError> {
        Ok(PlayOptions {
            alive_fraction: self.alive_fraction,
            palette: self.palette()?,
            pixel_size: self.pixel_size as usize,
            fps: self.fps,
            aging: self.aging(),
        })
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

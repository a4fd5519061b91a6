use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::Age;

/// An 8-bit-per-channel color with straight (non premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Composite this color over an opaque `backdrop`, dropping alpha
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let a = self.a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;

        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    /// Interpolate channel by channel, rounding to the nearest value. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba::new(r, g, b, a)
    }
}

impl From<[u8; 3]> for Rgba {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgba::rgb(r, g, b)
    }
}

/// Formats as `#rrggbb`, or `#rrggbbaa` when not opaque
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;

        if self.a != 0xFF {
            write!(f, "{:02x}", self.a)?;
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Expected 3 or 4 channels, but got {got}")]
    ChannelCount { got: usize },

    #[error("Expected 6 or 8 hex digits, but got \"{got}\"")]
    HexLength { got: String },

    #[error("Expected only hex digits, but got \"{got}\"")]
    HexDigit { got: String },

    #[error("Invalid channel \"{channel}\": {source}")]
    Channel {
        channel: String,
        source: ParseIntError,
    },
}

/// Accepts `#rrggbb`, `#rrggbbaa`, `r,g,b` and `r,g,b,a`
impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
                return Err(ColorParseError::HexLength {
                    got: hex.to_string(),
                });
            }

            // from_str_radix would take a sign
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ColorParseError::HexDigit {
                    got: hex.to_string(),
                });
            }

            let channel = |i: usize| {
                let digits = &hex[i..i + 2];
                u8::from_str_radix(digits, 16).map_err(|source| ColorParseError::Channel {
                    channel: digits.to_string(),
                    source,
                })
            };

            let a = if hex.len() == 8 { channel(6)? } else { 0xFF };

            return Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a));
        }

        let channels = s
            .split(',')
            .map(|c| {
                let c = c.trim();
                c.parse::<u8>().map_err(|source| ColorParseError::Channel {
                    channel: c.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match channels.as_slice() {
            &[r, g, b] => Ok(Rgba::rgb(r, g, b)),
            &[r, g, b, a] => Ok(Rgba::new(r, g, b, a)),
            _ => Err(ColorParseError::ChannelCount {
                got: channels.len(),
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("A palette needs at least one live color")]
    NoLiveColors,
}

/// Colors for dead cells and for increasingly old live cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    dead: Rgba,
    live: Vec<Rgba>,
}

impl Palette {
    pub fn new(dead: Rgba, live: Vec<Rgba>) -> Result<Self, PaletteError> {
        if live.is_empty() {
            return Err(PaletteError::NoLiveColors);
        }

        Ok(Self { dead, live })
    }

    /// Pale yellow background with four fading blues, young cells darkest.
    ///
    /// The dead color is fully transparent, so whatever sits behind the surface shows through
    /// dead cells.
    pub fn homepage() -> Self {
        Self {
            dead: Rgba::new(239, 243, 128, 0),
            live: vec![
                Rgba::new(8, 81, 156, 200),
                Rgba::new(49, 130, 189, 128),
                Rgba::new(107, 174, 214, 128),
                Rgba::new(189, 215, 231, 128),
            ],
        }
    }

    pub fn dead(&self) -> Rgba {
        self.dead
    }

    pub fn live(&self) -> &[Rgba] {
        &self.live
    }

    /// Color for a cell that has been alive for `liveness` generations.
    ///
    /// Ages are grouped in logarithmic buckets: `1..=2` is the first live color, `3..=6` the
    /// second, `7..=14` the third and so on. Anything older than the table reaches uses the last
    /// color.
    pub fn pick(&self, liveness: Age) -> Rgba {
        if liveness == 0 {
            return self.dead;
        }

        // at least 1, since liveness + 1 >= 2
        let bucket = (liveness as u64 + 1).ilog2() as usize;
        let i = (bucket - 1).min(self.live.len() - 1);

        self.live[i]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::homepage()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("A scale needs at least two stops, got {got}")]
    TooFewStops { got: usize },

    #[error("Got {breaks} breaks but {colors} colors")]
    Mismatch { breaks: usize, colors: usize },

    #[error("Breaks must be strictly increasing")]
    Unordered,
}

/// A piecewise linear map from ages to colors, clamped at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    breaks: Vec<f64>,
    colors: Vec<Rgba>,
}

impl LinearScale {
    pub fn new(breaks: Vec<f64>, colors: Vec<Rgba>) -> Result<Self, ScaleError> {
        if breaks.len() != colors.len() {
            return Err(ScaleError::Mismatch {
                breaks: breaks.len(),
                colors: colors.len(),
            });
        }

        if breaks.len() < 2 {
            return Err(ScaleError::TooFewStops { got: breaks.len() });
        }

        if breaks.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(ScaleError::Unordered);
        }

        Ok(Self { breaks, colors })
    }

    /// White for dead cells, then greens getting darker up to age 10
    pub fn greens() -> Self {
        Self {
            breaks: vec![0.0, 1.0, 5.0, 10.0],
            colors: vec![
                Rgba::rgb(0xff, 0xff, 0xff),
                Rgba::rgb(0x67, 0xa9, 0xcf),
                Rgba::rgb(0x1c, 0x90, 0x99),
                Rgba::rgb(0x01, 0x6c, 0x59),
            ],
        }
    }

    pub fn color(&self, value: f64) -> Rgba {
        let last = self.breaks.len() - 1;
        let value = value.clamp(self.breaks[0], self.breaks[last]);

        // the segment [breaks[i], breaks[i + 1]] holding `value`
        let i = self.breaks[1..last].partition_point(|&b| b <= value);

        let (lo, hi) = (self.breaks[i], self.breaks[i + 1]);
        let t = (value - lo) / (hi - lo);

        self.colors[i].lerp(self.colors[i + 1], t)
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::greens()
    }
}

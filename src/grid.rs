use std::fmt;

use thiserror::Error;

use crate::Age;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid width must be positive")]
    ZeroWidth,

    #[error("Grid height must be positive")]
    ZeroHeight,

    #[error("Row {row} has {got} cells, expected {exp}")]
    RaggedRow { row: usize, exp: usize, got: usize },
}

/// A rectangular board of cell ages.
///
/// Cells are stored row-major, so `(x, y)` lives at `y * width + x`. A value of `0` is a dead
/// cell, and `n > 0` is a cell that has been alive for `n` generations, including the current one.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Age>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 {
            return Err(GridError::ZeroWidth);
        }

        if height == 0 {
            return Err(GridError::ZeroHeight);
        }

        Ok(Self {
            cells: vec![0; width * height],
            width,
            height,
        })
    }

    /// Build a grid out of rows, top to bottom. Every row must have the same length.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[Age]>,
    {
        let Some(first) = rows.first() else {
            return Err(GridError::ZeroHeight);
        };

        let mut grid = Self::new(first.as_ref().len(), rows.len())?;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();

            if row.len() != grid.width {
                return Err(GridError::RaggedRow {
                    row: y,
                    exp: grid.width,
                    got: row.len(),
                });
            }

            let start = grid.index(0, y);
            grid.cells[start..start + grid.width].copy_from_slice(row);
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Age {
        assert!(x < self.width, "x is out of bounds");
        assert!(y < self.height, "y is out of bounds");

        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, age: Age) {
        assert!(x < self.width, "x is out of bounds");
        assert!(y < self.height, "y is out of bounds");

        let i = self.index(x, y);
        self.cells[i] = age;
    }

    /// Number of live cells in the Moore neighborhood of `(x, y)`.
    ///
    /// The neighborhood is clamped to the board: cells past an edge don't exist, so edges and
    /// corners simply have fewer neighbors. There is no wraparound.
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        let x_lo = x.saturating_sub(1);
        let x_hi = (x + 1).min(self.width - 1);
        let y_lo = y.saturating_sub(1);
        let y_hi = (y + 1).min(self.height - 1);

        let mut n = 0;

        for j in y_lo..=y_hi {
            for i in x_lo..=x_hi {
                if (i, j) == (x, y) {
                    continue;
                }

                if self.cells[self.index(i, j)] > 0 {
                    n += 1;
                }
            }
        }

        n
    }

    /// Iterate over `(x, y, age)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Age)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(n, &age)| (n % self.width, n / self.width, age))
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&age| age > 0).count()
    }

    pub fn is_dead(&self) -> bool {
        self.cells.iter().all(|&age| age == 0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Age]> {
        self.cells.chunks_exact(self.width)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Age] {
        &mut self.cells
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

/// One line per row. Dead cells are `.`, live cells show their age, capped at `9`.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &age in row {
                let c = match age {
                    0 => '.',
                    n => char::from_digit(n.min(9), 10).unwrap_or('9'),
                };

                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        write!(f, "{self}")
    }
}

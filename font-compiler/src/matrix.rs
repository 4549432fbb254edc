//! A binary pixel grid.

use std::fmt;

/// A row-major grid of on/off pixels.
///
/// `width` is the number of columns (bits per row) and `height` the number
/// of rows.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl PixelMatrix {
    /// Create a matrix of the given size with every pixel off.
    ///
    /// Returns `None` if the pixel count does not fit in a `usize`.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        let len = width.checked_mul(height)?;
        Some(PixelMatrix {
            width,
            height,
            pixels: vec![false; len],
        })
    }

    /// Build a matrix from a sequence of equal-length rows.
    ///
    /// Returns `None` if the rows do not all have the same length.
    pub fn from_rows<R, I>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[bool]>,
    {
        let mut result = PixelMatrix::default();
        for row in rows {
            if !result.push_row(row.as_ref()) {
                return None;
            }
        }
        Some(result)
    }

    /// Parse a compact picture, one string per row, `X` for on and anything
    /// else for off. Mostly useful in tests.
    pub fn from_picture<'a>(rows: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let rows = rows
            .into_iter()
            .map(|row| row.chars().map(|c| c == 'X').collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self::from_rows(rows)
    }

    /// Append a row, returning `false` (and leaving the matrix untouched) if
    /// its length does not match the existing width.
    pub(crate) fn push_row(&mut self, row: &[bool]) -> bool {
        if self.height == 0 {
            self.width = row.len();
        } else if row.len() != self.width {
            return false;
        }
        self.pixels.extend_from_slice(row);
        self.height += 1;
        true
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// The pixel at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        self.pixels[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        self.pixels[row * self.width + col] = on;
    }

    /// Iterate over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        // chunks panics on zero; a zero-width matrix has no pixels anyway
        self.pixels.chunks(self.width.max(1))
    }
}

impl fmt::Debug for PixelMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PixelMatrix {}x{} [", self.width, self.height)?;
        for row in self.rows() {
            let line = row
                .iter()
                .map(|on| if *on { 'X' } else { '.' })
                .collect::<String>();
            writeln!(f, "  {line}")?;
        }
        write!(f, "]")
    }
}

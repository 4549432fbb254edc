//! Bilinear scaling of binary bitmaps.

use crate::matrix::PixelMatrix;

/// The intensity of an on pixel.
const ON_INTENSITY: f32 = 255.0;
/// Interpolated pixels brighter than this are on.
pub const THRESHOLD: f32 = 128.0;

/// Scale `matrix` by `factor`, interpolating between neighbouring pixels.
///
/// Each source pixel is treated as intensity 0 or 255; every destination
/// pixel is the bilinear blend of the four nearest source pixels (replicating
/// the last row and column at the edges), switched on if the blend exceeds
/// [`THRESHOLD`]. The destination size is given by [`scaled_size`].
///
/// `factor` is expected to be at least 1.0; a factor of exactly 1.0 returns
/// an identical matrix. Returns `None` if the destination is too large to
/// address.
pub fn scale(matrix: &PixelMatrix, factor: f32) -> Option<PixelMatrix> {
    let (src_width, src_height) = (matrix.width(), matrix.height());
    let (width, height) = scaled_size(src_width, src_height, factor);
    let mut result = PixelMatrix::new(width, height)?;
    if matrix.is_empty() {
        return Some(result);
    }

    let intensity = |row: usize, col: usize| {
        if matrix.get(row, col) {
            ON_INTENSITY
        } else {
            0.0
        }
    };

    for row in 0..height {
        let (src_row, row_frac) = source_position(row, factor);
        let src_row = src_row.min(src_height - 1);
        let next_row = (src_row + 1).min(src_height - 1);
        for col in 0..width {
            let (src_col, col_frac) = source_position(col, factor);
            let src_col = src_col.min(src_width - 1);
            let next_col = (src_col + 1).min(src_width - 1);

            let value = intensity(src_row, src_col) * (1.0 - col_frac) * (1.0 - row_frac)
                + intensity(src_row, next_col) * col_frac * (1.0 - row_frac)
                + intensity(next_row, src_col) * (1.0 - col_frac) * row_frac
                + intensity(next_row, next_col) * col_frac * row_frac;
            result.set(row, col, value > THRESHOLD);
        }
    }
    Some(result)
}

/// The size of a `width` x `height` matrix scaled by `factor`, truncated.
///
/// Sizes that overflow saturate at `usize::MAX`.
pub fn scaled_size(width: usize, height: usize, factor: f32) -> (usize, usize) {
    (
        (width as f32 * factor) as usize,
        (height as f32 * factor) as usize,
    )
}

// the integer source index and the fractional offset from it
fn source_position(dst: usize, factor: f32) -> (usize, f32) {
    let pos = dst as f32 / factor;
    let src = pos as usize;
    (src, pos - src as f32)
}

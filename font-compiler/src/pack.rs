//! Packing glyph pixels into bytes, and deriving glyph metrics.

use crate::{error::ParseErrorKind, matrix::PixelMatrix};

/// Space added to the right of the rightmost on pixel.
pub const ADVANCE_MARGIN: i32 = 3;
/// Horizontal offset from the cursor to the glyph's left edge.
pub const DX: i32 = 3;
/// Extra rise of the glyph's top edge above the baseline.
pub const DY_MARGIN: i32 = 3;

/// The packed rows of a single glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedBitmap {
    /// Rows packed most significant bit first, `width / 8` bytes per row.
    pub bytes: Vec<u8>,
    /// The highest column holding an on pixel in any row, or 0.
    pub rightmost: usize,
}

/// Pack the rows of `matrix` into bytes.
///
/// The width must be a multiple of 8; each row starts a new byte.
pub fn pack(matrix: &PixelMatrix) -> Result<PackedBitmap, ParseErrorKind> {
    let width = matrix.width();
    if width % 8 != 0 {
        return Err(ParseErrorKind::WidthNotByteAligned(width));
    }
    let mut packed = PackedBitmap {
        bytes: Vec::with_capacity(width / 8 * matrix.height()),
        rightmost: 0,
    };
    for row in matrix.rows() {
        for (byte_ix, chunk) in row.chunks(8).enumerate() {
            let mut byte = 0u8;
            for (bit_ix, on) in chunk.iter().enumerate() {
                byte <<= 1;
                if *on {
                    byte |= 1;
                    packed.rightmost = packed.rightmost.max(byte_ix * 8 + bit_ix);
                }
            }
            packed.bytes.push(byte);
        }
    }
    Ok(packed)
}

/// Positioning information for one glyph in the bitmap stream.
///
/// Field order matches the `GFXglyph` record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    pub name: String,
    /// Byte offset of the glyph's bitmap in the shared stream.
    pub index: usize,
    pub width: usize,
    pub height: usize,
    pub x_advance: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Glyph {
    /// Derive the metrics for a packed glyph stored at `index`.
    pub fn new(
        name: impl Into<String>,
        index: usize,
        matrix: &PixelMatrix,
        rightmost: usize,
    ) -> Self {
        let width = matrix.width();
        let height = matrix.height();
        // don't push the glyph further down than it is wide
        let dy = (-(height as i32 + DY_MARGIN)).max(-(width as i32 + DY_MARGIN));
        Glyph {
            name: name.into(),
            index,
            width,
            height,
            x_advance: rightmost as i32 + 1 + ADVANCE_MARGIN,
            dx: DX,
            dy,
        }
    }

    /// The number of bytes this glyph occupies in the bitmap stream.
    pub fn byte_len(&self) -> usize {
        self.width.div_ceil(8) * self.height
    }
}

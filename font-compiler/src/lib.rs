//! Compile ASCII-art glyph descriptions into packed bitmap fonts.
//!
//! The input is a text file in which each glyph is drawn as a block of pixel
//! rows inside C comments, optionally preceded by a `// name` line:
//!
//! ```text
//! // A
//! /*| 8 4 2 1 8 4 2 1 |*/
//! /*| X . . . . . . X |*/
//! /*| . . . . . . . , |*/
//! };
//! ```
//!
//! Each glyph is optionally scaled up ([`scale`]), packed into bytes with its
//! metrics derived ([`pack`]), collected into a [`FontTable`] and finally
//! written as an Adafruit-GFX style font header ([`emit`]).
//!
//! ```
//! use font_compiler::{compile, CompileOptions};
//!
//! let source = "// A\n/*| X . . . . . . X |*/\n/*| . . . . . . . . |*/\n}";
//! let table = compile(source.lines(), &CompileOptions::with_factor(1.0)).unwrap();
//! assert_eq!(table.bitmap(), [0x81, 0x00]);
//! assert_eq!(table.parsed_glyphs()[0].x_advance, 11);
//! ```

pub mod emit;
mod error;
pub mod matrix;
pub mod pack;
pub mod plan;
pub mod scale;
pub mod scan;
mod session;

pub use error::{Error, ErrorReport, ParseError, ParseErrorKind};
pub use matrix::PixelMatrix;
pub use pack::Glyph;
pub use session::{
    compile, CompileOptions, CompileSession, FontTable, Limits, DEFAULT_FACTOR,
    PADDED_GLYPH_COUNT,
};

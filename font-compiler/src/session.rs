//! Accumulating glyphs into a font table.

use std::borrow::Cow;

use crate::{
    error::{Error, ParseError, ParseErrorKind},
    matrix::PixelMatrix,
    pack::{self, Glyph},
    scale,
    scan::{ScannedGlyph, Scanner},
};

/// The scale factor used when none is given.
pub const DEFAULT_FACTOR: f32 = 2.0;
/// Fonts with fewer glyphs than this are padded up to it.
pub const PADDED_GLYPH_COUNT: usize = 32;

/// Size limits for glyphs and fonts.
///
/// The defaults match what the downstream renderer expects: source glyphs up
/// to 32x32, scaled glyphs up to 32 pixels wide and 64 rows tall, and at most
/// 256 glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub source_width: usize,
    pub source_height: usize,
    pub scaled_width: usize,
    pub scaled_height: usize,
    pub max_glyphs: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            source_width: 32,
            source_height: 32,
            scaled_width: 32,
            scaled_height: 64,
            max_glyphs: 256,
        }
    }
}

/// Options controlling a compile.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileOptions {
    /// Scale factor applied to every glyph. 1.0 disables scaling.
    pub factor: f32,
    pub limits: Limits,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            factor: DEFAULT_FACTOR,
            limits: Limits::default(),
        }
    }
}

impl CompileOptions {
    pub fn with_factor(factor: f32) -> Self {
        CompileOptions {
            factor,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(Error::InvalidFactor(self.factor));
        }
        Ok(())
    }
}

/// A compiled font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    glyphs: Vec<Glyph>,
    bitmap: Vec<u8>,
    images: Vec<PixelMatrix>,
    y_advance: usize,
}

impl FontTable {
    /// The glyphs parsed from the source, in source order.
    pub fn parsed_glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The glyphs as written to the output, padded to
    /// [`PADDED_GLYPH_COUNT`] entries with copies of the first glyph.
    ///
    /// Each padding entry is named by its own index.
    pub fn glyphs(&self) -> Cow<'_, [Glyph]> {
        if self.glyphs.len() >= PADDED_GLYPH_COUNT {
            return Cow::Borrowed(&self.glyphs);
        }
        let mut glyphs = self.glyphs.clone();
        let first = &self.glyphs[0];
        glyphs.extend((self.glyphs.len()..PADDED_GLYPH_COUNT).map(|i| Glyph {
            name: i.to_string(),
            ..first.clone()
        }));
        Cow::Owned(glyphs)
    }

    /// The number of glyphs written to the output, including padding.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len().max(PADDED_GLYPH_COUNT)
    }

    /// The packed bitmap stream shared by all glyphs.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// The packed bytes of a single glyph.
    pub fn glyph_bitmap(&self, glyph: &Glyph) -> &[u8] {
        &self.bitmap[glyph.index..glyph.index + glyph.byte_len()]
    }

    /// The (scaled) pixels of each parsed glyph, parallel to
    /// [`parsed_glyphs`][Self::parsed_glyphs].
    pub fn images(&self) -> &[PixelMatrix] {
        &self.images
    }

    /// The height of the tallest glyph.
    pub fn y_advance(&self) -> usize {
        self.y_advance
    }
}

/// The state accumulated while compiling a font.
///
/// Glyphs are added one at a time, in order; each is scaled, packed and
/// appended to the shared bitmap stream.
#[derive(Debug)]
pub struct CompileSession<'a> {
    options: &'a CompileOptions,
    glyphs: Vec<Glyph>,
    bitmap: Vec<u8>,
    images: Vec<PixelMatrix>,
    y_advance: usize,
}

impl<'a> CompileSession<'a> {
    pub fn new(options: &'a CompileOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(CompileSession {
            options,
            glyphs: Vec::new(),
            bitmap: Vec::new(),
            images: Vec::new(),
            y_advance: 0,
        })
    }

    /// Scale, pack and append a glyph, returning its record.
    pub fn add_glyph(&mut self, scanned: ScannedGlyph) -> Result<&Glyph, ParseError> {
        let ScannedGlyph { name, matrix, line } = scanned;
        let err = |kind| ParseError::new(line, Some(name.as_str()), kind);
        let limits = &self.options.limits;
        if self.glyphs.len() >= limits.max_glyphs {
            return Err(err(ParseErrorKind::TooManyGlyphs(limits.max_glyphs)));
        }

        let factor = self.options.factor;
        // limits apply before the scaled matrix is allocated
        let (width, height) = scale::scaled_size(matrix.width(), matrix.height(), factor);
        let too_large = || {
            err(ParseErrorKind::GlyphTooLarge {
                width,
                height,
                max_width: limits.scaled_width,
                max_height: limits.scaled_height,
            })
        };
        if width > limits.scaled_width || height > limits.scaled_height {
            return Err(too_large());
        }
        let image = if factor == 1.0 {
            matrix
        } else {
            scale::scale(&matrix, factor).ok_or_else(too_large)?
        };
        let packed = pack::pack(&image).map_err(err)?;

        let glyph = Glyph::new(name, self.bitmap.len(), &image, packed.rightmost);
        log::debug!(
            "glyph {} '{}': {}x{} at offset {}",
            self.glyphs.len(),
            glyph.name,
            glyph.width,
            glyph.height,
            glyph.index
        );
        self.y_advance = self.y_advance.max(glyph.height);
        self.bitmap.extend_from_slice(&packed.bytes);
        self.images.push(image);
        self.glyphs.push(glyph);
        Ok(&self.glyphs[self.glyphs.len() - 1])
    }

    /// Finish the session, producing the font table.
    ///
    /// `line` is reported if the font turns out to be empty.
    pub fn finish(self, line: usize) -> Result<FontTable, ParseError> {
        if self.glyphs.is_empty() {
            return Err(ParseError::new(line, None, ParseErrorKind::NoGlyphs));
        }
        log::info!(
            "compiled {} glyphs into {} bytes, y advance {}",
            self.glyphs.len(),
            self.bitmap.len(),
            self.y_advance
        );
        Ok(FontTable {
            glyphs: self.glyphs,
            bitmap: self.bitmap,
            images: self.images,
            y_advance: self.y_advance,
        })
    }
}

/// Compile a font from its source lines.
///
/// Stops at the first error; nothing is produced unless every glyph compiles.
pub fn compile<I, S>(lines: I, options: &CompileOptions) -> Result<FontTable, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut session = CompileSession::new(options)?;
    let mut scanner = Scanner::new(lines, &options.limits);
    for glyph in scanner.by_ref() {
        session.add_glyph(glyph?)?;
    }
    Ok(session.finish(scanner.line())?)
}

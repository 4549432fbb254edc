//! Segmenting glyph source text into named pixel matrices.
//!
//! The source format is line oriented:
//!
//! ```text
//! // A                                  <- names the next glyph
//! /*| 8 4 2 1 8 4 2 1 |*/               <- ruler, ignored
//! /*| X . . . . . . X |*/               <- a pixel row
//! /*| . . . . . . . , |*/
//! };                                    <- ends the input
//! ```
//!
//! `.` and `,` are off pixels, `X` and `x` are on pixels. Any other line is
//! ignored.

use crate::{
    error::{ParseError, ParseErrorKind},
    matrix::PixelMatrix,
    session::Limits,
};

/// Introduces a glyph name.
pub const NAME_MARKER: &str = "//";
/// Introduces a pixel row.
pub const ROW_INTRODUCER: &str = "/*|";
/// The first token of a ruler line.
pub const RULER_TOKEN: &str = "8";
/// Any token starting with this ends a pixel row.
pub const ROW_TERMINATOR: char = '|';
/// A line containing this ends the input.
pub const END_MARKER: char = '}';

/// A glyph as found in the source, before scaling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedGlyph {
    pub name: String,
    pub matrix: PixelMatrix,
    /// The line of the glyph's first pixel row.
    pub line: usize,
}

#[derive(Debug)]
enum ScanState {
    Seeking,
    InGlyph(PendingGlyph),
    Done,
}

#[derive(Debug)]
struct PendingGlyph {
    name: Option<String>,
    matrix: PixelMatrix,
    line: usize,
}

impl PendingGlyph {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn finish(self) -> Option<ScannedGlyph> {
        // a block made only of ruler lines has no pixels, and produces nothing
        if self.matrix.height() == 0 {
            log::warn!("line {}: skipping glyph block with no pixel rows", self.line);
            return None;
        }
        Some(ScannedGlyph {
            name: self.name.unwrap_or_default(),
            matrix: self.matrix,
            line: self.line,
        })
    }
}

/// An iterator over the glyphs in a sequence of source lines.
///
/// Lines are consumed lazily; each call to `next` reads only as far as the
/// end of the next glyph. After an error the scanner is exhausted.
pub struct Scanner<'a, I> {
    lines: I,
    line_no: usize,
    state: ScanState,
    pending_name: Option<String>,
    limits: &'a Limits,
}

impl<'a, I, S> Scanner<'a, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: impl IntoIterator<IntoIter = I>, limits: &'a Limits) -> Self {
        Scanner {
            lines: lines.into_iter(),
            line_no: 0,
            state: ScanState::Seeking,
            pending_name: None,
            limits,
        }
    }

    /// The number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line_no
    }

    fn step(&mut self) -> Result<Option<ScannedGlyph>, ParseError> {
        loop {
            let Some(line) = self.lines.next() else {
                let glyph = match &self.state {
                    ScanState::InGlyph(glyph) => glyph.name(),
                    _ => self.pending_name.as_deref(),
                };
                return Err(ParseError::new(
                    self.line_no + 1,
                    glyph,
                    ParseErrorKind::UnexpectedEof,
                ));
            };
            self.line_no += 1;
            let line = line.as_ref();

            if line.contains(END_MARKER) {
                let finished = match std::mem::replace(&mut self.state, ScanState::Done) {
                    ScanState::InGlyph(glyph) => glyph.finish(),
                    _ => None,
                };
                return Ok(finished);
            }

            if let Some(row) = line.strip_prefix(ROW_INTRODUCER) {
                self.scan_row(row)?;
                continue;
            }

            let finished = match std::mem::replace(&mut self.state, ScanState::Seeking) {
                ScanState::InGlyph(glyph) => glyph.finish(),
                _ => None,
            };
            if let Some(name) = line.strip_prefix(NAME_MARKER) {
                self.pending_name = Some(name.to_owned());
            }
            if finished.is_some() {
                return Ok(finished);
            }
        }
    }

    fn scan_row(&mut self, row: &str) -> Result<(), ParseError> {
        let line = self.line_no;
        if !matches!(self.state, ScanState::InGlyph(_)) {
            self.state = ScanState::InGlyph(PendingGlyph {
                name: None,
                matrix: PixelMatrix::default(),
                line,
            });
        }
        let ScanState::InGlyph(glyph) = &mut self.state else {
            unreachable!("state was just set");
        };

        let mut tokens = row.split_whitespace().peekable();
        if tokens.peek() == Some(&RULER_TOKEN) {
            return Ok(());
        }
        if glyph.matrix.height() == 0 {
            // the first real row claims the name
            glyph.name = self.pending_name.take();
            glyph.line = line;
        }
        let err = |kind| ParseError::new(line, glyph.name(), kind);

        let mut pixels = Vec::new();
        let mut terminated = false;
        for token in tokens {
            match token {
                "." | "," => pixels.push(false),
                "X" | "x" => pixels.push(true),
                t if t.starts_with(ROW_TERMINATOR) => {
                    terminated = true;
                    break;
                }
                other => return Err(err(ParseErrorKind::InvalidPixelToken(other.into()))),
            }
        }
        if !terminated {
            return Err(err(ParseErrorKind::MissingRowTerminator));
        }
        if pixels.is_empty() {
            return Err(err(ParseErrorKind::EmptyPixelRow));
        }

        let expected = glyph.matrix.width();
        if glyph.matrix.height() > 0 && pixels.len() != expected {
            return Err(err(ParseErrorKind::InconsistentRowWidth {
                expected,
                found: pixels.len(),
            }));
        }
        let (max_width, max_height) = (self.limits.source_width, self.limits.source_height);
        if pixels.len() > max_width || glyph.matrix.height() >= max_height {
            return Err(err(ParseErrorKind::GlyphTooLarge {
                width: pixels.len(),
                height: glyph.matrix.height() + 1,
                max_width,
                max_height,
            }));
        }
        glyph.matrix.push_row(&pixels);
        Ok(())
    }
}

impl<I, S> Iterator for Scanner<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<ScannedGlyph, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, ScanState::Done) {
            return None;
        }
        match self.step() {
            Ok(Some(glyph)) => Some(Ok(glyph)),
            Ok(None) => None,
            Err(e) => {
                self.state = ScanState::Done;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Result<Vec<ScannedGlyph>, ParseError> {
        let limits = Limits::default();
        Scanner::new(text.lines(), &limits).collect()
    }

    #[test]
    fn single_glyph() {
        let glyphs = scan(
            "// A\n\
             /*| 8 4 2 1 8 4 2 1 |*/\n\
             /*| X . . . . . . X |*/\n\
             /*| . . . , . . . . |*/\n\
             };",
        )
        .unwrap();
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].name, " A");
        assert_eq!(glyphs[0].line, 3);
        assert_eq!(
            glyphs[0].matrix,
            PixelMatrix::from_picture(["X......X", "........"]).unwrap()
        );
    }

    #[test]
    fn names_follow_blocks_directly() {
        let glyphs = scan(
            "// one\n\
             /*| X . . . . . . . |*/\n\
             // two\n\
             /*| . x . . . . . . |*/\n\
             }",
        )
        .unwrap();
        let names = glyphs.iter().map(|g| g.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, [" one", " two"]);
        assert!(glyphs[1].matrix.get(0, 1));
    }

    #[test]
    fn later_name_replaces_earlier() {
        let glyphs = scan(
            "// first\n\
             some other text\n\
             // second\n\
             /*| X . . . . . . . |*/\n\
             }",
        )
        .unwrap();
        assert_eq!(glyphs[0].name, " second");
    }

    #[test]
    fn name_keeps_surrounding_whitespace() {
        let glyphs = scan("//  A wide name  \n/*| X . . . . . . . |*/\n}").unwrap();
        assert_eq!(glyphs[0].name, "  A wide name  ");
        let glyphs = scan("//\n/*| X . . . . . . . |*/\n}").unwrap();
        assert_eq!(glyphs[0].name, "");
    }

    #[test]
    fn unnamed_glyph_has_empty_name() {
        let glyphs = scan("/*| X . . . . . . . |*/\n}").unwrap();
        assert_eq!(glyphs[0].name, "");
    }

    #[test]
    fn ruler_only_block_is_skipped() {
        let glyphs = scan(
            "// ghost\n\
             /*| 8 4 2 1 8 4 2 1 |*/\n\
             \n\
             /*| X X . . . . . . |*/\n\
             }",
        )
        .unwrap();
        // the name stays pending until a real pixel row claims it
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].name, " ghost");
    }

    #[test]
    fn stops_at_closing_brace() {
        let glyphs = scan(
            "/*| X . . . . . . . |*/\n\
             };\n\
             /*| X . . . . . . . |*/\n",
        )
        .unwrap();
        assert_eq!(glyphs.len(), 1);
    }

    #[test]
    fn missing_brace() {
        let err = scan("// A\n/*| X . . . . . . . |*/\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn inconsistent_width() {
        let err = scan(
            "// A\n\
             /*| X . . . . . . . |*/\n\
             /*| X . . . . . . |*/\n\
             }",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 3,
                glyph: Some("A".into()),
                kind: ParseErrorKind::InconsistentRowWidth {
                    expected: 8,
                    found: 7
                },
            }
        );
    }

    #[test]
    fn bad_token() {
        let err = scan("/*| X o . . . . . . |*/\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPixelToken("o".into()));
        assert_eq!(err.glyph, None);
    }

    #[test]
    fn unterminated_row() {
        let err = scan("/*| X . . . . . . .\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingRowTerminator);
        let err = scan("/*|\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingRowTerminator);
    }

    #[test]
    fn empty_row() {
        let err = scan("// A\n/*| |*/\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPixelRow);
        assert_eq!(err.line, 2);
        // a ruler is still fine on its own
        assert!(scan("/*| 8 |*/\n/*| X . . . . . . . |*/\n}").is_ok());
    }

    #[test]
    fn too_tall() {
        let limits = Limits {
            source_height: 2,
            ..Default::default()
        };
        let text = "/*| X . |*/\n/*| X . |*/\n/*| X . |*/\n}";
        let err = Scanner::new(text.lines(), &limits)
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::GlyphTooLarge { height: 3, .. }
        ));
    }

    #[test]
    fn scanner_is_fused_after_error() {
        let limits = Limits::default();
        let mut scanner = Scanner::new(["/*| q |*/", "/*| X |*/", "}"], &limits);
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}

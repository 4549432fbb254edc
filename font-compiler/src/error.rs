//! Errors and diagnostics.

use std::{fmt, path::Path};

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceOffset};
use thiserror::Error;

/// An error in the glyph source, with enough context to find it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// The 1-based line on which the problem was found.
    pub line: usize,
    /// The name of the glyph being processed, trimmed, if one was known.
    pub glyph: Option<String>,
    pub kind: ParseErrorKind,
}

/// The specific problem behind a [`ParseError`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token '{0}' in pixel row (expected '.', ',', 'X' or 'x')")]
    InvalidPixelToken(String),
    #[error("pixel row is missing its closing '|*/'")]
    MissingRowTerminator,
    #[error("pixel row has {found} columns, but the glyph's first row has {expected}")]
    InconsistentRowWidth { expected: usize, found: usize },
    #[error("glyph width {0} is not a multiple of 8")]
    WidthNotByteAligned(usize),
    #[error("glyph is {width}x{height}, exceeding the limit of {max_width}x{max_height}")]
    GlyphTooLarge {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    #[error("font has more than {0} glyphs")]
    TooManyGlyphs(usize),
    #[error("input contains no glyphs")]
    NoGlyphs,
    #[error("pixel row has no pixels")]
    EmptyPixelRow,
    #[error("input ended before the closing '}}'")]
    UnexpectedEof,
}

impl ParseError {
    pub(crate) fn new(line: usize, glyph: Option<&str>, kind: ParseErrorKind) -> Self {
        ParseError {
            line,
            glyph: glyph.map(str::trim).filter(|name| !name.is_empty()).map(Into::into),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)?;
        if let Some(glyph) = &self.glyph {
            write!(f, " (glyph '{glyph}')")?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Any error produced while compiling a font.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid scale factor {0} (must be a finite value >= 1.0)")]
    InvalidFactor(f32),
}

/// A compile failure ready for display, with the source text attached when
/// there is a line to point at.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ErrorReport {
    message: String,
    source_text: Option<NamedSource>,
    label: Option<LabeledSpan>,
}

impl Diagnostic for ErrorReport {
    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source_text.as_ref().map(|text| text as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.label.clone()?;
        let labels: Box<dyn Iterator<Item = LabeledSpan>> = Box::new(std::iter::once(label));
        Some(labels)
    }
}

impl ErrorReport {
    pub fn message(message: impl Into<String>) -> Self {
        ErrorReport {
            message: message.into(),
            source_text: None,
            label: None,
        }
    }

    /// Attach a compile error to the source it came from.
    ///
    /// Parse errors label the offending line with the problem; anything else
    /// is reported as a plain message.
    pub fn from_error_src(error: &Error, path: &Path, text: String) -> Self {
        let Error::Parse(parse) = error else {
            return ErrorReport::message(format!("{}: {error}", path.display()));
        };
        let message = match &parse.glyph {
            Some(glyph) => format!("failed to compile glyph '{glyph}'"),
            None => "failed to compile font".into(),
        };
        ErrorReport {
            message,
            label: Some(line_label(&text, parse.line, parse.kind.to_string())),
            source_text: Some(NamedSource::new(path.to_string_lossy(), text)),
        }
    }
}

// a label over a 1-based line; past the last line (a missing '}') it sits
// at the end of the text
fn line_label(text: &str, line: usize, label: String) -> LabeledSpan {
    let content = line.checked_sub(1).and_then(|ix| text.lines().nth(ix));
    match content {
        Some(content) => {
            let start = SourceOffset::from_location(text, line, 1).offset();
            LabeledSpan::new(Some(label), start, content.len())
        }
        None => LabeledSpan::new(Some(label), text.len(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ParseError::new(
            12,
            Some("A"),
            ParseErrorKind::InconsistentRowWidth {
                expected: 8,
                found: 7,
            },
        );
        assert_eq!(
            err.to_string(),
            "line 12 (glyph 'A'): pixel row has 7 columns, but the glyph's first row has 8"
        );
        let err = ParseError::new(3, Some("  "), ParseErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "line 3: input ended before the closing '}'");
    }

    #[test]
    fn label_covers_line() {
        let text = "first\nsecond line\nthird";
        let label = line_label(text, 2, "here".into());
        assert_eq!((label.offset(), label.len()), (6, 11));
        assert_eq!(label.label(), Some("here"));
        for past_end in [0, 4] {
            let label = line_label(text, past_end, String::new());
            assert_eq!((label.offset(), label.len()), (text.len(), 0));
        }
    }

    #[test]
    fn plain_errors_have_no_source() {
        let error = Error::InvalidFactor(0.5);
        let report = ErrorReport::from_error_src(&error, Path::new("a.txt"), String::new());
        assert!(report.source_code().is_none());
        assert!(report.labels().is_none());
        assert!(report.to_string().starts_with("a.txt: invalid scale factor 0.5"));
    }
}

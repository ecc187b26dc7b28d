use crate::VIRTUAL_FILENAME;
use serde::Serialize;
use thiserror::Error;

pub type TransformResult = Result<String, TransformError>;

/// A transformation failure, ready to show to the user
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct TransformError {
    /// User facing message, e.g. `Line 2:5: Unexpected token "}"`
    pub message: String,

    /// 1-based line in the user's source
    pub line: Option<usize>,

    /// 1-based column (in characters)
    pub column: Option<usize>,

    /// Byte range in the user's source
    pub span: Option<(usize, usize)>,
}

impl TransformError {
    /// Error without a source location (parser setup failures and the like)
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: clean_message(&message.into()),
            line: None,
            column: None,
            span: None,
        }
    }

    /// Error at a location, phrased the way the parser reports it
    pub(crate) fn at(reason: &str, line: usize, column: usize, span: (usize, usize)) -> Self {
        let raw = format!("{}:{}:{}: {}", VIRTUAL_FILENAME, line, column, reason);

        Self {
            message: clean_message(&raw),
            line: Some(line),
            column: Some(column),
            span: Some(span),
        }
    }

    /// Pretty-print the error with source context using ariadne
    #[cfg(feature = "pretty-errors")]
    pub fn render(&self, source: &str, filename: &str) -> String {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let (start, end) = self.span.unwrap_or((source.len(), source.len()));
        let start = char_offset(source, start);
        let end = char_offset(source, end).max(start + 1);

        let mut output = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_color(Color::Red)
                    .with_message("here"),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output);

        match written {
            Ok(()) => String::from_utf8(output).unwrap_or_else(|_| self.message.clone()),
            Err(_) => self.message.clone(),
        }
    }
}

#[cfg(feature = "pretty-errors")]
fn char_offset(source: &str, byte: usize) -> usize {
    source
        .get(..byte.min(source.len()))
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
}

/// Make a parser message relative to the user's buffer.
///
/// A leading `usercode.jsx:` becomes `Line `, and the virtual filename is
/// dropped anywhere else it shows up.
pub fn clean_message(message: &str) -> String {
    let prefix = format!("{}:", VIRTUAL_FILENAME);
    let trimmed = message.trim_start_matches('/');

    let cleaned = match trimmed.strip_prefix(&prefix) {
        Some(rest) => format!("Line {}", rest.trim_start()),
        None => message.to_string(),
    };

    cleaned.replace(&prefix, "").replace(VIRTUAL_FILENAME, "")
}

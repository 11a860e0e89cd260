//! Syntax errors and their plain-text renderings

use crate::parser::token::{Location, Token, TokenKind};
use thiserror::Error;

/// Any lexical, grammatical, name-resolution or typing failure.
///
/// A `SyntaxError` always aborts compilation of the file it was raised in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    /// Offending span
    pub location: Location,

    /// Human-readable message
    pub message: String,
}

impl SyntaxError {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// `expected X, got Y`
    pub fn expected(expected: TokenKind, found: &Token) -> Self {
        Self::new(found.location, format!("expected {}, got {}", expected, found))
    }

    /// `unexpected X when parsing <context>`
    pub fn unexpected(found: &Token, context: &str) -> Self {
        Self::new(
            found.location,
            format!("unexpected {} when parsing {}", found, context),
        )
    }

    /// Parser exceeded a nesting limit
    pub fn parser_limit_exceeded(location: Location, message: impl Into<String>) -> Self {
        Self::new(location, message)
    }

    /// The full text of the line the error starts on, without its newline.
    pub fn source_line<'a>(&self, source: &'a str) -> &'a str {
        let index = self.location.start.line.saturating_sub(1) as usize;
        source
            .split('\n')
            .nth(index)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .unwrap_or("")
    }

    /// Numbered copy of the offending line followed by the gutter the
    /// underline is printed after:
    ///
    /// ```text
    ///   3 | local a: number = "s"
    ///     |
    /// ```
    pub fn snapshot(&self, source: &str) -> String {
        let gutter = format!("  {} ", self.location.start.line);
        format!(
            "{}| {}\n{}| ",
            gutter,
            self.source_line(source),
            " ".repeat(gutter.len())
        )
    }

    /// A `^~~~` marker aligned under the span. Spans running past the first
    /// line are underlined to the end of that line (`line_length` bytes).
    pub fn underline(&self, line_length: usize) -> String {
        let start = self.location.start.column as usize;
        let end = if self.location.start.line == self.location.end.line {
            self.location.end.column as usize
        } else {
            line_length
        };
        let end = end.max(start + 1);

        format!("{}^{}", " ".repeat(start), "~".repeat(end - start - 1))
    }
}

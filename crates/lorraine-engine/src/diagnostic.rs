//! Error rendering for the compiler session
//!
//! Detailed errors are rendered by codespan-reporting as a labeled source
//! snippet. The short form is a single `file:line:column: error: message`
//! header.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use std::io;

use crate::parser::ast::ModuleInfo;
use crate::parser::error::SyntaxError;

/// Where reported errors are written
pub enum DiagnosticSink {
    /// Standard error, colored when it is a terminal
    Stderr(StandardStream),
    /// In-memory buffer, without colors
    Buffer(Buffer),
}

impl DiagnosticSink {
    pub fn stderr() -> Self {
        DiagnosticSink::Stderr(StandardStream::stderr(ColorChoice::Auto))
    }

    pub fn buffer() -> Self {
        DiagnosticSink::Buffer(Buffer::no_color())
    }

    fn writer(&mut self) -> &mut dyn WriteColor {
        match self {
            DiagnosticSink::Stderr(stream) => stream as &mut dyn WriteColor,
            DiagnosticSink::Buffer(buffer) => buffer,
        }
    }

    /// Everything written so far, for buffered sinks
    pub fn contents(&self) -> Option<String> {
        match self {
            DiagnosticSink::Stderr(_) => None,
            DiagnosticSink::Buffer(buffer) => {
                Some(String::from_utf8_lossy(buffer.as_slice()).into_owned())
            }
        }
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticSink::Stderr(_) => f.write_str("Stderr"),
            DiagnosticSink::Buffer(_) => f.write_str("Buffer"),
        }
    }
}

/// `main.lua:3:7: error: unknown identifier 'x'`
pub fn header(info: &ModuleInfo, error: &SyntaxError) -> String {
    format!(
        "{}:{}: error: {}",
        info.path().display(),
        error.location.start,
        error.message
    )
}

/// Write one error to `sink`.
///
/// With `detailed` set the error is rendered as a snippet of the module's
/// source. Spans that do not map onto the source fall back to the header.
pub fn emit(
    sink: &mut DiagnosticSink,
    info: &ModuleInfo,
    error: &SyntaxError,
    detailed: bool,
) -> io::Result<()> {
    let writer = sink.writer();

    if detailed && info.source.get(error.location.range()).is_some() {
        let file = SimpleFile::new(info.path().display().to_string(), info.source.as_str());
        let diagnostic = Diagnostic::error()
            .with_message(error.message.clone())
            .with_labels(vec![Label::primary((), error.location.range())]);

        if term::emit(writer, &term::Config::default(), &file, &diagnostic).is_ok() {
            return Ok(());
        }
    }

    writeln!(writer, "{}", header(info, error))
}

use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
use ndf_syntax::SyntaxKind;
pub use text_size::TextRange;

/// A recovered error, kept so callers can show it after a best-effort load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
    line: u32,
    column: u32,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn error(message: impl Into<String>, range: TextRange, line: u32, column: u32) -> Self {
        Self { message: message.into(), range, line, column }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        Self::error(error.to_string(), error.range, error.line, error.column)
    }
}

/// The tokenizer never fails on malformed syntax; only reading the stream can.
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("source is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// An expected-token mismatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}, found {found:?}")]
pub struct ParseError {
    pub message: String,
    pub found: SyntaxKind,
    pub range: TextRange,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("invalid path `{path}`: {reason}")]
    Syntax { path: String, reason: &'static str },
    #[error("no value at `{0}`")]
    NotFound(String),
    #[error("index {index} out of range for `{path}` (length {len})")]
    IndexOutOfRange { path: String, index: usize, len: usize },
    #[error("`{0}` is not a container")]
    NotAContainer(String),
    #[error("`{path}` is {found}, expected {expected}")]
    KindMismatch { path: String, expected: &'static str, found: &'static str },
    #[error("wildcard segments must be expanded before `{0}` is used")]
    Wildcard(String),
}

//! Recursive-descent parser from an NDF token stream to a [`SourceFile`].
//!
//! Parsing never aborts: a malformed declaration is reported as a
//! [`Diagnostic`] and skipped up to the next declaration start, and its
//! tokens stay in the gap in front of the next declaration so that writing the
//! file back still reproduces them.

use ndf_errors::Diagnostic;
use ndf_model::{SourceFile, Value};
use ndf_syntax::SyntaxKind;
use ndf_tokenizer::Tokens;

mod grammar;
mod parser;

#[derive(Debug, Clone)]
pub struct Parse {
    pub file: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse(tokens: &Tokens) -> Parse {
    let mut parser = parser::Parser::new(tokens);
    let file = grammar::decls::source_file(&mut parser);
    let diagnostics = parser.finish();
    tracing::debug!(declarations = file.len(), diagnostics = diagnostics.len(), "parsed");
    Parse { file, diagnostics }
}

/// Tokenizes and parses `text`, returning the retained token stream too.
pub fn parse_text(text: &str) -> (Tokens, Parse) {
    let tokens = ndf_tokenizer::tokenize(text);
    let parse = parse(&tokens);
    (tokens, parse)
}

/// Parses a lone value such as `[1, 2]` or `TUnit(Speed = 3)`. The result
/// carries no spans and can be placed into any tree.
pub fn parse_value(text: &str) -> Result<Value, Diagnostic> {
    let tokens = ndf_tokenizer::tokenize(text);
    let mut parser = parser::Parser::new(&tokens);
    let mut value = grammar::values::value(&mut parser)?;
    if !parser.at(SyntaxKind::EOF) {
        return Err(parser.error("expected end of value").into());
    }
    value.detach();
    Ok(value)
}

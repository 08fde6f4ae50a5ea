use ndf_model::{DeclKind, Declaration, Gap, SourceFile, TokenSpan};
use ndf_syntax::SyntaxKind::*;
use ndf_syntax::SyntaxSet;

use super::values;
use crate::parser::{PResult, Parser};

pub(crate) fn source_file(p: &mut Parser<'_>) -> SourceFile {
    let mut declarations = Vec::new();
    let mut previous_end = None;

    while !p.at(EOF) {
        let start = p.current();
        match declaration(p, previous_end) {
            Ok(decl) => {
                previous_end = decl.span().map(TokenSpan::end);
                declarations.push(decl);
            }
            Err(error) => {
                p.report(error);
                recover(p, start);
            }
        }
    }

    let trailer = Gap { after: previous_end, before: p.current() };
    SourceFile::new(declarations, Some(trailer))
}

fn declaration(p: &mut Parser<'_>, previous_end: Option<usize>) -> PResult<Declaration> {
    let start = p.current();

    let (kind, name) = match p.peek_kind() {
        EXPORT_KW => {
            p.advance();
            let name = p.expect(NAME, "expected a name after `export`")?;
            p.expect(IS_KW, "expected `is` after declaration name")?;
            (DeclKind::Exported, Some(p.exact(name).to_owned()))
        }
        RESOURCE_REF => {
            let name = p.advance();
            p.expect(IS_KW, "expected `is` after absolute path")?;
            (DeclKind::AbsolutePath, Some(p.exact(name).to_owned()))
        }
        UNNAMED_KW => {
            p.advance();
            (DeclKind::Unnamed, None)
        }
        NAME => {
            let descriptor = p.nth_kind(1) == IS_KW && p.nth_kind(2) == NAME && p.nth_kind(3) == LEFT_PAREN;
            let name = p.advance();
            p.expect(IS_KW, "expected `is` after declaration name")?;
            let kind = if descriptor { DeclKind::Descriptor } else { DeclKind::Constant };
            (kind, Some(p.exact(name).to_owned()))
        }
        _ => return Err(p.error("expected a declaration")),
    };

    let header = p.text_from(start);
    let value = values::value(p)?;
    let end = p.last().unwrap_or(start);
    let gap = Gap { after: previous_end, before: start };

    Ok(Declaration::parsed(kind, name, value, TokenSpan::new(start, end), gap, header))
}

/// Skips to the next token that can start a declaration: `export`,
/// `unnamed`, `$/Path is`, or `Name is` at the start of a line. Always
/// consumes at least one token.
fn recover(p: &mut Parser<'_>, start: usize) {
    if p.current() == start {
        p.advance();
    }

    while !p.at(EOF) && !at_declaration_start(p) {
        p.advance();
    }

    tracing::debug!(skipped_from = start, resumed_at = p.current(), "resynchronized");
}

/// Tokens that start a declaration wherever they appear.
const DECLARATION_KEYWORDS: SyntaxSet = SyntaxSet::new([EXPORT_KW, UNNAMED_KW]);

fn at_declaration_start(p: &Parser<'_>) -> bool {
    match p.peek_kind() {
        kind if DECLARATION_KEYWORDS.contains(kind) => true,
        RESOURCE_REF => p.nth_kind(1) == IS_KW,
        NAME => p.at_line_start() && p.nth_kind(1) == IS_KW,
        _ => false,
    }
}

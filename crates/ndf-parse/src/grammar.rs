use ndf_model::{ContainerFormat, Element, ElementFormat, Sequence};
use ndf_syntax::SyntaxKind::{self, *};

use crate::parser::{PResult, Parser};

pub(crate) mod decls;
pub(crate) mod values;

/// Parses `bra item, item ket`, recording the text around every element and
/// whether a comma followed it.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    closing_message: &'static str,
) -> PResult<Sequence> {
    p.expect(bra, closing_message)?;

    let mut elements = Vec::new();
    while !p.at(ket) {
        if p.at(EOF) {
            return Err(p.error(closing_message));
        }

        let prefix = p.gap();
        let value = values::value(p)?;
        let (comma, suffix) = separator(p);
        elements.push(Element { value, comma, format: Some(ElementFormat { prefix, suffix }) });

        if !comma && !p.at(ket) {
            return Err(p.error(closing_message));
        }
    }

    let close_prefix = p.gap();
    p.expect(ket, closing_message)?;

    Ok(Sequence { elements, format: Some(ContainerFormat { open: String::new(), close_prefix }) })
}

/// Consumes an optional comma. The returned text sits between the preceding
/// value and the comma; without a comma it stays with whatever follows.
pub(crate) fn separator(p: &mut Parser<'_>) -> (bool, String) {
    if p.at(COMMA) {
        let suffix = p.gap();
        p.advance();
        (true, suffix)
    } else {
        (false, String::new())
    }
}

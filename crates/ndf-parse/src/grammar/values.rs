use ndf_model::{
    ARGUMENTS, ContainerFormat, EntryFormat, EnumValue, Map, MapEntry, Number, Object,
    ObjectFormat, ObjectStyle, Property, PropertyFormat, StringValue, TemplateRef, TokenSpan, Value,
    ValueKind,
};
use ndf_syntax::SyntaxKind::*;
use ndf_tokenizer::TokenValue;

use super::{delimited, separator};
use crate::parser::{PResult, Parser};

/// A value, folding operator chains (`A | B`, `2 * X`) into one raw
/// expression.
pub(crate) fn value(p: &mut Parser<'_>) -> PResult<Value> {
    let start = p.current();
    let first = operand(p)?;

    if !p.peek_kind().is_operator() {
        return Ok(first);
    }

    while p.peek_kind().is_operator() {
        p.advance();
        operand(p)?;
    }

    let end = p.last().unwrap_or(start);
    let text = p.tokens().span_text(start, end).to_owned();
    Ok(Value::parsed(ValueKind::Raw(text), TokenSpan::new(start, end)))
}

fn operand(p: &mut Parser<'_>) -> PResult<Value> {
    let kind = match p.peek_kind() {
        NAME => return name_led(p),
        LEFT_BRACKET => {
            let start = p.current();
            let sequence = delimited(p, LEFT_BRACKET, RIGHT_BRACKET, "expected `,` or `]`")?;
            return Ok(spanned(p, ValueKind::Array(sequence), start));
        }
        LEFT_PAREN => {
            let start = p.current();
            let sequence = delimited(p, LEFT_PAREN, RIGHT_PAREN, "expected `,` or `)`")?;
            return Ok(spanned(p, ValueKind::Tuple(sequence), start));
        }
        MAP_KW => return map(p),
        NUMBER => match p.tokens()[p.current()].value {
            TokenValue::Number { value, integral } => {
                ValueKind::Number(Number::parsed(value, integral))
            }
            _ => unreachable!("number tokens carry a decoded value"),
        },
        STRING => match &p.tokens()[p.current()].value {
            TokenValue::String { text, quote } => {
                ValueKind::String(StringValue::with_quote(&**text, *quote))
            }
            _ => unreachable!("string tokens carry a decoded value"),
        },
        TRUE_KW => ValueKind::Boolean(true),
        FALSE_KW => ValueKind::Boolean(false),
        NIL_KW => ValueKind::Null,
        ENUM => {
            let text = p.exact(p.current());
            match EnumValue::parse(text) {
                Some(value) => ValueKind::Enum(value),
                None => ValueKind::Raw(text.to_owned()),
            }
        }
        GUID => {
            let text = p.exact(p.current());
            let inner = text.strip_prefix("GUID:{").unwrap_or(text);
            ValueKind::Guid(inner.strip_suffix('}').unwrap_or(inner).to_owned())
        }
        TEMPLATE_REF => ValueKind::TemplateRef(TemplateRef::new(sigil_path(p.exact(p.current())))),
        RESOURCE_REF => ValueKind::ResourceRef(sigil_path(p.exact(p.current())).to_owned()),
        _ => return Err(p.error("expected a value")),
    };

    let index = p.advance();
    Ok(Value::parsed(kind, TokenSpan::new(index, index)))
}

fn spanned(p: &Parser<'_>, kind: ValueKind, start: usize) -> Value {
    Value::parsed(kind, TokenSpan::new(start, p.last().unwrap_or(start)))
}

fn sigil_path(text: &str) -> &str {
    text.get(2..).unwrap_or_default()
}

/// `Name is Type(...)`, `Name is ~/Template`, `Type(...)`, `Type[...]` or a
/// bare identifier.
fn name_led(p: &mut Parser<'_>) -> PResult<Value> {
    let start = p.current();

    if p.nth_kind(1) != IS_KW {
        return type_led(p);
    }

    let name_index = p.advance();
    let name = p.exact(name_index).to_owned();
    p.advance();
    let head = p.text_from(start).split_off(name.len());

    match p.peek_kind() {
        TEMPLATE_REF => {
            let index = p.advance();
            let path = sigil_path(p.exact(index)).to_owned();
            let template = TemplateRef { path, instance_name: Some(name), head: Some(head) };
            Ok(spanned(p, ValueKind::TemplateRef(template), start))
        }
        NAME => {
            let mut value = type_led(p)?;
            let Some(object) = value.as_object_mut() else {
                return Err(p.error("expected an object or template after `is`"));
            };
            object.instance_name = Some(name);
            if let Some(format) = &mut object.format {
                format.head = head;
            }
            let kind = value.into_kind();
            Ok(spanned(p, kind, start))
        }
        _ => Err(p.error("expected an object or template after `is`")),
    }
}

fn type_led(p: &mut Parser<'_>) -> PResult<Value> {
    let start = p.advance();
    let type_name = p.exact(start).to_owned();

    let object = match p.peek_kind() {
        LEFT_BRACKET => {
            let open = p.gap();
            let arguments_start = p.current();
            let sequence = delimited(p, LEFT_BRACKET, RIGHT_BRACKET, "expected `,` or `]`")?;
            let arguments = spanned(p, ValueKind::Array(sequence), arguments_start);
            call(type_name, ObjectStyle::Bracketed, open, arguments)
        }
        LEFT_PAREN if p.lookahead(named_parameter_head) => {
            let open = p.gap();
            let (properties, close_prefix) = properties(p)?;
            let format = ObjectFormat { head: String::new(), open, close_prefix };
            Object {
                type_name,
                instance_name: None,
                style: ObjectStyle::Block,
                properties,
                format: Some(format),
            }
        }
        LEFT_PAREN => {
            let open = p.gap();
            let arguments_start = p.current();
            let sequence = delimited(p, LEFT_PAREN, RIGHT_PAREN, "expected `,` or `)`")?;
            let arguments = spanned(p, ValueKind::Tuple(sequence), arguments_start);
            call(type_name, ObjectStyle::Call, open, arguments)
        }
        _ => return Ok(Value::parsed(ValueKind::Raw(type_name), TokenSpan::new(start, start))),
    };

    Ok(spanned(p, ValueKind::Object(object), start))
}

fn call(type_name: String, style: ObjectStyle, open: String, arguments: Value) -> Object {
    let property = Property { name: ARGUMENTS.to_owned(), value: arguments, comma: false, format: None };
    Object {
        type_name,
        instance_name: None,
        style,
        properties: vec![property],
        format: Some(ObjectFormat { head: String::new(), open, close_prefix: String::new() }),
    }
}

/// `(` followed by `)`, `name =` or `Name is`: a property list rather than
/// a positional call.
fn named_parameter_head(p: &mut Parser<'_>) -> PResult<()> {
    p.expect(LEFT_PAREN, "expected `(`")?;
    if p.eat(RIGHT_PAREN) {
        return Ok(());
    }
    p.expect(NAME, "expected a parameter name")?;
    if p.eat(IS_KW) {
        return Ok(());
    }
    p.expect(EQ, "expected `=`")?;
    Ok(())
}

fn properties(p: &mut Parser<'_>) -> PResult<(Vec<Property>, String)> {
    p.expect(LEFT_PAREN, "expected `(`")?;

    let mut properties = Vec::new();
    while !p.at(RIGHT_PAREN) {
        if p.at(EOF) {
            return Err(p.error("expected `)`"));
        }

        let prefix = p.gap();
        if p.at(NAME) && p.nth_kind(1) == IS_KW {
            let value = name_led(p)?;
            let name = value.kind().instance_name().unwrap_or_default().to_owned();
            let (comma, suffix) = separator(p);
            let format = PropertyFormat { prefix, suffix, ..PropertyFormat::default() };
            properties.push(Property { name, value, comma, format: Some(format) });
            continue;
        }

        let name_index = p.expect(NAME, "expected a property name")?;
        let name = p.exact(name_index).to_owned();
        let before_eq = p.gap();
        p.expect(EQ, "expected `=` after property name")?;
        let after_eq = p.gap();
        let value = value(p)?;
        let (comma, suffix) = separator(p);

        let format = PropertyFormat { prefix, before_eq, after_eq, suffix };
        properties.push(Property { name, value, comma, format: Some(format) });
    }

    let close_prefix = p.gap();
    p.expect(RIGHT_PAREN, "expected `)`")?;
    Ok((properties, close_prefix))
}

/// `MAP [ (key, value), ... ]`
fn map(p: &mut Parser<'_>) -> PResult<Value> {
    let start = p.advance();
    let open = p.gap();
    p.expect(LEFT_BRACKET, "expected `[` after `MAP`")?;

    let mut entries = Vec::new();
    while !p.at(RIGHT_BRACKET) {
        if p.at(EOF) {
            return Err(p.error("expected `]`"));
        }

        let prefix = p.gap();
        p.expect(LEFT_PAREN, "expected `(` to start a map entry")?;
        let entry_open = p.gap();
        let key = value(p)?;
        let before_comma = p.gap();
        p.expect(COMMA, "expected `,` between map key and value")?;
        let after_comma = p.gap();
        let entry_value = value(p)?;
        let close = p.gap();
        p.expect(RIGHT_PAREN, "expected `)` to end a map entry")?;
        let (comma, suffix) = separator(p);

        let format =
            EntryFormat { prefix, open: entry_open, before_comma, after_comma, close, suffix };
        entries.push(MapEntry { key, value: entry_value, comma, format: Some(format) });

        if !comma && !p.at(RIGHT_BRACKET) {
            return Err(p.error("expected `,` or `]`"));
        }
    }

    let close_prefix = p.gap();
    p.expect(RIGHT_BRACKET, "expected `]`")?;

    let map = Map { entries, format: Some(ContainerFormat { open, close_prefix }) };
    Ok(spanned(p, ValueKind::Map(map), start))
}

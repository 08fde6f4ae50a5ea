use std::borrow::Cow;
use std::fmt;

use ndf_syntax::Quote;

use crate::TokenSpan;
use crate::container::{Map, Object, Sequence};

/// A node of the value tree together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    kind: ValueKind,
    span: Option<TokenSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    String(StringValue),
    Number(Number),
    Boolean(bool),
    Array(Sequence),
    Tuple(Sequence),
    Map(Map),
    Object(Object),
    Enum(EnumValue),
    /// Contents between the braces of `GUID:{...}`.
    Guid(String),
    TemplateRef(TemplateRef),
    /// Path after the `$/` sigil.
    ResourceRef(String),
    /// Opaque source text, such as an operator chain or a bare identifier.
    Raw(String),
    Null,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind, span: None }
    }

    /// A value that reproduces the tokens in `span` verbatim until modified.
    pub fn parsed(kind: ValueKind, span: TokenSpan) -> Self {
        Self { kind, span: Some(span) }
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Mutable access to the contents. Drops this node's span.
    pub fn kind_mut(&mut self) -> &mut ValueKind {
        self.span = None;
        &mut self.kind
    }

    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    pub fn span(&self) -> Option<TokenSpan> {
        self.span
    }

    pub fn is_pristine(&self) -> bool {
        self.span.is_some()
    }

    /// Replaces the contents verbatim, including any quote style.
    pub fn set(&mut self, kind: ValueKind) {
        self.span = None;
        self.kind = kind;
    }

    /// Replaces the contents, keeping presentation the new value does not
    /// speak to: a string written over a string keeps the old delimiter.
    pub fn assign(&mut self, kind: ValueKind) {
        let kind = match (&self.kind, kind) {
            (ValueKind::String(old), ValueKind::String(new)) => {
                ValueKind::String(StringValue { text: new.text, quote: old.quote })
            }
            (_, kind) => kind,
        };
        self.set(kind);
    }

    /// Drops the spans of this node and all of its descendants, so that it
    /// can be moved into a tree parsed from other text.
    pub fn detach(&mut self) {
        match self.kind_mut() {
            ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => {
                for element in &mut sequence.elements {
                    element.value.detach();
                }
            }
            ValueKind::Map(map) => {
                for entry in &mut map.entries {
                    entry.key.detach();
                    entry.value.detach();
                }
            }
            ValueKind::Object(object) => {
                for property in &mut object.properties {
                    property.value.detach();
                }
            }
            _ => {}
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ValueKind::String(StringValue::new(text)))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ValueKind::Number(Number::integer(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ValueKind::Number(Number::float(value)))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ValueKind::Boolean(value))
    }

    pub fn template(path: impl Into<String>) -> Self {
        Self::new(ValueKind::TemplateRef(TemplateRef::new(path)))
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(ValueKind::Raw(text.into()))
    }

    pub fn null() -> Self {
        Self::new(ValueKind::Null)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match &self.kind {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self.kind_mut() {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.kind {
            ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self.kind_mut() {
            ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match &self.kind {
            ValueKind::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(string) => Some(&string.text),
            _ => None,
        }
    }
}

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Self::new(kind)
    }
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Enum(_) => "enum",
            Self::Guid(_) => "guid",
            Self::TemplateRef(_) => "template reference",
            Self::ResourceRef(_) => "resource reference",
            Self::Raw(_) => "raw expression",
            Self::Null => "null",
        }
    }

    /// Name introduced by `Name is Type(...)` or `Name is ~/Template`.
    pub fn instance_name(&self) -> Option<&str> {
        match self {
            Self::Object(object) => object.instance_name.as_deref(),
            Self::TemplateRef(template) => template.instance_name.as_deref(),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Tuple(_) | Self::Map(_) | Self::Object(_))
    }

    /// Text a map key is looked up by.
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        Some(match self {
            Self::String(string) => Cow::Borrowed(&string.text),
            Self::Raw(raw) => Cow::Borrowed(raw),
            Self::Enum(value) => Cow::Owned(value.to_string()),
            Self::Number(number) => Cow::Owned(number.to_string()),
            Self::TemplateRef(template) => Cow::Owned(format!("~/{}", template.path)),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    pub text: String,
    pub quote: Quote,
}

impl StringValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), quote: Quote::default() }
    }

    pub fn with_quote(text: impl Into<String>, quote: Quote) -> Self {
        Self { text: text.into(), quote }
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = self.quote.char();
        write!(f, "{quote}")?;
        for c in self.text.chars() {
            if c == quote || c == '\\' {
                write!(f, "\\")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "{quote}")
    }
}

/// A numeric literal. `integral` records that the source had no decimal
/// point and is carried through every arithmetic edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    value: f64,
    integral: bool,
}

impl Number {
    pub fn parsed(value: f64, integral: bool) -> Self {
        Self { value, integral: integral && value.fract() == 0.0 }
    }

    pub fn integer(value: i64) -> Self {
        Self { value: value as f64, integral: true }
    }

    pub fn float(value: f64) -> Self {
        Self { value, integral: false }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn is_integral(self) -> bool {
        self.integral
    }

    /// Applies `f`, staying integral only while the result has no fraction.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        let value = f(self.value);
        Self { value, integral: self.integral && value.fract() == 0.0 }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        self.map(|value| value * factor)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.value.is_finite() {
            return write!(f, "{}", self.value);
        }
        if self.integral && self.value.abs() < i64::MAX as f64 {
            return write!(f, "{}", self.value as i64);
        }
        if self.value.fract() == 0.0 {
            write!(f, "{:.1}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// `Type/Variant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

impl EnumValue {
    pub fn parse(text: &str) -> Option<Self> {
        let (type_name, variant) = text.split_once('/')?;
        Some(Self { type_name: type_name.to_owned(), variant: variant.to_owned() })
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.variant)
    }
}

/// `~/Path`, optionally introduced as `Name is ~/Path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    /// Path after the `~/` sigil.
    pub path: String,
    pub instance_name: Option<String>,
    /// Text between the instance name and the `~/` token when parsed.
    pub head: Option<String>,
}

impl TemplateRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), instance_name: None, head: None }
    }

    pub fn named(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { path: path.into(), instance_name: Some(name.into()), head: None }
    }
}

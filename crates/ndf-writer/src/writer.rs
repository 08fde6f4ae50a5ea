use std::fmt::Write as _;

use ndf_model::{
    ARGUMENTS, DeclKind, Declaration, Map, Object, ObjectStyle, Property, Sequence, SourceFile,
    Value, ValueKind,
};
use ndf_tokenizer::Tokens;

use crate::{DirtySet, WriterOptions};

/// How children of a container without recorded formatting are laid out.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `[a,b]`
    Compact,
    /// `[a, b]`
    Inline,
    /// One child per line.
    Lines,
    /// One child per line, every child followed by a comma.
    ModuleList,
}

pub(crate) struct Writer<'a> {
    tokens: &'a Tokens,
    options: &'a WriterOptions,
    out: String,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(tokens: &'a Tokens, options: &'a WriterOptions) -> Self {
        Self { tokens, options, out: String::new() }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    pub(crate) fn file(&mut self, file: &SourceFile, dirty: &DirtySet) {
        for (index, decl) in file.declarations.iter().enumerate() {
            match decl.gap() {
                Some(gap) => {
                    let mut text = self.tokens.text_between(gap.after, gap.before);
                    if self.out.is_empty() && gap.after.is_some() {
                        // The declarations in front of this one are gone.
                        text = text.trim_start_matches(['\r', '\n']);
                    } else if gap.after.is_none() && !self.out.is_empty() && !text.starts_with('\n') {
                        // Leading text of the file, now behind another declaration.
                        self.out.push('\n');
                    }
                    self.out.push_str(text);
                }
                None if self.out.is_empty() => {}
                None => self.out.push_str("\n\n"),
            }

            match decl.span() {
                Some(span) if !dirty.contains(&index) => {
                    tracing::trace!(index, name = decl.name(), "replaying declaration");
                    self.out.push_str(self.tokens.span_text(span.start(), span.end()));
                }
                _ => {
                    tracing::trace!(index, name = decl.name(), "regenerating declaration");
                    self.declaration(decl);
                }
            }
        }

        match file.trailer() {
            Some(trailer) => {
                self.out.push_str(self.tokens.text_between(trailer.after, trailer.before));
            }
            None if !self.out.is_empty() => self.out.push('\n'),
            None => {}
        }
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl.header() {
            Some(header) => self.out.push_str(header),
            None => {
                let name = decl.name().unwrap_or_default();
                _ = match decl.kind() {
                    DeclKind::Exported => write!(self.out, "export {name} is "),
                    DeclKind::Unnamed => write!(self.out, "unnamed "),
                    DeclKind::AbsolutePath | DeclKind::Descriptor | DeclKind::Constant => {
                        write!(self.out, "{name} is ")
                    }
                };
            }
        }
        match decl.value().kind() {
            ValueKind::Object(object) if !decl.value().is_pristine() => self.object(object, true),
            _ => self.value(decl.value(), false),
        }
    }

    pub(crate) fn value(&mut self, value: &Value, module_list: bool) {
        if let Some(span) = value.span() {
            self.out.push_str(self.tokens.span_text(span.start(), span.end()));
            return;
        }

        _ = match value.kind() {
            ValueKind::String(string) => write!(self.out, "{string}"),
            ValueKind::Number(number) => write!(self.out, "{number}"),
            ValueKind::Boolean(true) => write!(self.out, "True"),
            ValueKind::Boolean(false) => write!(self.out, "False"),
            ValueKind::Null => write!(self.out, "nil"),
            ValueKind::Enum(value) => write!(self.out, "{value}"),
            ValueKind::Guid(guid) => write!(self.out, "GUID:{{{guid}}}"),
            ValueKind::ResourceRef(path) => write!(self.out, "$/{path}"),
            ValueKind::Raw(text) => write!(self.out, "{text}"),
            ValueKind::TemplateRef(template) => {
                if let Some(name) = &template.instance_name {
                    self.out.push_str(name);
                    self.out.push_str(template.head.as_deref().unwrap_or(" is "));
                }
                write!(self.out, "~/{}", template.path)
            }
            ValueKind::Array(sequence) => {
                let layout = if module_list { Layout::ModuleList } else { default_layout(sequence) };
                self.sequence(sequence, ("[", "]"), layout);
                Ok(())
            }
            ValueKind::Tuple(sequence) => {
                self.sequence(sequence, ("(", ")"), Layout::Inline);
                Ok(())
            }
            ValueKind::Map(map) => {
                self.map(map);
                Ok(())
            }
            ValueKind::Object(object) => {
                self.object(object, false);
                Ok(())
            }
        };
    }

    fn sequence(&mut self, sequence: &Sequence, (open, close): (&str, &str), layout: Layout) {
        let indent = self.line_indent();
        let inner = format!("{indent}{}", self.unit());
        let last = sequence.len().saturating_sub(1);
        let mut previous = sequence
            .elements
            .iter()
            .find_map(|element| element.format.as_ref().map(|format| layout_of(&format.prefix)));

        self.out.push_str(open);
        for (index, element) in sequence.elements.iter().enumerate() {
            match &element.format {
                Some(format) => {
                    self.out.push_str(&format.prefix);
                    previous = Some(layout_of(&format.prefix));
                }
                None => match &previous {
                    Some(prefix) => self.out.push_str(prefix),
                    None => match layout {
                        Layout::Compact => {}
                        Layout::Inline if index == 0 => {}
                        Layout::Inline => self.out.push(' '),
                        Layout::Lines | Layout::ModuleList => {
                            self.out.push('\n');
                            self.out.push_str(&inner);
                        }
                    },
                },
            }

            self.value(&element.value, false);

            if let Some(format) = &element.format {
                self.out.push_str(&format.suffix);
            }
            let trailing = element.format.is_none() && layout == Layout::ModuleList;
            if element.comma || index != last || trailing {
                self.out.push(',');
            }
        }

        match &sequence.format {
            Some(format) => self.out.push_str(&format.close_prefix),
            None if matches!(layout, Layout::Lines | Layout::ModuleList) && !sequence.is_empty() => {
                self.out.push('\n');
                self.out.push_str(&indent);
            }
            None => {}
        }
        self.out.push_str(close);
    }

    /// `top_level` marks the object a declaration is bound to.
    fn object(&mut self, object: &Object, top_level: bool) {
        let format = object.format.as_ref();

        if let Some(name) = &object.instance_name {
            self.out.push_str(name);
            match format.map(|format| format.head.as_str()) {
                Some(head) if !head.is_empty() => self.out.push_str(head),
                _ => self.out.push_str(" is "),
            }
        }
        self.out.push_str(&object.type_name);
        if let Some(format) = format {
            self.out.push_str(&format.open);
        }

        let (delimiters, layout) = match object.style {
            ObjectStyle::Block => return self.properties(object, top_level),
            ObjectStyle::Bracketed => (("[", "]"), Layout::Compact),
            ObjectStyle::Call => (("(", ")"), Layout::Inline),
        };

        match object.get(ARGUMENTS) {
            Some(arguments) if arguments.is_pristine() => self.value(arguments, false),
            Some(arguments) => match arguments.as_sequence() {
                Some(sequence) => self.sequence(sequence, delimiters, layout),
                None => self.value(arguments, false),
            },
            None => {
                self.out.push_str(delimiters.0);
                self.out.push_str(delimiters.1);
            }
        }
    }

    fn properties(&mut self, object: &Object, top_level: bool) {
        let indent = self.line_indent();
        let inner = format!("{indent}{}", self.unit());
        let last = object.properties.len().saturating_sub(1);
        let hinted = object.properties.iter().any(|property| property.format.is_some());
        let uses_commas = !hinted
            || object.properties.iter().any(|property| property.format.is_some() && property.comma);
        let mut previous = object
            .properties
            .iter()
            .find_map(|property| property.format.as_ref().map(|format| layout_of(&format.prefix)));

        self.out.push('(');
        for (index, property) in object.properties.iter().enumerate() {
            match &property.format {
                Some(format) => {
                    self.out.push_str(&format.prefix);
                    previous = Some(layout_of(&format.prefix));
                }
                None => {
                    let prefix = previous.clone().unwrap_or_else(|| format!("\n{inner}"));
                    self.out.push_str(&prefix);
                }
            }

            if !property.is_instance() {
                self.out.push_str(&property.name);
                match &property.format {
                    Some(format) => {
                        self.out.push_str(&format.before_eq);
                        self.out.push('=');
                        self.out.push_str(&format.after_eq);
                    }
                    None => self.out.push_str(" = "),
                }
            }

            let module_list = top_level && self.is_module_list(object, property);
            self.value(&property.value, module_list);

            if let Some(format) = &property.format {
                self.out.push_str(&format.suffix);
            }
            if property.comma || (uses_commas && index != last) {
                self.out.push(',');
            }
        }

        match &object.format {
            Some(format) => self.out.push_str(&format.close_prefix),
            None if !object.properties.is_empty() => {
                self.out.push('\n');
                self.out.push_str(&indent);
            }
            None => {}
        }
        self.out.push(')');
    }

    fn map(&mut self, map: &Map) {
        let indent = self.line_indent();
        let inner = format!("{indent}{}", self.unit());
        let last = map.len().saturating_sub(1);
        let mut previous = map
            .entries
            .iter()
            .find_map(|entry| entry.format.as_ref().map(|format| layout_of(&format.prefix)));

        self.out.push_str("MAP");
        match &map.format {
            Some(format) => self.out.push_str(&format.open),
            None => self.out.push(' '),
        }
        self.out.push('[');

        for (index, entry) in map.entries.iter().enumerate() {
            let format = entry.format.as_ref();
            match format {
                Some(format) => {
                    self.out.push_str(&format.prefix);
                    previous = Some(layout_of(&format.prefix));
                }
                None => {
                    let prefix = previous.clone().unwrap_or_else(|| format!("\n{inner}"));
                    self.out.push_str(&prefix);
                }
            }

            self.out.push('(');
            self.out.push_str(format.map_or("", |format| format.open.as_str()));
            self.value(&entry.key, false);
            self.out.push_str(format.map_or("", |format| format.before_comma.as_str()));
            self.out.push(',');
            self.out.push_str(format.map_or(" ", |format| format.after_comma.as_str()));
            self.value(&entry.value, false);
            self.out.push_str(format.map_or("", |format| format.close.as_str()));
            self.out.push(')');
            self.out.push_str(format.map_or("", |format| format.suffix.as_str()));

            if entry.comma || index != last {
                self.out.push(',');
            }
        }

        match &map.format {
            Some(format) => self.out.push_str(&format.close_prefix),
            None if !map.is_empty() => {
                self.out.push('\n');
                self.out.push_str(&indent);
            }
            None => {}
        }
        self.out.push(']');
    }

    fn is_module_list(&self, object: &Object, property: &Property) -> bool {
        self.options.module_list().is_some_and(|rule| {
            rule.declaration_type == object.type_name && rule.property == property.name
        })
    }

    fn unit(&self) -> String {
        " ".repeat(self.options.indent)
    }

    /// Leading whitespace of the line being written.
    fn line_indent(&self) -> String {
        let line = self.out.rsplit('\n').next().unwrap_or_default();
        let content = line.trim_start_matches([' ', '\t']);
        line[..line.len() - content.len()].to_owned()
    }
}

/// The whitespace a new sibling should start with, taken from a recorded
/// prefix: its last line break and indentation, or the prefix itself when it
/// is plain inline spacing.
fn layout_of(prefix: &str) -> String {
    match prefix.rfind('\n') {
        Some(newline) => {
            let indentation = &prefix[newline + 1..];
            let indentation = &indentation[..indentation.len() - indentation.trim_start().len()];
            format!("\n{indentation}")
        }
        None if prefix.trim().is_empty() => prefix.to_owned(),
        None => " ".to_owned(),
    }
}

fn default_layout(sequence: &Sequence) -> Layout {
    let has_blocks = sequence.values().any(|value| {
        matches!(value.kind(), ValueKind::Object(object) if object.style == ObjectStyle::Block)
    });
    if has_blocks { Layout::Lines } else { Layout::Inline }
}

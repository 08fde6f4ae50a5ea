use crate::{Gap, TokenSpan, Value, ValueKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `export Name is ...`
    Exported,
    /// `$/Path is ...`
    AbsolutePath,
    /// `Name is Type(...)`
    Descriptor,
    /// `Name is <value>`
    Constant,
    /// `unnamed Type(...)`
    Unnamed,
}

/// A top-level definition: the unit of dirty tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    kind: DeclKind,
    name: Option<String>,
    value: Value,
    span: Option<TokenSpan>,
    gap: Option<Gap>,
    header: Option<String>,
}

impl Declaration {
    /// A declaration created after parsing. It is always regenerated.
    pub fn new(kind: DeclKind, name: Option<String>, value: Value) -> Self {
        Self { kind, name, value, span: None, gap: None, header: None }
    }

    /// A parsed declaration. `header` is the source text from its first
    /// token up to its value.
    pub fn parsed(
        kind: DeclKind,
        name: Option<String>,
        value: Value,
        span: TokenSpan,
        gap: Gap,
        header: String,
    ) -> Self {
        Self { kind, name, value, span: Some(span), gap: Some(gap), header: Some(header) }
    }

    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_exported(&self) -> bool {
        self.kind == DeclKind::Exported
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the value. Drops the declaration's span.
    pub fn value_mut(&mut self) -> &mut Value {
        self.span = None;
        &mut self.value
    }

    pub fn set_value(&mut self, value: Value) {
        self.span = None;
        self.value = value;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.span = None;
        self.header = None;
        self.name = Some(name.into());
    }

    pub fn span(&self) -> Option<TokenSpan> {
        self.span
    }

    pub fn is_pristine(&self) -> bool {
        self.span.is_some()
    }

    pub fn gap(&self) -> Option<Gap> {
        self.gap
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Type name of an object-valued declaration.
    pub fn type_name(&self) -> Option<&str> {
        match self.value.kind() {
            ValueKind::Object(object) => Some(&object.type_name),
            _ => None,
        }
    }
}

/// All top-level declarations of one file, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub declarations: Vec<Declaration>,
    trailer: Option<Gap>,
}

impl SourceFile {
    pub fn new(declarations: Vec<Declaration>, trailer: Option<Gap>) -> Self {
        Self { declarations, trailer }
    }

    /// Filler after the last parsed declaration.
    pub fn trailer(&self) -> Option<Gap> {
        self.trailer
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Declaration> {
        self.declarations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Declaration> {
        self.declarations.get_mut(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.declarations.iter().position(|decl| decl.name() == Some(name))
    }

    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.position(name).map(|index| &self.declarations[index])
    }

    /// True while the declarations still tile the original token stream:
    /// every one is pristine, none was removed, reordered or added.
    pub fn is_contiguous(&self) -> bool {
        let mut previous_end = None;
        for decl in &self.declarations {
            let (Some(span), Some(gap)) = (decl.span, decl.gap) else {
                return false;
            };
            if gap.after != previous_end || gap.before != span.start() {
                return false;
            }
            previous_end = Some(span.end());
        }
        self.trailer.is_some_and(|trailer| trailer.after == previous_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;

    fn decl(start: usize, end: usize, after: Option<usize>) -> Declaration {
        Declaration::parsed(
            DeclKind::Exported,
            Some(format!("D{start}")),
            Value::parsed(ValueKind::Object(Object::new("T")), TokenSpan::new(start + 3, end)),
            TokenSpan::new(start, end),
            Gap { after, before: start },
            "export D is ".to_owned(),
        )
    }

    #[test]
    fn contiguity_tracks_removal_and_mutation() {
        let file = SourceFile::new(
            vec![decl(0, 6, None), decl(7, 13, Some(6))],
            Some(Gap { after: Some(13), before: 14 }),
        );
        assert!(file.is_contiguous());

        let mut removed = file.clone();
        removed.declarations.remove(0);
        assert!(!removed.is_contiguous());

        let mut edited = file.clone();
        edited.declarations[1].value_mut().as_object_mut().unwrap().type_name = "U".into();
        assert!(!edited.is_contiguous());
        assert!(!edited.declarations[1].value().is_pristine());

        let mut added = file;
        added.declarations.push(Declaration::new(DeclKind::Constant, Some("C".into()), Value::null()));
        assert!(!added.is_contiguous());
    }

    #[test]
    fn lookup_by_name() {
        let file = SourceFile::new(vec![decl(0, 6, None), decl(7, 13, Some(6))], None);
        assert_eq!(file.position("D7"), Some(1));
        assert_eq!(file.find("D0").and_then(Declaration::type_name), Some("T"));
        assert!(file.find("missing").is_none());
        assert!(!file.is_contiguous());
    }
}

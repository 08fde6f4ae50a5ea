use crate::Value;

/// Name of the single property holding the arguments of a bracketed
/// (`RGBA[0, 0, 0, 255]`) or positional (`Vector(1, 2)`) call.
pub const ARGUMENTS: &str = "Arguments";

trait Separated {
    fn comma(&self) -> bool;
    fn set_comma(&mut self, comma: bool);
}

/// Removes `items[index]`. When the last item goes, the new last item takes
/// over its separator so a list without a trailing comma does not grow one.
fn remove_separated<T: Separated>(items: &mut Vec<T>, index: usize) -> Option<T> {
    if index >= items.len() {
        return None;
    }
    let removed = items.remove(index);
    if index == items.len()
        && let Some(last) = items.last_mut()
    {
        last.set_comma(removed.comma());
    }
    Some(removed)
}

/// Source text around a container's delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFormat {
    /// Between the preceding head (a type name, `MAP`) and the opening
    /// delimiter. Empty for plain arrays and tuples.
    pub open: String,
    /// Between the last child (or its comma) and the closing delimiter.
    pub close_prefix: String,
}

/// Source text around one positional child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementFormat {
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub value: Value,
    pub comma: bool,
    pub format: Option<ElementFormat>,
}

impl Element {
    pub fn new(value: Value) -> Self {
        Self { value, comma: false, format: None }
    }
}

impl Separated for Element {
    fn comma(&self) -> bool {
        self.comma
    }

    fn set_comma(&mut self, comma: bool) {
        self.comma = comma;
    }
}

/// Children of an array (`[...]`) or a tuple (`(...)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub elements: Vec<Element>,
    pub format: Option<ContainerFormat>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self { elements: values.into_iter().map(Element::new).collect(), format: None }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index).map(|element| &element.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.elements.get_mut(index).map(|element| &mut element.value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter().map(|element| &element.value)
    }

    pub fn push(&mut self, value: Value) {
        self.elements.push(Element::new(value));
    }

    /// Inserts before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: Value) -> bool {
        if index > self.elements.len() {
            return false;
        }
        let mut element = Element::new(value);
        element.comma = index < self.elements.len();
        self.elements.insert(index, element);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        remove_separated(&mut self.elements, index).map(|element| element.value)
    }
}

/// Source text around one `name = value` property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFormat {
    pub prefix: String,
    pub before_eq: String,
    pub after_eq: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
    pub comma: bool,
    pub format: Option<PropertyFormat>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self { name: name.into(), value, comma: false, format: None }
    }

    /// A `Name is Type(...)` member, written without `Name =`: the value
    /// carries the property's name as its instance name.
    pub fn is_instance(&self) -> bool {
        self.value.kind().instance_name() == Some(self.name.as_str())
    }
}

impl Separated for Property {
    fn comma(&self) -> bool {
        self.comma
    }

    fn set_comma(&mut self, comma: bool) {
        self.comma = comma;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectStyle {
    /// `Type( Name = value ... )`
    #[default]
    Block,
    /// `Type[ ... ]`: one [`ARGUMENTS`] property holding an array.
    Bracketed,
    /// `Type( a, b )`: one [`ARGUMENTS`] property holding a tuple.
    Call,
}

/// Source text around an object's head and delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFormat {
    /// Between the instance name and the type name (` is `).
    pub head: String,
    /// Between the type name and the opening delimiter.
    pub open: String,
    /// Before the closing delimiter of a block object.
    pub close_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub type_name: String,
    pub instance_name: Option<String>,
    pub style: ObjectStyle,
    pub properties: Vec<Property>,
    pub format: Option<ObjectFormat>,
}

impl Object {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            instance_name: None,
            style: ObjectStyle::Block,
            properties: Vec::new(),
            format: None,
        }
    }

    /// A `Type[...]` object over `values`.
    pub fn bracketed(type_name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        let array = Value::new(crate::ValueKind::Array(Sequence::from_values(values)));
        let mut object = Self::new(type_name);
        object.style = ObjectStyle::Bracketed;
        object.properties.push(Property::new(ARGUMENTS, array));
        object
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|property| property.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.property(name).map(|property| &property.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.properties
            .iter_mut()
            .find(|property| property.name == name)
            .map(|property| &mut property.value)
    }

    /// Replaces the value of `name`, keeping its layout, or appends a new
    /// property. Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.properties.push(Property::new(name, value));
                None
            }
        }
    }

    /// Inserts a new property before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, name: impl Into<String>, value: Value) -> bool {
        if index > self.properties.len() {
            return false;
        }
        let mut property = Property::new(name, value);
        property.comma = index < self.properties.len()
            && self.properties.get(index).is_some_and(|next| next.comma);
        self.properties.insert(index, property);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.position(name)?;
        remove_separated(&mut self.properties, index).map(|property| property.value)
    }

    /// Values of a bracketed or positional call.
    pub fn arguments(&self) -> Option<&Sequence> {
        match self.style {
            ObjectStyle::Block => None,
            ObjectStyle::Bracketed | ObjectStyle::Call => self.get(ARGUMENTS)?.as_sequence(),
        }
    }
}

/// Source text around one `(key, value)` map entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFormat {
    pub prefix: String,
    /// After the entry's `(`.
    pub open: String,
    pub before_comma: String,
    pub after_comma: String,
    /// Before the entry's `)`.
    pub close: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
    pub comma: bool,
    pub format: Option<EntryFormat>,
}

impl MapEntry {
    pub fn new(key: Value, value: Value) -> Self {
        Self { key, value, comma: false, format: None }
    }
}

impl Separated for MapEntry {
    fn comma(&self) -> bool {
        self.comma
    }

    fn set_comma(&mut self, comma: bool) {
        self.comma = comma;
    }
}

/// `MAP [ (key, value), ... ]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    pub entries: Vec<MapEntry>,
    pub format: Option<ContainerFormat>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key.kind().key_text().as_deref() == Some(key))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|index| &self.entries[index].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let index = self.position(key)?;
        Some(&mut self.entries[index].value)
    }

    /// Replaces the value under `key` or appends a new entry.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let existing = key.kind().key_text().and_then(|text| self.position(&text));
        match existing {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].value, value)),
            None => {
                self.entries.push(MapEntry::new(key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.position(key)?;
        remove_separated(&mut self.entries, index).map(|entry| entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenSpan, ValueKind};

    fn parsed_array(len: usize, trailing_comma: bool) -> Sequence {
        let mut sequence = Sequence::from_values((0..len).map(|i| Value::integer(i as i64)));
        let last = len - 1;
        for (i, element) in sequence.elements.iter_mut().enumerate() {
            element.comma = i != last || trailing_comma;
        }
        sequence
    }

    #[test]
    fn removing_last_element_moves_its_comma() {
        let mut sequence = parsed_array(3, false);
        assert_eq!(sequence.remove(2), Some(Value::integer(2)));
        assert_eq!(sequence.elements.iter().map(|e| e.comma).collect::<Vec<_>>(), [true, false]);

        let mut sequence = parsed_array(3, true);
        sequence.remove(2);
        assert_eq!(sequence.elements.iter().map(|e| e.comma).collect::<Vec<_>>(), [true, true]);

        let mut sequence = parsed_array(3, false);
        sequence.remove(0);
        assert_eq!(sequence.elements.iter().map(|e| e.comma).collect::<Vec<_>>(), [true, false]);
        assert_eq!(sequence.remove(7), None);
    }

    #[test]
    fn insert_before_existing_elements_adds_separator() {
        let mut sequence = parsed_array(2, false);
        assert!(sequence.insert(1, Value::integer(9)));
        assert!(sequence.elements[1].comma);
        assert!(sequence.insert(3, Value::integer(10)));
        assert!(!sequence.elements[3].comma);
        assert!(!sequence.insert(9, Value::null()));
    }

    #[test]
    fn object_set_keeps_layout_of_existing_property() {
        let mut object = Object::new("TUnit").with_property("Speed", Value::integer(10));
        object.properties[0].comma = true;
        object.properties[0].format = Some(PropertyFormat {
            prefix: "\n  ".into(),
            before_eq: " ".into(),
            after_eq: " ".into(),
            suffix: String::new(),
        });

        let old = object.set("Speed", Value::integer(20));
        assert_eq!(old, Some(Value::integer(10)));
        assert!(object.properties[0].comma);
        assert!(object.properties[0].format.is_some());

        assert_eq!(object.set("Name", Value::string("X")), None);
        assert_eq!(object.properties.len(), 2);
        assert_eq!(object.remove("Name"), Some(Value::string("X")));
        // `Speed` is last again and takes over the separator `Name` had.
        assert!(!object.properties[0].comma);
        assert!(object.properties[0].format.is_some());
    }

    #[test]
    fn named_members_are_instances() {
        let model = Value::new(ValueKind::Object(Object::new("TModel").named("Model")));
        assert!(Property::new("Model", model.clone()).is_instance());
        assert!(!Property::new("Other", model).is_instance());
        assert!(!Property::new("Speed", Value::integer(1)).is_instance());
    }

    #[test]
    fn mutable_descent_invalidates_each_level() {
        let inner = Value::parsed(ValueKind::Number(crate::Number::integer(1)), TokenSpan::new(4, 4));
        let mut object = Object::new("T");
        object.properties.push(Property::new("A", inner));
        let mut root = Value::parsed(ValueKind::Object(object), TokenSpan::new(0, 5));

        let object = root.as_object_mut().unwrap();
        assert!(object.get("A").unwrap().is_pristine());
        object.get_mut("A").unwrap().set(ValueKind::Null);

        assert!(!root.is_pristine());
        assert!(!root.as_object().unwrap().get("A").unwrap().is_pristine());
    }

    #[test]
    fn map_lookup_by_key_text() {
        let mut map = Map::new();
        map.insert(Value::string("a"), Value::integer(1));
        map.insert(Value::raw("EKind/B"), Value::integer(2));
        assert_eq!(map.insert(Value::string("a"), Value::integer(3)), Some(Value::integer(1)));

        assert_eq!(map.get("a"), Some(&Value::integer(3)));
        assert_eq!(map.get("EKind/B"), Some(&Value::integer(2)));
        assert_eq!(map.remove("a"), Some(Value::integer(3)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn bracketed_objects_expose_arguments() {
        let color = Object::bracketed("RGBA", (0..4).map(Value::integer));
        assert_eq!(color.style, ObjectStyle::Bracketed);
        assert_eq!(color.arguments().map(Sequence::len), Some(4));
        assert!(Object::new("T").arguments().is_none());
    }
}

//! Structural addressing inside a value tree.
//!
//! A [`Path`] such as `ModulesDescriptors[3].Armor.Front` walks object
//! properties and map keys by name and sequence elements by index. `[*]`
//! stands for every index and is turned into concrete paths by [`expand`]
//! before anything is read or written through it.
//!
//! Lookups report absence with `Option`. Mutations go through the model's
//! invalidating accessors, so every node passed on the way down loses its
//! span; they validate the whole path first and leave the tree untouched
//! when it does not resolve.

mod path;

pub use ndf_errors::PathError;
pub use path::{Path, Segment};

use ndf_model::{ARGUMENTS, Map, Object, ObjectStyle, Sequence, StringValue, Value, ValueKind};

/// The node at `path`, or `None` if any segment does not resolve.
pub fn resolve<'v>(root: &'v Value, path: &Path) -> Option<&'v Value> {
    locate(root, path).ok()
}

/// Like [`resolve`], reporting why a path does not resolve.
pub fn locate<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, PathError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = step(current, segment, || path.prefix(depth + 1))?;
    }
    Ok(current)
}

/// Mutable access to the node at `path`. Every node on the way, `root`
/// included, is marked modified.
pub fn resolve_mut<'v>(root: &'v mut Value, path: &Path) -> Result<&'v mut Value, PathError> {
    locate(root, path)?;

    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = step_mut(current, segment, || path.prefix(depth + 1))?;
    }
    Ok(current)
}

/// Replaces every `[*]` with the indices present in `root`. Paths that stop
/// resolving along the way are dropped.
pub fn expand(root: &Value, path: &Path) -> Vec<Path> {
    let mut out = Vec::new();
    expand_into(root, path.segments(), &mut Path::root(), &mut out);
    out
}

fn expand_into(value: &Value, rest: &[Segment], prefix: &mut Path, out: &mut Vec<Path>) {
    let Some((segment, rest)) = rest.split_first() else {
        out.push(prefix.clone());
        return;
    };

    match segment {
        Segment::Wildcard => {
            let len = indexed(value).map_or(0, Sequence::len);
            for index in 0..len {
                let segment = Segment::Index(index);
                if let Ok(child) = step(value, &segment, Path::root) {
                    prefix.push(segment);
                    expand_into(child, rest, prefix, out);
                    prefix.pop();
                }
            }
        }
        segment => {
            if let Ok(child) = step(value, segment, Path::root) {
                prefix.push(segment.clone());
                expand_into(child, rest, prefix, out);
                prefix.pop();
            }
        }
    }
}

/// Writes `value` at `path`, keeping the quote style of a string it
/// replaces. Returns the previous value.
pub fn set(root: &mut Value, path: &Path, value: Value) -> Result<Value, PathError> {
    let slot = resolve_mut(root, path)?;
    let previous = slot.clone();
    slot.assign(value.into_kind());
    tracing::trace!(%path, "set");
    Ok(previous)
}

/// Removes the property, map entry or element at `path`.
pub fn remove(root: &mut Value, path: &Path) -> Result<Value, PathError> {
    let (parent_path, last) = split(path)?;
    locate(root, path)?;
    let parent = resolve_mut(root, &parent_path)?;

    let removed = match (parent.kind_mut(), last) {
        (ValueKind::Object(object), Segment::Name(name)) => object.remove(name),
        (ValueKind::Map(map), Segment::Name(key)) => map.remove(key),
        (ValueKind::Map(map), Segment::Index(index)) => {
            let key = map.entries.get(*index).and_then(|entry| entry.key.kind().key_text());
            match key.map(|key| key.into_owned()) {
                Some(key) => map.remove(&key),
                None => None,
            }
        }
        (kind, Segment::Index(index)) => sequence_mut(kind).and_then(|s| s.remove(*index)),
        _ => None,
    };

    tracing::trace!(%path, "remove");
    removed.ok_or_else(|| PathError::NotFound(path.to_string()))
}

/// Inserts a new node at `path`. An index inserts into a sequence before
/// that position (`len` appends); a name adds an object property or a map
/// entry, replacing an existing one of the same name.
pub fn insert(root: &mut Value, path: &Path, value: Value) -> Result<(), PathError> {
    let (parent_path, last) = split(path)?;
    let parent = locate(root, &parent_path)?;

    match (parent.kind(), last) {
        (ValueKind::Object(object), Segment::Name(_)) if object.style == ObjectStyle::Block => {}
        (ValueKind::Map(_), Segment::Name(_)) => {}
        (kind, Segment::Index(index)) => match indexed(parent) {
            Some(sequence) if *index <= sequence.len() => {}
            Some(sequence) => {
                return Err(PathError::IndexOutOfRange {
                    path: path.to_string(),
                    index: *index,
                    len: sequence.len(),
                });
            }
            None => return Err(mismatch(&parent_path, "an array or tuple", kind)),
        },
        (kind, _) => return Err(mismatch(&parent_path, "an object or map", kind)),
    }

    let parent = resolve_mut(root, &parent_path)?;
    match (parent.kind_mut(), last) {
        (ValueKind::Object(object), Segment::Name(name)) => {
            object.set(name.as_str(), value);
        }
        (ValueKind::Map(map), Segment::Name(key)) => {
            let key = map_key(map, key);
            map.insert(key, value);
        }
        (kind, Segment::Index(index)) => {
            if let Some(sequence) = sequence_mut(kind) {
                sequence.insert(*index, value);
            }
        }
        _ => {}
    }

    tracing::trace!(%path, "insert");
    Ok(())
}

fn split(path: &Path) -> Result<(Path, &Segment), PathError> {
    let Some((last, _)) = path.segments().split_last() else {
        return Err(PathError::Syntax { path: path.to_string(), reason: "empty path" });
    };
    if *last == Segment::Wildcard || !path.is_concrete() {
        return Err(PathError::Wildcard(path.to_string()));
    }
    Ok((path.prefix(path.segments().len() - 1), last))
}

/// A new map key shaped like the existing ones.
fn map_key(map: &Map, key: &str) -> Value {
    match map.entries.first().map(|entry| entry.key.kind()) {
        Some(ValueKind::String(string)) => {
            Value::new(ValueKind::String(StringValue::with_quote(key, string.quote)))
        }
        Some(ValueKind::Raw(_) | ValueKind::Enum(_)) => Value::raw(key),
        _ => Value::string(key),
    }
}

fn mismatch(path: &Path, expected: &'static str, found: &ValueKind) -> PathError {
    PathError::KindMismatch { path: path.to_string(), expected, found: found.name() }
}

/// Elements addressable by index: a sequence, or the arguments of a
/// bracketed or positional call.
fn indexed(value: &Value) -> Option<&Sequence> {
    match value.kind() {
        ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => Some(sequence),
        ValueKind::Object(object) => object.arguments(),
        _ => None,
    }
}

fn sequence_mut(kind: &mut ValueKind) -> Option<&mut Sequence> {
    match kind {
        ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => Some(sequence),
        ValueKind::Object(object) => arguments_mut(object),
        _ => None,
    }
}

fn arguments_mut(object: &mut Object) -> Option<&mut Sequence> {
    if object.style == ObjectStyle::Block {
        return None;
    }
    object.get_mut(ARGUMENTS)?.as_sequence_mut()
}

fn step<'v>(
    value: &'v Value,
    segment: &Segment,
    here: impl FnOnce() -> Path,
) -> Result<&'v Value, PathError> {
    match (value.kind(), segment) {
        (_, Segment::Wildcard) => Err(PathError::Wildcard(here().to_string())),
        (ValueKind::Object(object), Segment::Name(name)) => {
            object.get(name).ok_or_else(|| PathError::NotFound(here().to_string()))
        }
        (ValueKind::Map(map), Segment::Name(key)) => {
            map.get(key).ok_or_else(|| PathError::NotFound(here().to_string()))
        }
        (ValueKind::Map(map), Segment::Index(index)) => match map.entries.get(*index) {
            Some(entry) => Ok(&entry.value),
            None => Err(out_of_range(here(), *index, map.len())),
        },
        (kind, Segment::Index(index)) => match indexed(value) {
            Some(sequence) => {
                sequence.get(*index).ok_or_else(|| out_of_range(here(), *index, sequence.len()))
            }
            None if kind.is_container() => Err(mismatch(&here(), "an array or tuple", kind)),
            None => Err(PathError::NotAContainer(here().to_string())),
        },
        (kind, Segment::Name(_)) if kind.is_container() => {
            Err(mismatch(&here(), "an object or map", kind))
        }
        (_, Segment::Name(_)) => Err(PathError::NotAContainer(here().to_string())),
    }
}

fn step_mut<'v>(
    value: &'v mut Value,
    segment: &Segment,
    here: impl FnOnce() -> Path,
) -> Result<&'v mut Value, PathError> {
    let child = match (value.kind_mut(), segment) {
        (ValueKind::Object(object), Segment::Name(name)) => object.get_mut(name),
        (ValueKind::Map(map), Segment::Name(key)) => map.get_mut(key),
        (ValueKind::Map(map), Segment::Index(index)) => {
            map.entries.get_mut(*index).map(|entry| &mut entry.value)
        }
        (kind, Segment::Index(index)) => sequence_mut(kind).and_then(|s| s.get_mut(*index)),
        _ => None,
    };
    child.ok_or_else(|| PathError::NotFound(here().to_string()))
}

fn out_of_range(path: Path, index: usize, len: usize) -> PathError {
    PathError::IndexOutOfRange { path: path.to_string(), index, len }
}

#[cfg(test)]
mod tests;

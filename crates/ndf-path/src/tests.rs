use ndf_model::{Quote, Value, ValueKind};

use crate::{Path, PathError, expand, insert, locate, remove, resolve, resolve_mut, set};

const SOURCE: &str = "export U is TEntityDescriptor
(
    Speed = 10
    Name = 'X'
    Modules = [
        TA(Default = 1),
        TB(Default = 2),
        ~/Shared,
    ]
    Color = RGBA[0, 0, 0, 255]
    Lookup = MAP [ ('a', 1), ('b', 2) ]
)
";

fn root() -> Value {
    let (_, parse) = ndf_parse::parse_text(SOURCE);
    assert!(parse.diagnostics.is_empty());
    parse.file.declarations[0].value().clone()
}

fn path(text: &str) -> Path {
    Path::parse(text).unwrap()
}

fn number_at(root: &Value, text: &str) -> Option<f64> {
    resolve(root, &path(text))?.as_number().map(|number| number.value())
}

#[test]
fn resolves_properties_elements_and_keys() {
    let root = root();
    assert_eq!(number_at(&root, "Speed"), Some(10.0));
    assert_eq!(number_at(&root, "Modules[1].Default"), Some(2.0));
    assert_eq!(number_at(&root, "Color[3]"), Some(255.0));
    assert_eq!(number_at(&root, "Lookup.b"), Some(2.0));
    assert_eq!(number_at(&root, "Lookup[0]"), Some(1.0));
    assert!(resolve(&root, &Path::root()).is_some());
    assert!(resolve(&root, &path("Missing")).is_none());
}

#[test]
fn reports_why_a_path_does_not_resolve() {
    let root = root();
    assert_eq!(locate(&root, &path("Missing")), Err(PathError::NotFound("Missing".into())));
    assert_eq!(
        locate(&root, &path("Modules[5]")),
        Err(PathError::IndexOutOfRange { path: "Modules[5]".into(), index: 5, len: 3 })
    );
    assert_eq!(locate(&root, &path("Speed.X")), Err(PathError::NotAContainer("Speed.X".into())));
    assert_eq!(
        locate(&root, &path("Modules.X")),
        Err(PathError::KindMismatch {
            path: "Modules.X".into(),
            expected: "an object or map",
            found: "array",
        })
    );
    assert_eq!(
        locate(&root, &path("Modules[*]")),
        Err(PathError::Wildcard("Modules[*]".into()))
    );
}

#[test]
fn expands_wildcards_to_resolving_paths() {
    let root = root();
    let paths = expand(&root, &path("Modules[*].Default"));
    let paths = paths.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(paths, ["Modules[0].Default", "Modules[1].Default"]);

    assert_eq!(expand(&root, &path("Color[*]")).len(), 4);
    assert_eq!(expand(&root, &path("Speed")), [path("Speed")]);
    assert!(expand(&root, &path("Missing[*]")).is_empty());
}

#[test]
fn set_invalidates_only_the_walked_chain() {
    let mut root = root();
    let previous = set(&mut root, &path("Name"), Value::string("Y")).unwrap();
    assert_eq!(previous.as_str(), Some("X"));

    let name = resolve(&root, &path("Name")).unwrap();
    match name.kind() {
        ValueKind::String(string) => {
            assert_eq!(string.text, "Y");
            assert_eq!(string.quote, Quote::Single);
        }
        kind => panic!("expected a string, got {}", kind.name()),
    }
    assert!(!name.is_pristine());
    assert!(!root.is_pristine());
    assert!(resolve(&root, &path("Modules")).unwrap().is_pristine());
    assert!(resolve(&root, &path("Speed")).unwrap().is_pristine());
}

#[test]
fn nested_mutation_reaches_every_ancestor() {
    let mut root = root();
    let slot = resolve_mut(&mut root, &path("Modules[0].Default")).unwrap();
    slot.set(ValueKind::Number(ndf_model::Number::integer(5)));

    assert!(!root.is_pristine());
    assert!(!resolve(&root, &path("Modules")).unwrap().is_pristine());
    assert!(!resolve(&root, &path("Modules[0]")).unwrap().is_pristine());
    assert!(resolve(&root, &path("Modules[1]")).unwrap().is_pristine());
}

#[test]
fn failed_mutations_leave_the_tree_untouched() {
    let mut root = root();
    assert!(set(&mut root, &path("Modules[0].Missing"), Value::integer(1)).is_err());
    assert!(root.is_pristine());
    assert!(resolve(&root, &path("Modules")).unwrap().is_pristine());
}

#[test]
fn removes_elements_properties_and_entries() {
    let mut root = root();
    let removed = remove(&mut root, &path("Modules[2]")).unwrap();
    assert!(matches!(removed.kind(), ValueKind::TemplateRef(template) if template.path == "Shared"));
    assert_eq!(resolve(&root, &path("Modules")).unwrap().as_sequence().unwrap().len(), 2);

    assert!(remove(&mut root, &path("Speed")).is_ok());
    assert!(resolve(&root, &path("Speed")).is_none());

    assert!(remove(&mut root, &path("Lookup.a")).is_ok());
    assert_eq!(number_at(&root, "Lookup[0]"), Some(2.0));

    assert_eq!(
        remove(&mut root, &path("Modules[*]")),
        Err(PathError::Wildcard("Modules[*]".into()))
    );
}

#[test]
fn inserts_into_sequences_objects_and_maps() {
    let mut root = root();
    insert(&mut root, &path("Modules[0]"), Value::template("First")).unwrap();
    let modules = resolve(&root, &path("Modules")).unwrap().as_sequence().unwrap();
    assert_eq!(modules.len(), 4);
    assert!(modules.elements[0].comma);

    insert(&mut root, &path("Armor"), Value::integer(3)).unwrap();
    assert_eq!(number_at(&root, "Armor"), Some(3.0));

    insert(&mut root, &path("Lookup.c"), Value::integer(3)).unwrap();
    let lookup = resolve(&root, &path("Lookup")).unwrap();
    match lookup.kind() {
        ValueKind::Map(map) => match map.entries[2].key.kind() {
            ValueKind::String(key) => assert_eq!(key.quote, Quote::Single),
            kind => panic!("expected a string key, got {}", kind.name()),
        },
        kind => panic!("expected a map, got {}", kind.name()),
    }

    assert_eq!(
        insert(&mut root, &path("Modules[9]"), Value::null()),
        Err(PathError::IndexOutOfRange { path: "Modules[9]".into(), index: 9, len: 4 })
    );
    assert_eq!(
        insert(&mut root, &path("Speed.X"), Value::null()),
        Err(PathError::KindMismatch { path: "Speed".into(), expected: "an object or map", found: "number" })
    );
}

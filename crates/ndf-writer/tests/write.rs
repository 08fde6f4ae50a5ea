use ndf_model::{DeclKind, Declaration, Object, TemplateRef, Value, ValueKind};
use ndf_path::Path;
use ndf_tokenizer::Tokens;
use ndf_writer::{DirtySet, FileProfile, WriterOptions, write};

const UNITS: &str = "// Units

export A is TUnit
(
    Speed = 10 // km/h
    Name  = \"Alpha\"
    Ratio = 2.0
)

export B is TUnit
(
    Speed = 20
    Name  = 'Beta'
    Tags  = [ 'x', 'y' ]
)

export C is TUnit( Speed = 30 )
";

struct Fixture {
    tokens: Tokens,
    file: ndf_model::SourceFile,
    dirty: DirtySet,
    options: WriterOptions,
}

impl Fixture {
    fn new(text: &str) -> Self {
        let (tokens, parse) = ndf_parse::parse_text(text);
        let options =
            WriterOptions { profile: Some(FileProfile::detect(&parse.file)), ..WriterOptions::default() };
        Self { tokens, file: parse.file, dirty: DirtySet::default(), options }
    }

    fn edit(&mut self, decl: &str, f: impl FnOnce(&mut Value)) {
        let index = self.file.position(decl).unwrap();
        f(self.file.declarations[index].value_mut());
        self.dirty.insert(index);
    }

    fn set(&mut self, decl: &str, path: &str, value: Value) {
        self.edit(decl, |root| {
            ndf_path::set(root, &Path::parse(path).unwrap(), value).unwrap();
        });
    }

    fn write(&self) -> String {
        write(&self.file, &self.tokens, &self.dirty, &self.options)
    }
}

#[test]
fn untouched_file_is_identical() {
    for text in [
        UNITS,
        "",
        "// only a comment",
        "\u{feff}export A is T(X = 1)",
        "export A is T(X = 1)\r\n\r\nB is [1,2 , 3]\t\n/* tail */",
    ] {
        assert_eq!(Fixture::new(text).write(), text);
    }
}

#[test]
fn regenerating_untouched_declarations_is_lossless() {
    let mut fixture = Fixture::new(UNITS);
    fixture.dirty.extend(0..fixture.file.len());
    assert_eq!(fixture.write(), UNITS);
}

#[test]
fn single_value_edit() {
    let text = "export U is T(\n  Speed = 10,\n  Name = 'X'\n)\n";
    let mut fixture = Fixture::new(text);
    fixture.set("U", "Speed", Value::integer(20));
    assert_eq!(fixture.write(), "export U is T(\n  Speed = 20,\n  Name = 'X'\n)\n");
}

#[test]
fn edits_stay_local() {
    let mut fixture = Fixture::new(UNITS);
    fixture.set("B", "Speed", Value::integer(25));
    assert_eq!(fixture.write(), UNITS.replace("Speed = 20", "Speed = 25"));
}

#[test]
fn string_edits_keep_the_delimiter() {
    let mut fixture = Fixture::new(UNITS);
    fixture.set("A", "Name", Value::string("Omega"));
    assert_eq!(fixture.write(), UNITS.replace("\"Alpha\"", "\"Omega\""));
}

#[test]
fn regenerated_strings_escape_backslashes() {
    let text = r"export U is T
(
    Dir = 'C:\\'
    Quote = 'it\'s'
    Speed = 1
)
";
    let mut fixture = Fixture::new(text);
    fixture.edit("U", |root| {
        let object = root.as_object_mut().unwrap();
        for name in ["Dir", "Quote"] {
            let slot = object.get_mut(name).unwrap();
            let kind = slot.kind().clone();
            slot.set(kind);
        }
    });
    assert_eq!(fixture.write(), text);

    fixture.set("U", "Dir", Value::string(r"D:\Mods\"));
    let written = fixture.write();
    assert_eq!(written, text.replace(r"'C:\\'", r"'D:\\Mods\\'"));

    let (_, reparsed) = ndf_parse::parse_text(&written);
    assert!(reparsed.diagnostics.is_empty());
    let dir = reparsed.file.declarations[0].value().as_object().unwrap().get("Dir");
    assert_eq!(dir.and_then(Value::as_str), Some(r"D:\Mods\"));
}

#[test]
fn arithmetic_keeps_integral_numbers_integral() {
    let scale = |factor: f64| {
        move |root: &mut Value| {
            for name in ["Speed", "Ratio"] {
                let object = root.as_object_mut().unwrap();
                let slot = object.get_mut(name).unwrap();
                let number = slot.as_number().unwrap().scale(factor);
                slot.set(ValueKind::Number(number));
            }
        }
    };

    let mut fixture = Fixture::new(UNITS);
    fixture.edit("A", scale(1.5));
    assert_eq!(
        fixture.write(),
        UNITS.replace("Speed = 10 //", "Speed = 15 //").replace("Ratio = 2.0", "Ratio = 3.0")
    );

    let mut fixture = Fixture::new(UNITS);
    fixture.edit("A", scale(1.25));
    assert_eq!(
        fixture.write(),
        UNITS.replace("Speed = 10 //", "Speed = 12.5 //").replace("Ratio = 2.0", "Ratio = 2.5")
    );
}

#[test]
fn appended_elements_follow_their_siblings() {
    let mut fixture = Fixture::new(UNITS);
    fixture.edit("B", |root| {
        let tags = root.as_object_mut().unwrap().get_mut("Tags").unwrap();
        tags.as_sequence_mut().unwrap().push(Value::string("z"));
    });
    assert_eq!(fixture.write(), UNITS.replace("[ 'x', 'y' ]", "[ 'x', 'y', 'z' ]"));
}

#[test]
fn removing_the_last_element_keeps_the_trailing_comma() {
    let text = "X is [\n  'a',\n  'b',\n]\n";
    let mut fixture = Fixture::new(text);
    fixture.edit("X", |root| {
        root.as_sequence_mut().unwrap().remove(1);
    });
    assert_eq!(fixture.write(), "X is [\n  'a',\n]\n");

    let text = "X is ['a', 'b']\n";
    let mut fixture = Fixture::new(text);
    fixture.edit("X", |root| {
        root.as_sequence_mut().unwrap().remove(1);
    });
    assert_eq!(fixture.write(), "X is ['a']\n");
}

#[test]
fn new_properties_follow_the_object_style() {
    let mut fixture = Fixture::new(UNITS);
    fixture.edit("C", |root| {
        let color = Object::bracketed("RGBA", [0, 0, 0, 255].map(Value::integer));
        root.as_object_mut().unwrap().set("Color", Value::new(ValueKind::Object(color)));
    });
    assert_eq!(
        fixture.write(),
        UNITS.replace("TUnit( Speed = 30 )", "TUnit( Speed = 30 Color = RGBA[0,0,0,255] )")
    );

    let mut fixture = Fixture::new("export U is T(\n  Speed = 10,\n  Name = 'X'\n)\n");
    fixture.edit("U", |root| {
        root.as_object_mut().unwrap().set("Armor", Value::integer(3));
    });
    assert_eq!(fixture.write(), "export U is T(\n  Speed = 10,\n  Name = 'X',\n  Armor = 3\n)\n");
}

#[test]
fn new_declarations_are_written_cleanly() {
    let mut fixture = Fixture::new(UNITS);
    let object = Object::new("TUnit")
        .with_property("Speed", Value::integer(5))
        .with_property("Name", Value::string("Delta"));
    fixture.file.declarations.push(Declaration::new(
        DeclKind::Exported,
        Some("D".to_owned()),
        Value::new(ValueKind::Object(object)),
    ));

    let expected = format!("{}\n\nexport D is TUnit(\n  Speed = 5,\n  Name = 'Delta'\n)\n", UNITS.trim_end());
    assert_eq!(fixture.write(), expected);
}

#[test]
fn removed_declarations_take_their_leading_text() {
    let mut fixture = Fixture::new(UNITS);
    fixture.file.declarations.remove(1);

    let removed = &UNITS[UNITS.find("export B").unwrap()..UNITS.find("export C").unwrap()];
    assert_eq!(fixture.write(), UNITS.replace(removed, ""));

    let mut fixture = Fixture::new(UNITS);
    fixture.file.declarations.remove(0);
    assert_eq!(fixture.write(), &UNITS[UNITS.find("export B").unwrap()..]);
}

#[test]
fn module_lists_get_one_line_per_module() {
    let text = "export Descriptor_Unit_A is TEntityDescriptor
(
    ModulesDescriptors = [
        ~/TargetManagerModuleSelector,
        FacingInfos is ~/FacingInfosModuleDescriptor,
    ]
)
";
    let mut fixture = Fixture::new(text);
    assert!(fixture.options.profile.as_ref().unwrap().module_list.is_some());

    fixture.edit("Descriptor_Unit_A", |root| {
        let modules = root.as_object_mut().unwrap().get_mut("ModulesDescriptors").unwrap();
        let modules = modules.as_sequence_mut().unwrap();
        modules.push(Value::template("DamageModuleDescriptor"));
        modules.push(Value::new(ValueKind::TemplateRef(TemplateRef::named(
            "Tags",
            "TagsModuleDescriptor",
        ))));
        let tags = Object::new("TTagsModuleDescriptor").with_property(
            "TagSet",
            Value::new(ValueKind::Array(ndf_model::Sequence::from_values([Value::string("Tank")]))),
        );
        modules.push(Value::new(ValueKind::Object(tags)));
    });

    assert_eq!(
        fixture.write(),
        "export Descriptor_Unit_A is TEntityDescriptor
(
    ModulesDescriptors = [
        ~/TargetManagerModuleSelector,
        FacingInfos is ~/FacingInfosModuleDescriptor,
        ~/DamageModuleDescriptor,
        Tags is ~/TagsModuleDescriptor,
        TTagsModuleDescriptor(
          TagSet = ['Tank']
        ),
    ]
)
"
    );
}

#[test]
fn module_lists_only_apply_to_declaration_objects() {
    let mut fixture = Fixture::new("export A is TEntityDescriptor(ModulesDescriptors = [])\n");
    let modules = |paths: &[&str]| {
        let values = paths.iter().map(|path| Value::template(*path));
        Value::new(ValueKind::Array(ndf_model::Sequence::from_values(values)))
    };

    let nested = Object::new("TEntityDescriptor").with_property("ModulesDescriptors", modules(&["A", "B"]));
    let units = ndf_model::Sequence::from_values([Value::new(ValueKind::Object(nested))]);
    let pack = Object::new("TPack").with_property("Units", Value::new(ValueKind::Array(units)));
    fixture.file.declarations.push(Declaration::new(
        DeclKind::Exported,
        Some("Pack".to_owned()),
        Value::new(ValueKind::Object(pack)),
    ));

    let entity = Object::new("TEntityDescriptor").with_property("ModulesDescriptors", modules(&["C"]));
    fixture.file.declarations.push(Declaration::new(
        DeclKind::Exported,
        Some("E".to_owned()),
        Value::new(ValueKind::Object(entity)),
    ));

    let written = fixture.write();
    assert!(written.contains("ModulesDescriptors = [~/A, ~/B]"), "{written}");
    assert!(written.contains("ModulesDescriptors = [\n    ~/C,\n  ]"), "{written}");
}

#[test]
fn malformed_declarations_survive_edits_elsewhere() {
    let text = "export A is T(X = 1)\nexport B is T(Y = )\nexport C is T(Z = 3)\n";
    let mut fixture = Fixture::new(text);
    assert_eq!(fixture.write(), text);

    fixture.set("C", "Z", Value::integer(4));
    assert_eq!(fixture.write(), text.replace("Z = 3", "Z = 4"));
}

#[test]
fn named_instances_regenerate_with_their_head() {
    let text = "export U is T\n(\n    Model is TModel\n    (\n        Mesh = $/GFX/A\n    )\n)\n";
    let mut fixture = Fixture::new(text);
    fixture.set("U", "Model.Mesh", Value::new(ValueKind::ResourceRef("GFX/B".to_owned())));
    assert_eq!(fixture.write(), text.replace("$/GFX/A", "$/GFX/B"));
}

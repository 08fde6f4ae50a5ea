use ndf_model::{Declaration, Value, ValueKind};
use serde_json::{Map, json};

pub(crate) fn declaration(decl: &Declaration) -> serde_json::Value {
    json!({
        "$kind": format!("{:?}", decl.kind()),
        "$name": decl.name(),
        "value": value(decl.value()),
    })
}

pub(crate) fn value(value: &Value) -> serde_json::Value {
    match value.kind() {
        ValueKind::String(string) => json!(string.text),
        ValueKind::Number(number) if number.is_integral() => json!(number.value() as i64),
        ValueKind::Number(number) => json!(number.value()),
        ValueKind::Boolean(boolean) => json!(boolean),
        ValueKind::Null => serde_json::Value::Null,
        ValueKind::Enum(value) => json!(value.to_string()),
        ValueKind::Guid(guid) => json!({ "$guid": guid }),
        ValueKind::ResourceRef(path) => json!(format!("$/{path}")),
        ValueKind::Raw(text) => json!({ "$raw": text }),
        ValueKind::TemplateRef(template) => match &template.instance_name {
            Some(name) => json!({ "$name": name, "$template": format!("~/{}", template.path) }),
            None => json!(format!("~/{}", template.path)),
        },
        ValueKind::Array(sequence) | ValueKind::Tuple(sequence) => {
            sequence.values().map(self::value).collect()
        }
        ValueKind::Map(map) => map
            .entries
            .iter()
            .map(|entry| json!([self::value(&entry.key), self::value(&entry.value)]))
            .collect(),
        ValueKind::Object(object) => {
            let mut map = Map::with_capacity(object.properties.len() + 2);
            map.insert("$type".to_owned(), json!(object.type_name));
            if let Some(name) = &object.instance_name {
                map.insert("$name".to_owned(), json!(name));
            }
            for property in &object.properties {
                map.insert(property.name.clone(), self::value(&property.value));
            }
            serde_json::Value::Object(map)
        }
    }
}

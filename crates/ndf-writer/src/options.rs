use ndf_model::{SourceFile, ValueKind};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per nesting level of regenerated text.
    pub indent: usize,
    pub profile: Option<FileProfile>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self { indent: 2, profile: None }
    }
}

impl WriterOptions {
    pub(crate) fn module_list(&self) -> Option<&ModuleListRule> {
        self.profile.as_ref()?.module_list.as_ref()
    }
}

/// Layout conventions of one kind of file, computed once per file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileProfile {
    pub module_list: Option<ModuleListRule>,
}

impl FileProfile {
    /// Turns on the module-list layout when any declaration is an object of
    /// the default rule's type.
    pub fn detect(file: &SourceFile) -> Self {
        let rule = ModuleListRule::default();
        let found = file.declarations.iter().any(|decl| {
            matches!(decl.value().kind(), ValueKind::Object(object) if object.type_name == rule.declaration_type)
        });
        Self { module_list: found.then_some(rule) }
    }
}

/// Elements of `property` are written one per line, each followed by a
/// comma, when the object holding it is a `declaration_type` declaration.
/// Nested objects of that type keep the ordinary layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleListRule {
    pub declaration_type: String,
    pub property: String,
}

impl Default for ModuleListRule {
    fn default() -> Self {
        Self {
            declaration_type: "TEntityDescriptor".to_owned(),
            property: "ModulesDescriptors".to_owned(),
        }
    }
}

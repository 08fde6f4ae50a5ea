//! Serializes a [`SourceFile`] back to text.
//!
//! An unmodified file is replayed from its token stream byte for byte.
//! Otherwise every declaration is emitted on its own: the filler in front
//! of it comes from the tokens, a clean declaration is copied from its token
//! span, and a dirty one is rebuilt from the tree. Rebuilding still copies
//! every untouched subtree verbatim and reuses the recorded whitespace around
//! each child, so only the edited values change shape.

mod options;
mod writer;

use ndf_model::{SourceFile, Value};
use ndf_tokenizer::Tokens;
use rustc_hash::FxHashSet;

pub use options::{FileProfile, ModuleListRule, WriterOptions};

/// Indices of declarations to rebuild even if they still hold a span.
pub type DirtySet = FxHashSet<usize>;

pub fn write(file: &SourceFile, tokens: &Tokens, dirty: &DirtySet, options: &WriterOptions) -> String {
    if dirty.is_empty() && file.is_contiguous() {
        tracing::debug!("replaying whole file");
        return tokens.text().to_owned();
    }

    tracing::debug!(dirty = dirty.len(), declarations = file.len(), "writing per declaration");
    let mut writer = writer::Writer::new(tokens, options);
    writer.file(file, dirty);
    writer.finish()
}

/// Text of a single value, as it would appear inside its declaration.
pub fn write_value(value: &Value, tokens: &Tokens, options: &WriterOptions) -> String {
    let mut writer = writer::Writer::new(tokens, options);
    writer.value(value, false);
    writer.finish()
}

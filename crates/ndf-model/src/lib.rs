//! Editable value tree for NDF declarations.
//!
//! Every [`Value`] and [`Declaration`] may remember the token range it was
//! parsed from. That range is private and only ever cleared: each accessor
//! that hands out mutable access to a node's contents drops the node's span
//! first. Reaching a descendant mutably therefore invalidates every ancestor
//! on the way, up to and including the declaration.

mod container;
mod decl;
mod span;
mod value;

pub use container::{
    ARGUMENTS, ContainerFormat, Element, ElementFormat, EntryFormat, Map, MapEntry, Object,
    ObjectFormat, ObjectStyle, Property, PropertyFormat, Sequence,
};
pub use decl::{DeclKind, Declaration, SourceFile};
pub use ndf_syntax::Quote;
pub use span::{Gap, TokenSpan};
pub use value::{EnumValue, Number, StringValue, TemplateRef, Value, ValueKind};

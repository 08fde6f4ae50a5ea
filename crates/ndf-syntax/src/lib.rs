//! Token kinds shared by the tokenizer, parser and writer.

mod syntax_kind;
mod syntax_set;

/// Token kinds produced by the tokenizer.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;

/// Delimiter a string literal was written with.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Quote {
    #[default]
    Single,
    Double,
}

impl Quote {
    pub const fn char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }
}

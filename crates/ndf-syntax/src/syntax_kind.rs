use crate::SyntaxSet;

const OPERATORS: SyntaxSet = SyntaxSet::new([SyntaxKind::PIPE, SyntaxKind::OPERATOR]);

const OPERAND_ENDS: SyntaxSet = SyntaxSet::new([
    SyntaxKind::RIGHT_PAREN,
    SyntaxKind::RIGHT_BRACKET,
    SyntaxKind::NAME,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING,
    SyntaxKind::ENUM,
    SyntaxKind::GUID,
    SyntaxKind::TEMPLATE_REF,
    SyntaxKind::RESOURCE_REF,
]);

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    COMMA,
    EQ,
    PIPE,
    OPERATOR,

    EXPORT_KW,
    IS_KW,
    MAP_KW,
    NIL_KW,
    TRUE_KW,
    FALSE_KW,
    UNNAMED_KW,
    NAME,

    NUMBER,
    STRING,
    ENUM,
    GUID,
    TEMPLATE_REF,
    RESOURCE_REF,

    COMMENT,
    UNKNOWN,
    EOF,
}

impl SyntaxKind {
    /// Comments are kept in the token stream but carry no structure.
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::COMMENT)
    }

    /// Tokens that join operands into a raw expression.
    pub const fn is_operator(self) -> bool {
        OPERATORS.contains(self)
    }

    /// Tokens after which a `-` is a binary operator rather than a sign.
    pub const fn ends_operand(self) -> bool {
        OPERAND_ENDS.contains(self)
    }

    pub fn keyword(text: &str) -> Option<Self> {
        Some(match text {
            "export" => Self::EXPORT_KW,
            "is" => Self::IS_KW,
            "MAP" => Self::MAP_KW,
            "nil" => Self::NIL_KW,
            "True" | "true" => Self::TRUE_KW,
            "False" | "false" => Self::FALSE_KW,
            "unnamed" => Self::UNNAMED_KW,
            _ => return None,
        })
    }
}

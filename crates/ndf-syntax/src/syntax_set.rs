use crate::SyntaxKind;

/// Token kinds packed into a single word, one bit per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet(u32);

const _: () = assert!((SyntaxKind::EOF as u32) < u32::BITS, "SyntaxKind no longer fits in SyntaxSet");

const fn bit(kind: SyntaxKind) -> u32 {
    1 << kind as u32
}

impl SyntaxSet {
    pub const EMPTY: Self = Self(0);

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < N {
            bits |= bit(kinds[i]);
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, kind: SyntaxKind) -> bool {
        self.0 & bit(kind) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn union_and_contains() {
        let scalars = SyntaxSet::new([NUMBER, STRING]);
        let refs = SyntaxSet::new([TEMPLATE_REF, RESOURCE_REF]);
        let all = scalars.union(refs);

        assert!(scalars.contains(NUMBER));
        assert!(!scalars.contains(TEMPLATE_REF));
        assert!(all.contains(RESOURCE_REF));
        assert!(all.contains(STRING));
        assert!(!all.contains(EOF));
        assert!(!SyntaxSet::EMPTY.contains(EOF));
    }

    #[test]
    fn last_kind_is_addressable() {
        assert!(SyntaxSet::new([EOF]).contains(EOF));
        assert!(!SyntaxSet::new([EOF]).contains(LEFT_PAREN));
    }
}

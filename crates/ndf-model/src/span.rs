/// Inclusive range of token indices a node was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    start: u32,
    end: u32,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "token span {start}..={end} is reversed");
        Self { start: start as u32, end: end as u32 }
    }

    pub fn start(self) -> usize {
        self.start as usize
    }

    pub fn end(self) -> usize {
        self.end as usize
    }

    pub fn len(self) -> usize {
        self.end() - self.start() + 1
    }

    pub fn is_empty(self) -> bool {
        false
    }

    pub fn contains(self, index: usize) -> bool {
        (self.start()..=self.end()).contains(&index)
    }
}

/// Filler owned by a declaration: the text after token `after` (or the start
/// of the file) up to token `before`. Whitespace, comments and anything the
/// parser skipped while recovering live here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gap {
    pub after: Option<usize>,
    pub before: usize,
}

use drop_bomb::DropBomb;
use ndf_errors::{Diagnostic, ParseError};
use ndf_syntax::SyntaxKind;
use ndf_tokenizer::Tokens;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Cursor over the significant tokens of a stream. Comments are stepped over
/// here and reach the tree only as part of captured formatting text.
pub(crate) struct Parser<'t> {
    tokens: &'t Tokens,
    pos: usize,
    last: Option<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t Tokens) -> Self {
        let mut parser = Self { tokens, pos: 0, last: None, diagnostics: Vec::new() };
        parser.pos = parser.skip_trivia(0);
        parser
    }

    fn skip_trivia(&self, mut index: usize) -> usize {
        while self.tokens.kind(index).is_trivia() {
            index += 1;
        }
        index
    }

    pub(crate) fn tokens(&self) -> &'t Tokens {
        self.tokens
    }

    pub(crate) fn current(&self) -> usize {
        self.pos
    }

    /// Index of the last consumed significant token.
    pub(crate) fn last(&self) -> Option<usize> {
        self.last
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokens.kind(self.pos)
    }

    pub(crate) fn nth_kind(&self, n: usize) -> SyntaxKind {
        let mut index = self.pos;
        for _ in 0..n {
            if self.tokens.kind(index) == SyntaxKind::EOF {
                return SyntaxKind::EOF;
            }
            index = self.skip_trivia(index + 1);
        }
        self.tokens.kind(index)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes the current token and returns its index.
    pub(crate) fn advance(&mut self) -> usize {
        let index = self.pos;
        if self.peek_kind() != SyntaxKind::EOF {
            self.last = Some(index);
            self.pos = self.skip_trivia(index + 1);
        }
        index
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, message: &str) -> PResult<usize> {
        if self.at(kind) { Ok(self.advance()) } else { Err(self.error(message)) }
    }

    pub(crate) fn error(&self, message: &str) -> ParseError {
        let token = &self.tokens[self.pos];
        ParseError {
            message: message.to_owned(),
            found: token.kind,
            range: token.range,
            line: token.line,
            column: token.column,
        }
    }

    pub(crate) fn report(&mut self, error: ParseError) {
        tracing::warn!(line = error.line, column = error.column, found = ?error.found, "{}", error.message);
        self.diagnostics.push(error.into());
    }

    pub(crate) fn exact(&self, index: usize) -> &'t str {
        self.tokens.exact(index)
    }

    /// Source text between the last consumed token and the current one.
    pub(crate) fn gap(&self) -> String {
        self.tokens.text_between(self.last, self.pos).to_owned()
    }

    /// Source text from the start of token `start` up to the current token.
    pub(crate) fn text_from(&self, start: usize) -> String {
        match self.last {
            Some(last) if last >= start => {
                let mut text = self.tokens.span_text(start, last).to_owned();
                text.push_str(self.tokens.text_between(Some(last), self.pos));
                text
            }
            _ => String::new(),
        }
    }

    /// Whether the current token begins a line.
    pub(crate) fn at_line_start(&self) -> bool {
        self.tokens[self.pos].column == 0
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            last: self.last,
            diagnostics: self.diagnostics.len(),
            bomb: DropBomb::new("Checkpoint must be rewound"),
        }
    }

    fn rewind(&mut self, mut checkpoint: Checkpoint) {
        checkpoint.bomb.defuse();
        self.pos = checkpoint.pos;
        self.last = checkpoint.last;
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    /// Tries `production` and always rolls the cursor back, reporting whether
    /// it matched.
    pub(crate) fn lookahead(&mut self, production: impl FnOnce(&mut Self) -> PResult<()>) -> bool {
        let checkpoint = self.checkpoint();
        let matched = production(self).is_ok();
        self.rewind(checkpoint);
        matched
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

pub(crate) struct Checkpoint {
    pos: usize,
    last: Option<usize>,
    diagnostics: usize,
    bomb: DropBomb,
}

//! Lossless tokenizer for NDF source.
//!
//! Whitespace is never dropped: the run before the first token is that
//! token's leading text, and every later run is the trailing text of the token
//! before it. Together with each token's exact spelling this partitions the
//! source, so concatenating [`Tokens::full`] over the stream yields the input.

mod cursor;

use std::io::Read;

use cursor::Cursor;
use ndf_errors::LexError;
pub use ndf_syntax::{Quote, SyntaxKind};
use ndf_syntax::SyntaxKind::*;
use text_size::{TextLen, TextRange, TextSize};

/// Decoded payload of literal tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    #[default]
    None,
    Number {
        value: f64,
        /// Spelled without a decimal point or exponent.
        integral: bool,
    },
    String {
        text: Box<str>,
        quote: Quote,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub value: TokenValue,
    /// 1-based line of the first character. Diagnostics only.
    pub line: u32,
    /// 0-based column of the first character. Diagnostics only.
    pub column: u32,
    pub range: TextRange,
    pub leading: TextRange,
    pub trailing: TextRange,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    leading: TextRange,
    /// Last significant kind, deciding whether `-` is a sign or an operator.
    previous: SyntaxKind,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            leading: TextRange::empty(TextSize::new(0)),
            previous: EOF,
            finished: false,
        };
        tokenizer.leading = tokenizer.whitespace();
        tokenizer
    }

    fn offset(&self) -> TextSize {
        self.text.text_len() - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn whitespace(&mut self) -> TextRange {
        self.cursor.reset_pos_within_token();
        self.cursor.advance_while(is_whitespace);
        let range = self.range();
        self.cursor.reset_pos_within_token();
        range
    }

    pub fn next_token(&mut self) -> Token {
        let leading = self.leading;
        let (line, column) = (self.cursor.line(), self.cursor.column());

        self.cursor.reset_pos_within_token();
        let (kind, value) = self.syntax_kind();
        let range = self.range();
        let trailing = self.whitespace();

        self.leading = TextRange::empty(self.offset());
        self.finished = kind == EOF;
        if !kind.is_trivia() {
            self.previous = kind;
        }

        Token { kind, value, line, column, range, leading, trailing }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TokenValue) {
        if self.cursor.is_eof() {
            return (EOF, TokenValue::None);
        }

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            ',' => COMMA,
            '=' => EQ,
            '|' => PIPE,
            '+' | '*' | '%' => OPERATOR,
            '/' => match self.cursor.peek() {
                '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    COMMENT
                }
                '*' => {
                    self.cursor.advance();
                    self.block_comment();
                    COMMENT
                }
                _ => OPERATOR,
            },
            '-' if !self.previous.ends_operand() && self.cursor.peek().is_ascii_digit() => {
                return self.number();
            }
            '-' => OPERATOR,
            '0'..='9' => return self.number(),
            quote @ ('\'' | '"') => {
                let quote = Quote::from_char(quote).unwrap_or_default();
                return (STRING, self.string(quote));
            }
            '~' if self.cursor.matches('/') => {
                self.cursor.advance_while(is_path_char);
                TEMPLATE_REF
            }
            '$' if self.cursor.matches('/') => {
                self.cursor.advance_while(is_path_char);
                RESOURCE_REF
            }
            c if is_ident_start(c) => self.name(),
            _ => UNKNOWN,
        };

        (kind, TokenValue::None)
    }

    fn name(&mut self) -> SyntaxKind {
        self.cursor.advance_while(is_ident_continue);

        let text = self.text();
        if text == "GUID" && self.cursor.matches(':') && self.cursor.second() == '{' {
            self.cursor.advance();
            self.cursor.advance_while(|c| c != '}' && c != '\n');
            if self.cursor.matches('}') {
                self.cursor.advance();
            }
            return GUID;
        }

        if let Some(keyword) = SyntaxKind::keyword(text) {
            return keyword;
        }

        let mut kind = NAME;
        while self.cursor.matches('/') && is_ident_start(self.cursor.second()) {
            self.cursor.advance();
            self.cursor.advance_while(is_ident_continue);
            kind = ENUM;
        }
        kind
    }

    fn number(&mut self) -> (SyntaxKind, TokenValue) {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        let mut integral = true;
        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            integral = false;
        }

        if matches!(self.cursor.peek(), 'e' | 'E') {
            let signed = matches!(self.cursor.second(), '+' | '-');
            let digit = if signed { self.cursor.third() } else { self.cursor.second() };
            if digit.is_ascii_digit() {
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.cursor.advance_while(|c| c.is_ascii_digit());
                integral = false;
            }
        }

        let value = self.text().parse().unwrap_or_default();
        (NUMBER, TokenValue::Number { value, integral })
    }

    /// `\\` and an escaped delimiter decode to the bare character; any other
    /// backslash is kept as written.
    fn string(&mut self, quote: Quote) -> TokenValue {
        let mut text = String::new();

        while !self.cursor.is_eof() {
            match self.cursor.advance() {
                '\\' if !self.cursor.is_eof() => {
                    let escaped = self.cursor.advance();
                    if escaped != quote.char() && escaped != '\\' {
                        text.push('\\');
                    }
                    text.push(escaped);
                }
                c if c == quote.char() => break,
                c => text.push(c),
            }
        }

        TokenValue::String { text: text.into_boxed_str(), quote }
    }

    fn block_comment(&mut self) {
        while !self.cursor.is_eof() {
            if self.cursor.advance() == '*' && self.cursor.matches('/') {
                self.cursor.advance();
                return;
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '/'
}

/// The complete token stream of one file, terminated by an `EOF` token, and
/// the text it was lexed from.
#[derive(Debug, Clone)]
pub struct Tokens {
    text: Box<str>,
    tokens: Vec<Token>,
}

impl Tokens {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn eof(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn kind(&self, index: usize) -> SyntaxKind {
        self.tokens.get(index).map_or(EOF, |token| token.kind)
    }

    pub fn exact(&self, index: usize) -> &str {
        &self.text[self.tokens[index].range]
    }

    pub fn leading(&self, index: usize) -> &str {
        &self.text[self.tokens[index].leading]
    }

    pub fn trailing(&self, index: usize) -> &str {
        &self.text[self.tokens[index].trailing]
    }

    /// Leading, exact and trailing text of one token.
    pub fn full(&self, index: usize) -> &str {
        let token = &self.tokens[index];
        &self.text[TextRange::new(token.leading.start(), token.trailing.end())]
    }

    /// Text from the first character of `start` to the last of `end`,
    /// without the surrounding whitespace.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        let range = TextRange::new(self.tokens[start].range.start(), self.tokens[end].range.end());
        &self.text[range]
    }

    /// Text between the exact text of `after` (or the start of the file) and
    /// the exact text of `before`: whitespace, comments and skipped tokens.
    pub fn text_between(&self, after: Option<usize>, before: usize) -> &str {
        let start = after.map_or(TextSize::new(0), |after| self.tokens[after].range.end());
        let end = self.tokens[before].range.start();
        if start > end {
            return "";
        }
        &self.text[TextRange::new(start, end)]
    }
}

impl std::ops::Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

pub fn tokenize(text: &str) -> Tokens {
    let tokens: Vec<Token> = Tokenizer::new(text).collect();
    tracing::trace!(count = tokens.len(), bytes = text.len(), "tokenized");
    Tokens { text: text.into(), tokens }
}

pub fn tokenize_reader(mut reader: impl Read) -> Result<Tokens, LexError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes)?;
    Ok(tokenize(&text))
}

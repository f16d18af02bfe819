// SQL lexer.
//
// Converts SQL text into a stream of coarsely classified lexemes. Uses
// memchr to scan string literal bodies. Tracks 1-based line/column; each
// lexeme carries the position of its first character.
//
// The only input the lexer rejects is an unterminated string literal.
// Unknown characters are emitted as one-character operator lexemes and
// left for the parser to reject in context.

use memchr::memchr2;
use squeal_ast::Span;

use crate::parser::ParseError;
use crate::token::{is_keyword, Lexeme, LexemeKind};

/// Streaming SQL lexer over a borrowed source string.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset.
    pos: usize,
    /// Current line (1-based).
    line: u32,
    /// Current column (1-based).
    col: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given SQL source.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current byte offset into the source.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokenize the whole input. The result always ends with the
    /// end-of-input sentinel.
    pub fn tokenize(source: &'a str) -> Result<Vec<Lexeme>, ParseError> {
        let mut lexer = Self::new(source);
        let mut lexemes = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme()?;
            let done = lexeme.kind == LexemeKind::EndOfInput;
            lexemes.push(lexeme);
            if done {
                break;
            }
        }
        Ok(lexemes)
    }

    /// Produce the next lexeme. Once the input is exhausted this keeps
    /// returning the end-of-input sentinel.
    pub fn next_lexeme(&mut self) -> Result<Lexeme, ParseError> {
        self.skip_whitespace();

        if self.pos >= self.src.len() {
            let at = self.pos as u32;
            return Ok(Lexeme::end_of_input(
                Span::new(at, at),
                self.line,
                self.col,
            ));
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let ch = self.src[self.pos];

        let (kind, text) = match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(),
            b'0'..=b'9' => self.lex_number(),
            b'\'' => self.lex_string(start_line, start_col)?,
            _ => self.lex_operator(),
        };

        Ok(Lexeme {
            kind,
            text,
            span: Span::new(start as u32, self.pos as u32),
            line: start_line,
            col: start_col,
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.advance();
        }
    }

    // -----------------------------------------------------------------------
    // Scanners
    // -----------------------------------------------------------------------

    /// `[A-Za-z_][A-Za-z0-9_]*`, classified keyword or identifier.
    fn lex_identifier(&mut self) -> (LexemeKind, String) {
        let start = self.pos;
        self.advance();
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let kind = if is_keyword(&text) {
            LexemeKind::Keyword
        } else {
            LexemeKind::Identifier
        };
        (kind, text)
    }

    /// Digits, optionally one `.` followed by more digits. No exponent,
    /// no sign; a leading sign lexes as an operator.
    fn lex_number(&mut self) -> (LexemeKind, String) {
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.advance();
        }
        if self.peek_at(0) == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // the dot
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        (LexemeKind::Number, text)
    }

    /// A single-quoted string literal. `''` decodes to one quote, `\x`
    /// decodes to `x`. The decoded content is returned without quotes.
    fn lex_string(
        &mut self,
        start_line: u32,
        start_col: u32,
    ) -> Result<(LexemeKind, String), ParseError> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr2(b'\'', b'\\', remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    for _ in 0..offset {
                        self.advance();
                    }
                    let special = self.advance();
                    if special == b'\\' {
                        // Backslash escape: the next character stands for itself.
                        if self.pos >= self.src.len() {
                            return Err(ParseError::lexical(
                                "unterminated string literal",
                                Span::new(start as u32, self.pos as u32),
                                start_line,
                                start_col,
                            ));
                        }
                        value.push(char::from(self.advance()));
                    } else if self.peek_at(0) == Some(b'\'') {
                        // Doubled quote decodes to one quote.
                        value.push('\'');
                        self.advance();
                    } else {
                        return Ok((LexemeKind::StringLiteral, value));
                    }
                }
                None => {
                    while self.pos < self.src.len() {
                        self.advance();
                    }
                    return Err(ParseError::lexical(
                        "unterminated string literal",
                        Span::new(start as u32, self.pos as u32),
                        start_line,
                        start_col,
                    ));
                }
            }
        }
    }

    /// Two-character operators first (`<=`, `>=`, `!=`, `<>`), then any
    /// single character.
    fn lex_operator(&mut self) -> (LexemeKind, String) {
        let two = match (self.src[self.pos], self.peek_at(1)) {
            (b'<', Some(b'=')) => Some("<="),
            (b'>', Some(b'=')) => Some(">="),
            (b'!', Some(b'=')) => Some("!="),
            (b'<', Some(b'>')) => Some("<>"),
            _ => None,
        };
        if let Some(op) = two {
            self.advance();
            self.advance();
            return (LexemeKind::Operator, op.to_owned());
        }
        let start = self.pos;
        self.advance();
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        (LexemeKind::Operator, text)
    }
}

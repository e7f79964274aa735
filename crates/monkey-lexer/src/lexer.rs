//! Lexer for the Monkey language
//!
//! Pull-based: the parser asks for one token at a time with
//! [`Lexer::next_token`]. The cursor holds a single current character with
//! one character of lookahead and never moves backward.

use crate::token::{Token, TokenKind};
use monkey_error::{
    span::{Position, Span},
    Diagnostic, Diagnostics, ErrorCode,
};
use tracing::trace;

/// The Monkey language lexer
pub struct Lexer<'src> {
    /// Source code being analyzed
    source: &'src str,
    /// Source code characters
    chars: Vec<char>,
    /// Index of `ch` in `chars`
    position: usize,
    /// Index of the next character to read, always `position + 1`
    read_position: usize,
    /// Character under examination, `None` once the input is exhausted
    ch: Option<char>,
    /// Current line (1-indexed)
    line: u32,
    /// Current column (1-indexed)
    column: u32,
    /// Byte offset of `ch`
    offset: usize,
    /// Source file ID
    file_id: u32,
    /// Accumulated diagnostics
    diagnostics: Diagnostics,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer positioned on the first character of `source`
    pub fn new(source: &'src str, file_id: u32) -> Self {
        let mut lexer = Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            line: 1,
            column: 1,
            offset: 0,
            file_id,
            diagnostics: Diagnostics::new(),
        };
        lexer.read_char();
        lexer
    }

    /// Returns the accumulated diagnostics
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes and returns the diagnostics
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Moves the cursor one character forward
    fn read_char(&mut self) {
        if let Some(ch) = self.ch {
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        self.ch = self.chars.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;
    }

    /// Returns the character after `ch` without advancing
    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.read_position).copied()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn make_span(&self, start: Position) -> Span {
        Span::new(start, self.current_position(), self.file_id)
    }

    /// Source text between `start` and the cursor
    fn literal_from(&self, start: Position) -> &'src str {
        &self.source[start.offset..self.offset]
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    /// Reads an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let start = self.current_position();

        while self.ch.is_some_and(is_letter) {
            self.read_char();
        }

        let literal = self.literal_from(start);
        let kind = TokenKind::keyword_from_str(literal).unwrap_or(TokenKind::Ident);

        Token::new(kind, literal, self.make_span(start))
    }

    /// Reads a run of decimal digits
    fn read_number(&mut self) -> Token {
        let start = self.current_position();

        while self.ch.is_some_and(|c| c.is_ascii_digit()) {
            self.read_char();
        }

        Token::new(TokenKind::Int, self.literal_from(start), self.make_span(start))
    }

    /// Reads the next token
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        trace!(kind = %token.kind, literal = %token.literal, line = token.span.start.line, "token");
        token
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.current_position();

        let ch = match self.ch {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, "", Span::point(start, self.file_id)),
        };

        // These two advance inside their own loops
        if is_letter(ch) {
            return self.read_identifier();
        }
        if ch.is_ascii_digit() {
            return self.read_number();
        }

        let kind = match ch {
            '=' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => TokenKind::Illegal,
        };
        self.read_char();

        let span = self.make_span(start);

        if kind == TokenKind::Illegal {
            self.diagnostics.push(
                Diagnostic::error(format!("illegal character '{}'", ch))
                    .with_code(ErrorCode::ILLEGAL_CHARACTER)
                    .with_label(span, "not part of the Monkey language"),
            );
        }

        Token::new(kind, self.literal_from(start), span)
    }

    /// Tokenizes the remaining input, up to and including `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        tokens
    }
}

/// ASCII letters and `_`; digits are not allowed inside identifiers
fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Tokenizes source code and returns the tokens
pub fn tokenize(source: &str, file_id: u32) -> (Vec<Token>, Diagnostics) {
    let mut lexer = Lexer::new(source, file_id);
    let tokens = lexer.tokenize();
    (tokens, lexer.take_diagnostics())
}

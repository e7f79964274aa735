//! Tokens for the Monkey language
//!
//! Defines the closed set of token kinds the lexer can produce.

use monkey_error::span::Span;
use std::fmt;

/// All token kinds for the Monkey language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Special
    // =========================================
    /// End of input
    Eof,
    /// A character the language does not know
    Illegal,

    // =========================================
    // Identifiers and literals
    // =========================================
    /// `foobar`, `_x`
    Ident,
    /// `1542`
    Int,

    // =========================================
    // Operators
    // =========================================
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Bang,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `==`
    Eq,
    /// `!=`
    NotEq,

    // =========================================
    // Delimiters
    // =========================================
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // =========================================
    // Keywords
    // =========================================
    /// `fn`
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// Looks up a reserved word, `None` for user identifiers
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "fn" => Some(TokenKind::Function),
            "let" => Some(TokenKind::Let),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Illegal => write!(f, "ILLEGAL"),
            TokenKind::Ident => write!(f, "IDENT"),
            TokenKind::Int => write!(f, "INT"),

            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),

            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),

            TokenKind::Function => write!(f, "fn"),
            TokenKind::Let => write!(f, "let"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Return => write!(f, "return"),
        }
    }
}

/// A token: its kind, the exact source text it was read from, and where
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source substring that produced the token (empty for `Eof`)
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_illegal(&self) -> bool {
        self.kind == TokenKind::Illegal
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at {}:{}",
            self.kind, self.literal, self.span.start.line, self.span.start.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(TokenKind::keyword_from_str("fn"), Some(TokenKind::Function));
        assert_eq!(TokenKind::keyword_from_str("return"), Some(TokenKind::Return));
        assert_eq!(TokenKind::keyword_from_str("Let"), None);
        assert_eq!(TokenKind::keyword_from_str("lets"), None);
        assert_eq!(TokenKind::keyword_from_str("_if"), None);
        assert_eq!(TokenKind::keyword_from_str(""), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::Ident.to_string(), "IDENT");
        assert_eq!(TokenKind::NotEq.to_string(), "!=");
        assert_eq!(TokenKind::LBrace.to_string(), "{");
        assert_eq!(TokenKind::Function.to_string(), "fn");
        assert!(TokenKind::Else.is_keyword());
        assert!(!TokenKind::Ident.is_keyword());
    }
}

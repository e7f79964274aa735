//! AST - Abstract Syntax Tree for the Monkey language
//!
//! Statements and expressions are closed enums so a tree walker has to
//! handle every kind. Each node keeps the token that introduced it.

use monkey_error::{Span, Spanned};
use monkey_lexer::Token;
use std::fmt;

/// Behavior shared by every node
pub trait Node: fmt::Display {
    /// Literal of the token the node was built from
    fn token_literal(&self) -> &str;
}

/// Root of the tree: every statement of a source file, in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements.first().map_or("", |stmt| stmt.token_literal())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let(LetStatement),
    /// `return <value>;`
    Return(ReturnStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(stmt) => stmt.token_literal(),
            Statement::Return(stmt) => stmt.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => write!(f, "{}", stmt),
            Statement::Return(stmt) => write!(f, "{}", stmt),
        }
    }
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Let(stmt) => stmt.span(),
            Statement::Return(stmt) => stmt.span(),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(ident) => ident.token_literal(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
        }
    }
}

impl Spanned for Expression {
    fn span(&self) -> Span {
        match self {
            Expression::Identifier(ident) => ident.span(),
        }
    }
}

/// `let x = 5;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    /// The `let` token
    pub token: Token,
    pub name: Identifier,
    /// `None` until an expression rule is plugged into the parser
    pub value: Option<Expression>,
}

impl Node for LetStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} = {};", self.token_literal(), self.name, value),
            None => write!(f, "{} {};", self.token_literal(), self.name),
        }
    }
}

impl Spanned for LetStatement {
    fn span(&self) -> Span {
        let end = self.value.as_ref().map_or(self.name.span(), |value| value.span());
        self.token.span.merge(end)
    }
}

/// `return 43;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// The `return` token
    pub token: Token,
    pub return_value: Option<Expression>,
}

impl Node for ReturnStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.return_value {
            Some(value) => write!(f, "{} {};", self.token_literal(), value),
            None => write!(f, "{};", self.token_literal()),
        }
    }
}

impl Spanned for ReturnStatement {
    fn span(&self) -> Span {
        match &self.return_value {
            Some(value) => self.token.span.merge(value.span()),
            None => self.token.span,
        }
    }
}

/// A name, e.g. the `x` in `let x = 5;`
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The `Ident` token
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();
        Self { token, value }
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Spanned for Identifier {
    fn span(&self) -> Span {
        self.token.span
    }
}

impl From<Identifier> for Expression {
    fn from(ident: Identifier) -> Self {
        Expression::Identifier(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkey_error::Position;
    use monkey_lexer::TokenKind;

    fn token(kind: TokenKind, literal: &str, offset: usize) -> Token {
        let start = Position::new(1, offset as u32 + 1, offset);
        let end = Position::new(1, (offset + literal.len()) as u32 + 1, offset + literal.len());
        Token::new(kind, literal, Span::new(start, end, 0))
    }

    fn ident(name: &str, offset: usize) -> Identifier {
        Identifier::new(token(TokenKind::Ident, name, offset))
    }

    #[test]
    fn test_display() {
        let program = Program {
            statements: vec![
                Statement::Let(LetStatement {
                    token: token(TokenKind::Let, "let", 0),
                    name: ident("myVar", 4),
                    value: Some(ident("anotherVar", 12).into()),
                }),
                Statement::Return(ReturnStatement {
                    token: token(TokenKind::Return, "return", 24),
                    return_value: None,
                }),
            ],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;\nreturn;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.token_literal(), "");
        assert_eq!(program.to_string(), "");
        assert!(program.is_empty());
    }

    #[test]
    fn test_let_span_covers_value() {
        let stmt = LetStatement {
            token: token(TokenKind::Let, "let", 0),
            name: ident("a", 4),
            value: Some(ident("b", 8).into()),
        };
        let span = stmt.span();
        assert_eq!(span.start.offset, 0);
        assert_eq!(span.end.offset, 9);

        let bare = LetStatement { value: None, ..stmt };
        assert_eq!(bare.span().end.offset, 5);
        assert_eq!(bare.to_string(), "let a;");
    }

    #[test]
    fn test_identifier_literal() {
        let name = ident("foobar", 4);
        assert_eq!(name.value, "foobar");
        assert_eq!(name.token_literal(), "foobar");

        let expr: Expression = name.into();
        assert_eq!(expr.token_literal(), "foobar");
    }
}

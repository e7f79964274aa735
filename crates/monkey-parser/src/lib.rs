//! monkey-parser - Parser for the Monkey language
//!
//! Pulls tokens from a [`monkey_lexer::Lexer`] and builds an AST.
//!
//! # Example
//!
//! ```rust
//! use monkey_lexer::Lexer;
//! use monkey_parser::{Parser, Statement};
//!
//! let mut parser = Parser::new(Lexer::new("let x = 5;\nreturn x;", 0));
//! let program = parser.parse_program();
//!
//! assert!(parser.errors().is_empty());
//! assert_eq!(program.statements.len(), 2);
//! assert!(matches!(program.statements[0], Statement::Let(_)));
//! ```

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::{
    parse, parse_with_options, skip_expression, ExpressionHandler, Parser, ParserOptions, RecoveryMode,
};

//! monkey-lexer - Tokenizer for the Monkey language
//!
//! Turns source text into [`Token`]s, one per call, on demand.
//!
//! # Features
//!
//! - One character of lookahead for `==` and `!=`
//! - Keywords: `fn let true false if else return`
//! - Unknown characters become `Illegal` tokens instead of failing
//!
//! # Example
//!
//! ```rust
//! use monkey_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("let five = 5;", 0);
//!
//! assert_eq!(lexer.next_token().kind, TokenKind::Let);
//! assert_eq!(lexer.next_token().literal, "five");
//! ```

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

//! Parser for the Monkey language
//!
//! Recursive descent over a two-token window (`current`, `peek`) pulled
//! from the lexer on demand. Syntax errors are recorded and parsing moves
//! on to the next statement, so one pass reports every mismatch it finds.

use crate::ast::*;
use monkey_error::{Diagnostic, Diagnostics, ErrorCode};
use monkey_lexer::{Lexer, Token, TokenKind};
use tracing::debug;

/// Parses the expression that follows `=` in a `let` or the `return`
/// keyword.
///
/// Called with `current` on the first token of the expression. It must
/// leave `current` on the last token it consumed (or on the terminating
/// `;`) and never move past `Eof`. `Ok(None)` means nothing was built;
/// `Err(())` means a diagnostic was recorded and the statement is dropped.
pub type ExpressionHandler = fn(&mut Parser<'_>) -> Result<Option<Expression>, ()>;

/// What the parser does after a statement fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Step over a single token and try again from there
    #[default]
    SkipToken,
    /// Drop everything up to the next `;` before trying again
    Synchronize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    pub recovery: RecoveryMode,
}

/// Expression handler used until real expression parsing exists: steps
/// over the tokens up to `;` (or `Eof`) and builds nothing.
pub fn skip_expression(parser: &mut Parser<'_>) -> Result<Option<Expression>, ()> {
    while !parser.current_is(TokenKind::Semicolon) && !parser.current_is(TokenKind::Eof) {
        parser.next_token();
    }
    Ok(None)
}

/// Parser for the Monkey language
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    peek: Token,
    options: ParserOptions,
    expression_handler: ExpressionHandler,
    /// Syntax diagnostics from the most recent `parse_program`
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Creates a parser with default options
    pub fn new(lexer: Lexer<'src>) -> Self {
        Self::with_options(lexer, ParserOptions::default())
    }

    pub fn with_options(mut lexer: Lexer<'src>, options: ParserOptions) -> Self {
        // Prime the window so `current` is valid before any parsing
        let current = lexer.next_token();
        let peek = lexer.next_token();

        Self {
            lexer,
            current,
            peek,
            options,
            expression_handler: skip_expression,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Replaces the rule used to parse `let` values and `return` values
    pub fn with_expression_handler(mut self, handler: ExpressionHandler) -> Self {
        self.expression_handler = handler;
        self
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Messages of the syntax errors found by the last `parse_program`
    pub fn errors(&self) -> Vec<String> {
        self.diagnostics.messages()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Illegal-character diagnostics from the underlying lexer
    pub fn lexer_diagnostics(&self) -> &Diagnostics {
        self.lexer.diagnostics()
    }

    pub fn take_lexer_diagnostics(&mut self) -> Diagnostics {
        self.lexer.take_diagnostics()
    }

    // =========================================
    // Token window
    // =========================================

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn peek_token(&self) -> &Token {
        &self.peek
    }

    /// Shifts the window one token forward
    pub fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advances if `peek` is of the expected kind, otherwise records an
    /// error and leaves the window where it is
    pub fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            self.peek_error(kind);
            Err(())
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let found = &self.peek;
        let message = format!(
            "expected next token to be `{}`, got `{}` instead",
            expected, found.kind
        );

        let mut diagnostic = Diagnostic::error(message)
            .with_code(ErrorCode::UNEXPECTED_TOKEN)
            .with_label(found.span, format!("found: {}", found.kind))
            .with_secondary_label(self.current.span, format!("after `{}`", self.current.literal));

        if found.is_illegal() {
            diagnostic = diagnostic.with_note(format!("`{}` is not a valid token", found.literal));
        }
        if let Some(help) = Self::expected_help(expected, self.current.kind) {
            diagnostic = diagnostic.with_help(help);
        }

        self.diagnostics.push(diagnostic);
    }

    fn expected_help(expected: TokenKind, after: TokenKind) -> Option<&'static str> {
        match (expected, after) {
            (TokenKind::Ident, TokenKind::Let) => Some("a binding needs a name: `let <name> = <value>;`"),
            (TokenKind::Assign, TokenKind::Ident) => Some("bind a value with `=`: `let <name> = <value>;`"),
            _ => None,
        }
    }

    // =========================================
    // Main parsing
    // =========================================

    /// Parses statements until `Eof`. Always returns a program; problems
    /// end up in [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        self.diagnostics.clear();
        let mut program = Program::default();

        while !self.current_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(Some(stmt)) => {
                    debug!(statement = %stmt, "parsed statement");
                    program.statements.push(stmt);
                }
                Ok(None) => {}
                Err(()) => self.recover(),
            }
            self.next_token();
        }

        debug!(
            statements = program.statements.len(),
            errors = self.diagnostics.len(),
            "parsed program"
        );
        program
    }

    /// `Ok(None)` when the current token does not start a statement
    fn parse_statement(&mut self) -> Result<Option<Statement>, ()> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement().map(|s| Some(Statement::Let(s))),
            TokenKind::Return => self.parse_return_statement().map(|s| Some(Statement::Return(s))),
            // TODO: expression statements go here once an expression handler can parse them
            _ => Ok(None),
        }
    }

    /// Parse: `let <ident> = <expression>;`
    fn parse_let_statement(&mut self) -> Result<LetStatement, ()> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.current.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression()?;

        Ok(LetStatement { token, name, value })
    }

    /// Parse: `return <expression>;`
    fn parse_return_statement(&mut self) -> Result<ReturnStatement, ()> {
        let token = self.current.clone();
        self.next_token();

        let return_value = self.parse_expression()?;

        Ok(ReturnStatement { token, return_value })
    }

    fn parse_expression(&mut self) -> Result<Option<Expression>, ()> {
        let handler = self.expression_handler;
        let expression = handler(self)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Ok(expression)
    }

    fn recover(&mut self) {
        match self.options.recovery {
            RecoveryMode::SkipToken => {}
            RecoveryMode::Synchronize => self.synchronize(),
        }
    }

    /// Skips to the `;` that ends the broken statement; the caller's
    /// advance then steps past it
    fn synchronize(&mut self) {
        let mut skipped = 0usize;
        while !self.current_is(TokenKind::Semicolon) && !self.current_is(TokenKind::Eof) {
            self.next_token();
            skipped += 1;
        }
        debug!(skipped, "resynchronized at statement boundary");
    }
}

/// Parses source code with default options
///
/// Lexical diagnostics come first, followed by syntax diagnostics.
pub fn parse(source: &str, file_id: u32) -> (Program, Diagnostics) {
    parse_with_options(source, file_id, ParserOptions::default())
}

pub fn parse_with_options(source: &str, file_id: u32, options: ParserOptions) -> (Program, Diagnostics) {
    let mut parser = Parser::with_options(Lexer::new(source, file_id), options);
    let program = parser.parse_program();

    let mut diagnostics = parser.take_lexer_diagnostics();
    diagnostics.extend(parser.take_diagnostics());
    (program, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> (Program, Vec<String>) {
        let mut parser = Parser::new(Lexer::new(source, 0));
        let program = parser.parse_program();
        (program, parser.errors())
    }

    fn parse_synchronized(source: &str) -> (Program, Vec<String>) {
        let options = ParserOptions {
            recovery: RecoveryMode::Synchronize,
        };
        let mut parser = Parser::with_options(Lexer::new(source, 0), options);
        let program = parser.parse_program();
        (program, parser.errors())
    }

    fn let_names(program: &Program) -> Vec<&str> {
        program
            .statements
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::Let(let_stmt) => Some(let_stmt.name.value.as_str()),
                Statement::Return(_) => None,
            })
            .collect()
    }

    /// Accepts a single identifier as the whole expression
    fn identifier_expression(parser: &mut Parser<'_>) -> Result<Option<Expression>, ()> {
        if parser.current_is(TokenKind::Ident) {
            Ok(Some(Identifier::new(parser.current_token().clone()).into()))
        } else {
            skip_expression(parser)
        }
    }

    /// Accepts a single token as the whole expression and rejects anything
    /// after it but `;`
    fn single_token_expression(parser: &mut Parser<'_>) -> Result<Option<Expression>, ()> {
        let value: Option<Expression> = parser
            .current_is(TokenKind::Ident)
            .then(|| Identifier::new(parser.current_token().clone()).into());
        if !parser.peek_is(TokenKind::Eof) {
            parser.expect_peek(TokenKind::Semicolon)?;
        }
        Ok(value)
    }

    #[test]
    fn test_let_statements() {
        let (program, errors) = parse_source("let x = 5;\nlet y = 10;\nlet foobar = 4242;");

        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(program.statements.len(), 3);
        assert_eq!(let_names(&program), vec!["x", "y", "foobar"]);

        for stmt in &program.statements {
            assert_eq!(stmt.token_literal(), "let");
            let Statement::Let(let_stmt) = stmt else {
                panic!("expected let statement, got {:?}", stmt);
            };
            assert_eq!(let_stmt.name.token_literal(), let_stmt.name.value);
            assert!(let_stmt.value.is_none());
        }
    }

    #[test]
    fn test_return_statement() {
        let (program, errors) = parse_source("return 43;");

        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Statement::Return(_)));
        assert_eq!(program.statements[0].token_literal(), "return");
    }

    #[test]
    fn test_return_statements_between_lets() {
        let (program, errors) = parse_source("return 5;\nlet a = 1;\nreturn 10 + a;\nreturn;");

        assert!(errors.is_empty());
        let literals: Vec<_> = program.statements.iter().map(|s| s.token_literal()).collect();
        assert_eq!(literals, vec!["return", "let", "return", "return"]);
    }

    #[test]
    fn test_missing_identifier() {
        let (program, errors) = parse_source("let = 5;");

        assert_eq!(errors, vec!["expected next token to be `IDENT`, got `=` instead".to_string()]);
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_every_mismatch_is_reported() {
        let (program, errors) = parse_source("let x 5;\nlet = 10;\nlet 838383;\nlet ok = 1;");

        assert_eq!(
            errors,
            vec![
                "expected next token to be `=`, got `INT` instead".to_string(),
                "expected next token to be `IDENT`, got `=` instead".to_string(),
                "expected next token to be `IDENT`, got `INT` instead".to_string(),
            ]
        );
        assert_eq!(let_names(&program), vec!["ok"]);
    }

    #[test]
    fn test_unexpected_eof() {
        let (program, errors) = parse_source("let x");

        assert_eq!(errors, vec!["expected next token to be `=`, got `EOF` instead".to_string()]);
        assert!(program.is_empty());
    }

    #[test]
    fn test_missing_semicolon_stops_at_eof() {
        let (program, errors) = parse_source("let x = 5");
        assert!(errors.is_empty());
        assert_eq!(let_names(&program), vec!["x"]);

        let (program, errors) = parse_source("return");
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_other_tokens_produce_no_statement() {
        let (program, errors) = parse_source("5 + 5; foo; if (x) { }");
        assert!(errors.is_empty());
        assert!(program.is_empty());
    }

    #[test]
    fn test_illegal_token_in_place_of_name() {
        let mut parser = Parser::new(Lexer::new("let @ = 1;", 0));
        let program = parser.parse_program();

        assert!(program.is_empty());
        assert_eq!(
            parser.errors(),
            vec!["expected next token to be `IDENT`, got `ILLEGAL` instead".to_string()]
        );
        assert_eq!(parser.lexer_diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics().iter().next().and_then(|d| d.code),
            Some(ErrorCode::UNEXPECTED_TOKEN)
        );
    }

    #[test]
    fn test_skip_token_recovery_can_parse_inside_a_broken_statement() {
        let (program, errors) = parse_source("let = return x; let a = 1;");

        assert_eq!(errors.len(), 1);
        let literals: Vec<_> = program.statements.iter().map(|s| s.token_literal()).collect();
        assert_eq!(literals, vec!["return", "let"]);
    }

    #[test]
    fn test_synchronize_recovery_drops_the_broken_statement() {
        let (program, errors) = parse_synchronized("let = return x; let a = 1;");

        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements.len(), 1);
        assert_eq!(let_names(&program), vec!["a"]);
    }

    #[test]
    fn test_synchronize_at_eof() {
        let (program, errors) = parse_synchronized("let x y z");
        assert_eq!(errors.len(), 1);
        assert!(program.is_empty());
    }

    #[test]
    fn test_custom_expression_handler() {
        let mut parser =
            Parser::new(Lexer::new("let a = b;\nreturn c;\nlet d = 5;", 0)).with_expression_handler(identifier_expression);
        let program = parser.parse_program();

        assert!(parser.errors().is_empty());
        assert_eq!(program.to_string(), "let a = b;\nreturn c;\nlet d;");

        let Statement::Let(first) = &program.statements[0] else {
            panic!("expected let statement");
        };
        assert_eq!(first.value.as_ref().map(|v| v.token_literal()), Some("b"));
    }

    #[test]
    fn test_failing_expression_drops_the_statement() {
        let options = ParserOptions {
            recovery: RecoveryMode::Synchronize,
        };
        let mut parser = Parser::with_options(Lexer::new("let a = 5 6 7; let b = c;", 0), options)
            .with_expression_handler(single_token_expression);
        let program = parser.parse_program();

        assert_eq!(
            parser.errors(),
            vec!["expected next token to be `;`, got `INT` instead".to_string()]
        );
        assert_eq!(program.to_string(), "let b = c;");
    }

    #[test]
    fn test_failing_return_value_resynchronizes() {
        let options = ParserOptions {
            recovery: RecoveryMode::Synchronize,
        };
        let mut parser = Parser::with_options(Lexer::new("return x let y; return z;", 0), options)
            .with_expression_handler(single_token_expression);
        let program = parser.parse_program();

        // The `let` inside the broken statement is skipped along with it
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(program.to_string(), "return z;");
    }

    #[test]
    fn test_help_for_missing_name_and_assign() {
        let mut parser = Parser::new(Lexer::new("let = 1;
let x 2;
return @;", 0));
        parser.parse_program();

        let help: Vec<_> = parser.diagnostics().iter().map(|d| d.help.clone()).collect();
        assert_eq!(
            help,
            vec![
                vec!["a binding needs a name: `let <name> = <value>;`".to_string()],
                vec!["bind a value with `=`: `let <name> = <value>;`".to_string()],
            ]
        );
    }

    #[test]
    fn test_display_reparses_when_values_are_built() {
        let source = "let a = b;\nreturn c;";
        let mut parser = Parser::new(Lexer::new(source, 0)).with_expression_handler(identifier_expression);
        let printed = parser.parse_program().to_string();
        assert_eq!(printed, source);

        let mut reparser = Parser::new(Lexer::new(&printed, 0)).with_expression_handler(identifier_expression);
        assert_eq!(reparser.parse_program().to_string(), source);
        assert!(reparser.errors().is_empty());

        // A skipped value is left out of the printed form
        let (program, _) = parse_source("let x = 5;");
        assert_eq!(program.to_string(), "let x;");
    }

    #[test]
    fn test_errors_reset_between_runs() {
        let mut parser = Parser::new(Lexer::new("let = 1;", 0));
        parser.parse_program();
        assert_eq!(parser.errors().len(), 1);

        let program = parser.parse_program();
        assert!(program.is_empty());
        assert!(parser.errors().is_empty());
    }

    #[test]
    fn test_parse_collects_both_phases() {
        let (program, diagnostics) = parse("let # = 1;\nlet y = 2;", 0);

        assert_eq!(let_names(&program), vec!["y"]);
        assert_eq!(
            diagnostics.messages(),
            vec![
                "illegal character '#'".to_string(),
                "expected next token to be `IDENT`, got `ILLEGAL` instead".to_string(),
            ]
        );
    }

    #[test]
    fn test_window_primed_on_construction() {
        let parser = Parser::new(Lexer::new("let x", 0));
        assert!(parser.current_is(TokenKind::Let));
        assert!(parser.peek_is(TokenKind::Ident));
        assert_eq!(parser.peek_token().literal, "x");
        assert_eq!(parser.options().recovery, RecoveryMode::SkipToken);
    }
}

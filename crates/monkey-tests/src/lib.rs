//! End-to-end tests for the Monkey front end
//!
//! Runs source through the whole pipeline (Source → Lexer → Parser) and
//! offers assertion helpers on the outcome.

use monkey_error::Diagnostics;
use monkey_lexer::{tokenize, Token};
use monkey_parser::{parse_with_options, Node, ParserOptions, Program, RecoveryMode};
use std::fs;
use std::io;
use std::path::Path;

/// Result of running a source through the pipeline
#[derive(Debug)]
pub struct PipelineResult {
    /// Every token, including the final `Eof`
    pub tokens: Vec<Token>,
    pub program: Program,
    /// Lexical diagnostics followed by syntax diagnostics
    pub diagnostics: Diagnostics,
}

impl PipelineResult {
    pub fn success(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// `token_literal()` of every statement, in order
    pub fn statement_literals(&self) -> Vec<&str> {
        self.program.statements.iter().map(|s| s.token_literal()).collect()
    }
}

/// The parser owns the lexer it pulls from, so the token list comes from a
/// second lexing pass. Its diagnostics duplicate the ones `parse_with_options`
/// returns and are dropped.
pub fn run_pipeline(source: &str, options: ParserOptions) -> PipelineResult {
    let (tokens, _) = tokenize(source, 0);
    let (program, diagnostics) = parse_with_options(source, 0, options);

    PipelineResult {
        tokens,
        program,
        diagnostics,
    }
}

/// Pipeline with default options
pub fn parse_source(source: &str) -> PipelineResult {
    run_pipeline(source, ParserOptions::default())
}

/// Pipeline with statement-boundary recovery
pub fn parse_synchronized(source: &str) -> PipelineResult {
    run_pipeline(
        source,
        ParserOptions {
            recovery: RecoveryMode::Synchronize,
        },
    )
}

/// Reads a file from disk and runs it through the pipeline
pub fn parse_file(path: &Path) -> io::Result<PipelineResult> {
    let source = fs::read_to_string(path)?;
    Ok(parse_source(&source))
}

/// Asserts that source parses without errors and returns the program
pub fn assert_parses(source: &str) -> Program {
    let result = parse_source(source);
    if !result.success() {
        panic!(
            "Expected source to parse, but got errors:\n{:#?}",
            result.diagnostics.messages()
        );
    }
    result.program
}

/// Asserts that source produces at least one error and returns the diagnostics
pub fn assert_parse_fails(source: &str) -> Diagnostics {
    let result = parse_source(source);
    if result.success() {
        panic!(
            "Expected source to fail parsing, but it succeeded with:\n{}",
            result.program
        );
    }
    result.diagnostics
}

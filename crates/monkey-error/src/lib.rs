//! monkey-error - Diagnostics for the Monkey front end
//!
//! Lexical and syntax problems are never fatal: each phase records them as
//! [`Diagnostic`]s and keeps going. This crate holds the shared pieces for
//! that, from source spans to a renderer that prints rustc-style snippets.
//!
//! # Example
//!
//! ```rust
//! use monkey_error::{Diagnostic, DiagnosticRenderer, ErrorCode, SourceCache};
//! use monkey_error::span::{Position, Span};
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add("example.mk", "let = 10;");
//!
//! let span = Span::new(Position::new(1, 5, 4), Position::new(1, 6, 5), file_id);
//!
//! let diagnostic = Diagnostic::error("expected next token to be `IDENT`, got `=` instead")
//!     .with_code(ErrorCode::UNEXPECTED_TOKEN)
//!     .with_label(span, "found: =");
//!
//! let renderer = DiagnosticRenderer::new(&cache).without_colors();
//! assert!(renderer.render(&diagnostic).contains("example.mk:1:5"));
//! ```

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticRenderer, ErrorCode, Label, SourceCache, SourceFile};
pub use span::{Position, Span, Spanned};

/// Diagnostics accumulated by one phase, in the order they were reported
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Appends every diagnostic from `other`, keeping their order
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Every diagnostic the front end records is an error
    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Plain messages, without codes or snippets
    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|d| d.message.clone()).collect()
    }

    /// Renders all diagnostics
    pub fn render(&self, renderer: &DiagnosticRenderer<'_>) -> String {
        self.items
            .iter()
            .map(|d| renderer.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

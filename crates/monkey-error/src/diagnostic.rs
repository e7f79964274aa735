//! Diagnostic - compiler-style error messages
//!
//! A diagnostic carries:
//! - An error code (EL001, EP001, ...)
//! - The message itself
//! - Labels pointing into the source
//! - Optional notes and help lines

use crate::span::Span;
use std::fmt;

/// A label pointing to a specific region of the code
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// Primary labels are underlined with `^`, secondary ones with `-`
    pub primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }
}

/// Structured error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Category (L = Lexer, P = Parser)
    pub category: char,
    pub number: u16,
}

impl ErrorCode {
    pub const fn new(category: char, number: u16) -> Self {
        Self { category, number }
    }

    // Lexer errors
    pub const ILLEGAL_CHARACTER: Self = Self::new('L', 1);

    // Parser errors
    pub const UNEXPECTED_TOKEN: Self = Self::new('P', 1);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}{:03}", self.category, self.number)
    }
}

/// A complete diagnostic
///
/// `Display` yields the bare message; use [`DiagnosticRenderer`] for the
/// full snippet output.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Adds a primary label
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Adds a secondary label
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

/// Source files known to the renderer
#[derive(Debug, Default)]
pub struct SourceCache {
    files: Vec<SourceFile>,
}

#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offset of each line start
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Returns a 1-indexed line without its trailing newline
    pub fn get_line(&self, line: u32) -> Option<&str> {
        let line_idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches('\r'))
    }
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns its ID
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> u32 {
        let id = self.files.len() as u32;
        self.files.push(SourceFile::new(name, source));
        id
    }

    pub fn get(&self, id: u32) -> Option<&SourceFile> {
        self.files.get(id as usize)
    }

    /// Forgets every file; IDs start again from 0
    pub fn clear(&mut self) {
        self.files.clear();
    }
}

/// Renders a diagnostic for display
pub struct DiagnosticRenderer<'a> {
    cache: &'a SourceCache,
    use_colors: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(cache: &'a SourceCache) -> Self {
        Self {
            cache,
            use_colors: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.use_colors {
            code
        } else {
            ""
        }
    }

    /// Renders the diagnostic as a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let reset = self.paint("\x1b[0m");
        let bold = self.paint("\x1b[1m");
        let blue = self.paint("\x1b[1;34m");
        let color = self.paint("\x1b[1;31m"); // Bold Red

        // error[EP001]: message
        output.push_str(color);
        output.push_str("error");
        if let Some(code) = &diagnostic.code {
            output.push_str(&format!("[{}]", code));
        }
        output.push_str(reset);
        output.push_str(&format!("{}: {}{}\n", bold, diagnostic.message, reset));

        for label in &diagnostic.labels {
            let Some(file) = self.cache.get(label.span.file_id) else {
                continue;
            };

            output.push_str(&format!(
                " {}-->{} {}:{}:{}\n",
                blue, reset, file.name, label.span.start.line, label.span.start.column
            ));

            let Some(line_content) = file.get_line(label.span.start.line) else {
                continue;
            };

            let line_num = label.span.start.line;
            let padding = " ".repeat(line_num.to_string().len());

            output.push_str(&format!(" {} {}|{}\n", padding, blue, reset));
            output.push_str(&format!(" {}{}{} | {}\n", blue, line_num, reset, line_content));

            let col_start = label.span.start.column as usize;
            let underline_len = if label.span.start.line == label.span.end.line {
                label.span.end.column.saturating_sub(label.span.start.column).max(1) as usize
            } else {
                line_content.chars().count().saturating_sub(col_start - 1).max(1)
            };

            let spaces = " ".repeat(col_start.saturating_sub(1));
            let underline_char = if label.primary { "^" } else { "-" };
            let label_color = if label.primary { color } else { blue };

            output.push_str(&format!(
                " {} {}|{} {}{}{} {}{}\n",
                padding,
                blue,
                reset,
                spaces,
                label_color,
                underline_char.repeat(underline_len),
                label.message,
                reset
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = {}note{}: {}\n", bold, reset, note));
        }

        for help in &diagnostic.help {
            let green = self.paint("\x1b[1;32m");
            output.push_str(&format!("   = {}help{}: {}\n", green, reset, help));
        }

        output
    }
}

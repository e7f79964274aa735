//! Span - Source code location
//!
//! Every token keeps the region of source it was read from, so diagnostics
//! can point back at the exact characters.

/// A position in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line (1-indexed)
    pub line: u32,
    /// Column (1-indexed, counted in characters)
    pub column: u32,
    /// Byte offset from the beginning of the input
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// A region in the source code (start inclusive, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    /// Source file ID, as handed out by `SourceCache::add`
    pub file_id: u32,
}

impl Span {
    pub fn new(start: Position, end: Position, file_id: u32) -> Self {
        Self { start, end, file_id }
    }

    /// Zero-width span at a single position
    pub fn point(pos: Position, file_id: u32) -> Self {
        Self {
            start: pos,
            end: pos,
            file_id,
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        debug_assert_eq!(self.file_id, other.file_id, "Cannot merge spans from different files");
        Span {
            start: if self.start.offset <= other.start.offset {
                self.start
            } else {
                other.start
            },
            end: if self.end.offset >= other.end.offset {
                self.end
            } else {
                other.end
            },
            file_id: self.file_id,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can report where in the source it came from
pub trait Spanned {
    fn span(&self) -> Span;
}

//! Document abstraction consumed by the scanner
//!
//! Offsets are character offsets. Line lengths include the line delimiter.

use crate::error::Result;

/// A contiguous span of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub offset: usize,
    pub length: usize,
}

impl Region {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if `offset` lies inside `[offset, end)`
    pub fn contains(&self, offset: usize) -> bool {
        self.offset <= offset && offset < self.end()
    }
}

/// Read access to an indexable text with line lookup
pub trait Document {
    /// Number of characters
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at `offset`; fails when `offset >= len()`
    fn char_at(&self, offset: usize) -> Result<char>;

    /// Number of lines, always at least one
    fn line_count(&self) -> usize;

    /// Line containing `offset`; `offset == len()` maps to the last line
    fn line_of_offset(&self, offset: usize) -> Result<usize>;

    /// Offset of the first character of `line`
    fn line_offset(&self, line: usize) -> Result<usize>;

    /// Length of `line` including its delimiter
    fn line_length(&self, line: usize) -> Result<usize>;

    /// Region of `line` without its delimiter
    fn line_information(&self, line: usize) -> Result<Region>;

    /// Region of the line containing `offset`, without its delimiter
    fn line_information_of_offset(&self, offset: usize) -> Result<Region> {
        let line = self.line_of_offset(offset)?;
        self.line_information(line)
    }
}

//! Buffer representation - a collection of lines with associated metadata

use std::path::{Path, PathBuf};

use crate::document::{Document, Region};
use crate::error::{Result, ScanError};
use crate::line::Line;

/// A mutable text buffer addressed by character offsets
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Lines of text, delimiters included
    lines: Vec<Line>,
    /// Offset of the first character of each line
    line_starts: Vec<usize>,
    /// Buffer name (e.g., "main.R", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
}

impl TextBuffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_text(name, "")
    }

    /// Create a buffer holding `text`
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self {
            lines: Line::split_all(text),
            line_starts: Vec::new(),
            name: name.into(),
            filename: None,
            modified: false,
        };
        buffer.update_line_starts();
        buffer
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut buffer = Self::from_text(name, &content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whole content as a string
    pub fn text(&self) -> String {
        self.lines.iter().flat_map(|l| l.chars().iter()).collect()
    }

    /// Text of `region`
    pub fn text_of(&self, region: Region) -> Result<String> {
        self.check_range(region.offset, region.length)?;
        (region.offset..region.end()).map(|i| self.char_at(i)).collect()
    }

    /// Insert text at offset
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.replace(offset, 0, text)
    }

    /// Delete `length` characters at offset, returning the deleted text
    pub fn delete(&mut self, offset: usize, length: usize) -> Result<String> {
        let deleted = self.text_of(Region::new(offset, length))?;
        self.replace(offset, length, "")?;
        Ok(deleted)
    }

    /// Replace `length` characters at `offset` with `text`
    ///
    /// Only the touched lines and their direct neighbours are re-split, so a
    /// `\r` and `\n` meeting across the edit merge into one delimiter.
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<()> {
        self.check_range(offset, length)?;
        let end = offset + length;

        let first = self.line_of_offset(offset)?.saturating_sub(1);
        let last = (self.line_of_offset(end)? + 1).min(self.lines.len() - 1);
        let chunk_start = self.line_starts[first];

        let mut chars: Vec<char> = self.lines[first..=last]
            .iter()
            .flat_map(|l| l.chars().iter().copied())
            .collect();
        chars.splice(offset - chunk_start..end - chunk_start, text.chars());

        let joined: String = chars.into_iter().collect();
        let mut replacement = Line::split_all(&joined);
        // A delimited chunk end is followed by another line, so the empty
        // trailing piece is not a line of its own.
        if self.lines[last].delimiter_len() > 0 {
            replacement.pop();
        }

        self.lines.splice(first..=last, replacement);
        self.update_line_starts();
        self.modified = true;
        Ok(())
    }

    /// Write buffer to its file
    pub fn save(&mut self) -> Result<()> {
        let path = self.filename.clone().ok_or_else(|| {
            ScanError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "No filename set"))
        })?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Write buffer to specific path
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.text())?;
        Ok(())
    }

    fn check_range(&self, offset: usize, length: usize) -> Result<()> {
        match offset.checked_add(length) {
            Some(end) if end <= self.len() => Ok(()),
            _ => Err(ScanError::BadLocation { offset: offset.saturating_add(length), length: self.len() }),
        }
    }

    fn update_line_starts(&mut self) {
        self.line_starts.clear();
        let mut offset = 0;
        for line in &self.lines {
            self.line_starts.push(offset);
            offset += line.len();
        }
    }

    fn bad_line(&self, line: usize) -> ScanError {
        ScanError::BadLine { line, count: self.lines.len() }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("*scratch*")
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text("*scratch*", text)
    }
}

impl Document for TextBuffer {
    fn len(&self) -> usize {
        match (self.line_starts.last(), self.lines.last()) {
            (Some(start), Some(line)) => start + line.len(),
            _ => 0,
        }
    }

    fn char_at(&self, offset: usize) -> Result<char> {
        let length = self.len();
        if offset >= length {
            return Err(ScanError::BadLocation { offset, length });
        }
        let line = self.line_of_offset(offset)?;
        self.lines[line]
            .char_at(offset - self.line_starts[line])
            .ok_or(ScanError::BadLocation { offset, length })
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize> {
        let length = self.len();
        if offset > length {
            return Err(ScanError::BadLocation { offset, length });
        }
        // Line starts are strictly increasing: only the last line can be empty.
        Ok(match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        })
    }

    fn line_offset(&self, line: usize) -> Result<usize> {
        self.line_starts.get(line).copied().ok_or_else(|| self.bad_line(line))
    }

    fn line_length(&self, line: usize) -> Result<usize> {
        self.lines.get(line).map(Line::len).ok_or_else(|| self.bad_line(line))
    }

    fn line_information(&self, line: usize) -> Result<Region> {
        let start = self.line_offset(line)?;
        let content = self.lines[line].content_len();
        Ok(Region::new(start, content))
    }
}

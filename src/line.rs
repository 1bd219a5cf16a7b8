//! Line representation for the text buffer
//!
//! A line stores its characters together with its trailing delimiter, so the
//! character offsets of a buffer are simply the concatenation of its lines.

use unicode_width::UnicodeWidthChar;

/// A single line of text in a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Characters of the line, delimiter included
    chars: Vec<char>,
    /// Number of trailing delimiter characters (0, 1 or 2)
    delimiter: usize,
}

impl Line {
    /// Create a new empty line without delimiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line from its content and delimiter
    pub fn from_parts(content: &str, delimiter: &str) -> Self {
        let mut chars: Vec<char> = content.chars().collect();
        let delimiter_len = delimiter.chars().count();
        chars.extend(delimiter.chars());
        Self {
            chars,
            delimiter: delimiter_len,
        }
    }

    /// Split text into lines at `\n`, `\r\n` and `\r`
    ///
    /// Always returns at least one line. Text ending in a delimiter yields a
    /// trailing empty line.
    pub fn split_all(text: &str) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        let mut iter = text.chars().peekable();

        while let Some(ch) = iter.next() {
            match ch {
                '\n' => {
                    current.push('\n');
                    lines.push(Line { chars: std::mem::take(&mut current), delimiter: 1 });
                }
                '\r' => {
                    current.push('\r');
                    if iter.peek() == Some(&'\n') {
                        iter.next();
                        current.push('\n');
                        lines.push(Line { chars: std::mem::take(&mut current), delimiter: 2 });
                    } else {
                        lines.push(Line { chars: std::mem::take(&mut current), delimiter: 1 });
                    }
                }
                _ => current.push(ch),
            }
        }
        lines.push(Line { chars: current, delimiter: 0 });
        lines
    }

    /// All characters, delimiter included
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Line content without the delimiter
    pub fn text(&self) -> String {
        self.chars[..self.content_len()].iter().collect()
    }

    /// Length in characters, delimiter included
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Length in characters, delimiter excluded
    pub fn content_len(&self) -> usize {
        self.chars.len() - self.delimiter
    }

    /// Length of the trailing delimiter
    pub fn delimiter_len(&self) -> usize {
        self.delimiter
    }

    /// Check if the line holds no characters at all
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at a column, delimiter included
    pub fn char_at(&self, col: usize) -> Option<char> {
        self.chars.get(col).copied()
    }

    /// Display width of the content, tabs expanded to `tab_width`
    pub fn display_width(&self, tab_width: usize) -> usize {
        self.display_col(self.content_len(), tab_width)
    }

    /// Display column of the character at `col`
    pub fn display_col(&self, col: usize, tab_width: usize) -> usize {
        let tab_width = tab_width.max(1);
        let mut width = 0;
        for &ch in self.chars.iter().take(col.min(self.content_len())) {
            if ch == '\t' {
                width += tab_width - (width % tab_width);
            } else {
                width += ch.width().unwrap_or(0);
            }
        }
        width
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_parts(s, "")
    }
}

//! Pattern rules for partitioning
//!
//! This module defines the rule types used to find the typed spans
//! (comments, strings, ...) of a line.

use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, ScanError};

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ScanError::Pattern {
        name: name.to_string(),
        source,
    })
}

/// A single-line rule
///
/// Matches a regex pattern and assigns a partition type to the match.
/// Rules are tried in priority order (highest first).
#[derive(Debug, Clone)]
pub struct LineRule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Partition type assigned to matches
    pub partition: Arc<str>,
    /// Priority (higher = matched first)
    pub priority: i32,
}

impl LineRule {
    /// Create a new line rule
    pub fn new(name: &str, pattern: &str, partition: &str, priority: i32) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            pattern: compile(name, pattern)?,
            partition: Arc::from(partition),
            priority,
        })
    }

    /// Find the first match in text starting at position
    pub fn find_at(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start >= text.len() {
            return None;
        }
        self.pattern.find_at(text, start).map(|m| (m.start(), m.end()))
    }
}

/// A construct that may span lines (block comments, strings)
#[derive(Debug, Clone)]
pub struct BlockRule {
    /// Name for debugging
    pub name: String,
    /// Pattern that opens the construct
    pub start: Regex,
    /// Pattern that closes the construct
    pub end: Regex,
    /// Partition type of the whole construct
    pub partition: Arc<str>,
    /// Escape character protecting the closing pattern
    pub escape_char: Option<char>,
    /// Unique ID for this multiline state (1-255, 0 = normal)
    pub state_id: u8,
}

impl BlockRule {
    /// Create a new block rule
    pub fn new(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        partition: &str,
        state_id: u8,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            start: compile(name, start_pattern)?,
            end: compile(name, end_pattern)?,
            partition: Arc::from(partition),
            escape_char: None,
            state_id,
        })
    }

    /// Create a block rule with escape support
    pub fn with_escape(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        partition: &str,
        state_id: u8,
        escape_char: char,
    ) -> Result<Self> {
        let mut rule = Self::new(name, start_pattern, end_pattern, partition, state_id)?;
        rule.escape_char = Some(escape_char);
        Ok(rule)
    }

    /// Find start of this construct in text
    pub fn find_start(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start >= text.len() {
            return None;
        }
        self.start.find_at(text, start).map(|m| (m.start(), m.end()))
    }

    /// Find end of this construct in text, respecting escapes
    pub fn find_end(&self, text: &str, start: usize) -> Option<usize> {
        if start >= text.len() {
            return None;
        }

        let Some(escape) = self.escape_char else {
            return self.end.find_at(text, start).map(|m| m.end());
        };

        let mut pos = start;
        while pos < text.len() {
            let m = self.end.find_at(text, pos)?;
            let escapes = text[start..m.start()]
                .chars()
                .rev()
                .take_while(|&c| c == escape)
                .count();
            if escapes % 2 == 0 {
                return Some(m.end());
            }
            // Odd number of escapes = escaped
            pos = if m.end() > pos {
                m.end()
            } else {
                text[pos..].chars().next().map_or(text.len(), |c| pos + c.len_utf8())
            };
        }
        None
    }
}

/// Line state for tracking multi-line constructs
///
/// This is carried from line to line to track whether we're inside a
/// block comment, string, etc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    /// 0 = normal, non-zero = inside block rule with this ID
    pub multiline_id: u8,
}

impl LineState {
    /// Create state for being inside a block construct
    pub fn inside(state_id: u8) -> Self {
        Self { multiline_id: state_id }
    }

    pub fn is_inside_multiline(&self) -> bool {
        self.multiline_id != 0
    }

    pub fn is_normal(&self) -> bool {
        self.multiline_id == 0
    }
}

//! Language definitions for partitioning
//!
//! A `LanguageDefinition` combines the block and line rules that carve a
//! language's source into partitions.

use std::sync::Arc;

use super::rules::{BlockRule, LineRule, LineState};

/// A typed span of one line, in byte offsets of the line text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpan {
    pub start: usize,
    pub end: usize,
    pub kind: Arc<str>,
}

/// Result of partitioning a single line
#[derive(Debug)]
pub struct LinePartitions {
    /// Typed spans, sorted and non-overlapping
    pub spans: Vec<PartitionSpan>,
    /// State at end of line (for next line)
    pub end_state: LineState,
}

enum Opening<'r> {
    Block(&'r BlockRule, usize),
    Line(&'r LineRule, usize),
}

/// A complete language definition for partitioning
#[derive(Debug, Clone)]
pub struct LanguageDefinition {
    /// Language name (e.g., "R", "Rust")
    pub name: String,
    /// File extensions (e.g., ["r"], ["py", "pyw"])
    pub extensions: Vec<String>,
    /// Single-line rules, sorted by priority (highest first)
    pub line_rules: Vec<LineRule>,
    /// Block rules, earlier rules win ties
    pub block_rules: Vec<BlockRule>,
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            line_rules: Vec::new(),
            block_rules: Vec::new(),
        }
    }

    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.push(ext.to_string());
    }

    pub fn add_line_rule(&mut self, rule: LineRule) {
        self.line_rules.push(rule);
        // Keep sorted by priority (highest first)
        self.line_rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    pub fn add_block_rule(&mut self, rule: BlockRule) {
        self.block_rules.push(rule);
    }

    /// Get block rule by state ID
    pub fn block_rule(&self, state_id: u8) -> Option<&BlockRule> {
        self.block_rules.iter().find(|r| r.state_id == state_id)
    }

    /// Partition type of the construct a line state is inside of
    pub fn partition_of_state(&self, state: LineState) -> Option<Arc<str>> {
        self.block_rule(state.multiline_id).map(|r| Arc::clone(&r.partition))
    }

    /// All partition types this language produces
    pub fn partition_types(&self) -> Vec<Arc<str>> {
        let mut kinds: Vec<Arc<str>> = Vec::new();
        let all = self
            .block_rules
            .iter()
            .map(|r| &r.partition)
            .chain(self.line_rules.iter().map(|r| &r.partition));
        for kind in all {
            if !kinds.contains(kind) {
                kinds.push(Arc::clone(kind));
            }
        }
        kinds
    }

    /// Partition a single line of text
    ///
    /// `text` excludes the line delimiter. Takes the state from the previous
    /// line and returns the typed spans plus the state for the next line.
    /// The earliest opening wins; on a tie block rules beat line rules and
    /// earlier rules beat later ones.
    pub fn partition_line(&self, text: &str, prev_state: LineState) -> LinePartitions {
        let mut spans = Vec::new();
        let mut pos = 0;
        let mut state = prev_state;

        while pos < text.len() {
            if state.is_inside_multiline() {
                if let Some(rule) = self.block_rule(state.multiline_id) {
                    match rule.find_end(text, pos) {
                        Some(end) => {
                            push_span(&mut spans, pos, end, &rule.partition);
                            pos = end.max(next_boundary(text, pos));
                            state = LineState::default();
                            continue;
                        }
                        None => {
                            push_span(&mut spans, pos, text.len(), &rule.partition);
                            return LinePartitions { spans, end_state: state };
                        }
                    }
                }
                // Unknown state - reset
                state = LineState::default();
            }

            let mut best: Option<(usize, Opening<'_>)> = None;
            for rule in &self.block_rules {
                if let Some((start, end)) = rule.find_start(text, pos) {
                    if best.as_ref().map_or(true, |(s, _)| start < *s) {
                        best = Some((start, Opening::Block(rule, end)));
                    }
                }
            }
            for rule in &self.line_rules {
                if let Some((start, end)) = rule.find_at(text, pos) {
                    if best.as_ref().map_or(true, |(s, _)| start < *s) {
                        best = Some((start, Opening::Line(rule, end)));
                    }
                }
            }

            match best {
                None => break,
                Some((start, Opening::Line(rule, end))) => {
                    push_span(&mut spans, start, end, &rule.partition);
                    pos = end.max(next_boundary(text, start));
                }
                Some((start, Opening::Block(rule, open_end))) => match rule.find_end(text, open_end) {
                    Some(close) => {
                        push_span(&mut spans, start, close, &rule.partition);
                        pos = close.max(next_boundary(text, start));
                    }
                    None => {
                        push_span(&mut spans, start, text.len(), &rule.partition);
                        return LinePartitions {
                            spans,
                            end_state: LineState::inside(rule.state_id),
                        };
                    }
                },
            }
        }

        LinePartitions { spans, end_state: state }
    }
}

fn push_span(spans: &mut Vec<PartitionSpan>, start: usize, end: usize, kind: &Arc<str>) {
    if start < end {
        spans.push(PartitionSpan {
            start,
            end,
            kind: Arc::clone(kind),
        });
    }
}

/// Byte offset just past the character at `pos`
fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(text.len(), |c| pos + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("Test");
        lang.add_extension("test");

        if let Ok(rule) = LineRule::new("line_comment", r"//.*$", "comment", 100) {
            lang.add_line_rule(rule);
        }
        if let Ok(rule) = BlockRule::new("block_comment", r"/\*", r"\*/", "comment", 1) {
            lang.add_block_rule(rule);
        }
        if let Ok(rule) = BlockRule::with_escape("string", "\"", "\"", "string", 2, '\\') {
            lang.add_block_rule(rule);
        }

        lang
    }

    fn ranges(result: &LinePartitions) -> Vec<(usize, usize, &str)> {
        result.spans.iter().map(|s| (s.start, s.end, &*s.kind)).collect()
    }

    #[test]
    fn test_plain_code() {
        let lang = create_test_language();
        let result = lang.partition_line("let x = 42;", LineState::default());
        assert!(result.spans.is_empty());
        assert!(result.end_state.is_normal());
    }

    #[test]
    fn test_string_before_comment() {
        let lang = create_test_language();
        let result = lang.partition_line(r#"f("//", x) // done"#, LineState::default());
        assert_eq!(ranges(&result), vec![(2, 6, "string"), (11, 18, "comment")]);
    }

    #[test]
    fn test_comment_hides_quote() {
        let lang = create_test_language();
        let result = lang.partition_line(r#"x // "not a string"#, LineState::default());
        assert_eq!(ranges(&result), vec![(2, 18, "comment")]);
        assert!(result.end_state.is_normal());
    }

    #[test]
    fn test_block_start() {
        let lang = create_test_language();
        let result = lang.partition_line("code /* comment", LineState::default());
        assert_eq!(result.end_state, LineState::inside(1));
        assert_eq!(ranges(&result), vec![(5, 15, "comment")]);
    }

    #[test]
    fn test_block_continue_and_end() {
        let lang = create_test_language();
        let result = lang.partition_line("still in comment", LineState::inside(1));
        assert_eq!(result.end_state, LineState::inside(1));
        assert_eq!(ranges(&result), vec![(0, 16, "comment")]);

        let result = lang.partition_line("end */ code", LineState::inside(1));
        assert!(result.end_state.is_normal());
        assert_eq!(ranges(&result), vec![(0, 6, "comment")]);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let lang = create_test_language();
        let result = lang.partition_line(r#"s = "a\"b"; t"#, LineState::default());
        assert_eq!(ranges(&result), vec![(4, 10, "string")]);
    }

    #[test]
    fn test_multibyte_text() {
        let lang = create_test_language();
        let result = lang.partition_line("é = \"ü\"", LineState::default());
        assert_eq!(ranges(&result), vec![(5, 9, "string")]);
    }

    #[test]
    fn test_partition_types() {
        let lang = create_test_language();
        let kinds = lang.partition_types();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.iter().any(|k| &**k == "comment"));
        assert!(kinds.iter().any(|k| &**k == "string"));
    }
}

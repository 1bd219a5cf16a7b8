//! Stop conditions
//!
//! A stop condition decides whether a scan halts at the current character
//! and where the scan looks next. Conditions that carry per-scan state
//! ([`EscapedCharSet`], [`PartitionGated`]) must be created fresh for every
//! scan operation; [`NonBlank`] and [`WordBoundary`] are plain values and can
//! be shared as constants.

use super::{ScanContext, ScanState};
use crate::partition::NO_PARTITION;

/// Termination predicate plus stepping policy for a linear scan
pub trait StopCondition {
    /// Does the current scan state satisfy termination?
    fn stop(&mut self, ctx: &ScanContext<'_>, state: &ScanState) -> bool;

    /// Next position to look at when scanning forward
    fn next_forward(&self, state: &ScanState) -> isize {
        state.position + 1
    }

    /// Next position to look at when scanning backward
    fn next_backward(&self, state: &ScanState) -> isize {
        state.position - 1
    }
}

impl<C: StopCondition + ?Sized> StopCondition for &mut C {
    fn stop(&mut self, ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        (**self).stop(ctx, state)
    }

    fn next_forward(&self, state: &ScanState) -> isize {
        (**self).next_forward(state)
    }

    fn next_backward(&self, state: &ScanState) -> isize {
        (**self).next_backward(state)
    }
}

/// Stops on any member of a fixed character set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    chars: Vec<char>,
}

impl CharSet {
    pub fn new(chars: &[char]) -> Self {
        let mut chars = chars.to_vec();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    pub fn single(ch: char) -> Self {
        Self { chars: vec![ch] }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.binary_search(&ch).is_ok()
    }
}

impl StopCondition for CharSet {
    fn stop(&mut self, _ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        self.contains(state.current_char)
    }
}

/// Character set with an escape character
///
/// The character following an escape never matches and the escape itself
/// never matches. A doubled escape cancels out: in `\\)` the `)` matches.
///
/// Escapes are tracked in every partition, but a member of the set only
/// matches if the content type at its position is accepted by the scan
/// filter. Use it bare, not under [`PartitionGated`].
#[derive(Debug, Clone)]
pub struct EscapedCharSet {
    chars: CharSet,
    escape: char,
    last_escape: Option<isize>,
}

impl EscapedCharSet {
    pub fn new(chars: &[char], escape: char) -> Self {
        Self {
            chars: CharSet::new(chars),
            escape,
            last_escape: None,
        }
    }
}

impl StopCondition for EscapedCharSet {
    fn stop(&mut self, ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        if self.last_escape.is_some_and(|e| state.position == e + 1) {
            return false;
        }
        if state.current_char == self.escape {
            self.last_escape = Some(state.position);
            return false;
        }
        if !self.chars.contains(state.current_char) {
            return false;
        }
        match ctx.content_type(state.position as usize) {
            Some(kind) => ctx.filter.matches(&kind),
            None => ctx.filter.matches(NO_PARTITION),
        }
    }
}

/// Stops on anything that is not a space separator or tab
///
/// With `line_break_is_blank`, `\r` and `\n` count as blank too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonBlank {
    pub line_break_is_blank: bool,
}

/// Stops on the first non-blank; line breaks are stop points
pub const NON_BLANK: NonBlank = NonBlank { line_break_is_blank: false };

/// Stops on the first non-blank that is not a line break either
pub const NON_BLANK_OR_LINE_BREAK: NonBlank = NonBlank { line_break_is_blank: true };

impl NonBlank {
    /// One of the shared constants, picked by line-break handling
    pub const fn shared(line_break_is_blank: bool) -> Self {
        if line_break_is_blank {
            NON_BLANK_OR_LINE_BREAK
        } else {
            NON_BLANK
        }
    }
}

impl StopCondition for NonBlank {
    fn stop(&mut self, _ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        let c = state.current_char;
        if is_blank(c) {
            return false;
        }
        !(self.line_break_is_blank && (c == '\r' || c == '\n'))
    }
}

/// Space separators (Unicode category Zs) and tab
pub fn is_blank(c: char) -> bool {
    matches!(
        c,
        '\t' | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Stops on any character that is not alphanumeric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordBoundary;

impl StopCondition for WordBoundary {
    fn stop(&mut self, _ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        !state.current_char.is_alphanumeric()
    }
}

/// Stops where a character predicate holds
#[derive(Debug, Clone, Copy)]
pub struct Predicate<F>(pub F);

impl<F: FnMut(char) -> bool> StopCondition for Predicate<F> {
    fn stop(&mut self, _ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        (self.0)(state.current_char)
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedPartition {
    start: usize,
    end: usize,
    matched: bool,
}

/// Restricts a condition to partitions accepted by the scanner's filter
///
/// Inside a rejected partition the condition never stops, and stepping jumps
/// straight to the partition boundary. The bounds of the last partition are
/// cached, so characters of one accepted partition cost a single classifier
/// query.
#[derive(Debug, Clone)]
pub struct PartitionGated<C> {
    inner: C,
    current: Option<CachedPartition>,
}

impl<C: StopCondition> PartitionGated<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, current: None }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: StopCondition> StopCondition for PartitionGated<C> {
    fn stop(&mut self, ctx: &ScanContext<'_>, state: &ScanState) -> bool {
        let pos = state.position as usize;
        if let Some(cached) = self.current {
            if cached.matched && cached.start <= pos && pos < cached.end {
                return self.inner.stop(ctx, state);
            }
        }

        let partition = ctx.partition(pos);
        let matched = ctx.filter.matches(&partition.kind);
        self.current = Some(CachedPartition {
            start: partition.offset,
            end: partition.end(),
            matched,
        });
        matched && self.inner.stop(ctx, state)
    }

    fn next_forward(&self, state: &ScanState) -> isize {
        match self.current {
            Some(c) if c.matched => self.inner.next_forward(state),
            Some(c) if state.position < c.end as isize => c.end as isize,
            _ => state.position + 1,
        }
    }

    fn next_backward(&self, state: &ScanState) -> isize {
        match self.current {
            Some(c) if c.matched => self.inner.next_backward(state),
            Some(c) if state.position >= c.start as isize => c.start as isize - 1,
            _ => state.position - 1,
        }
    }
}

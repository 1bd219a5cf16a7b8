//! Linear scanning engine
//!
//! Walks positions in one direction, evaluating a stop condition at each
//! step. A failed read ends the scan with `None` instead of an error: the
//! document may be shorter than the caller believed.

use log::trace;

use super::condition::StopCondition;
use super::{Bound, ScanContext, ScanState};

/// Lowest position in `[start, bound)` where `condition` stops
///
/// On exhaustion `state.position` is left at the resolved bound.
pub(crate) fn scan_forward<C: StopCondition + ?Sized>(
    ctx: &ScanContext<'_>,
    state: &mut ScanState,
    start: usize,
    bound: Bound,
    condition: &mut C,
) -> Option<usize> {
    let length = ctx.document.len();
    let bound = match bound {
        Bound::Unbound => length,
        Bound::At(bound) => bound,
    };
    debug_assert!(bound <= length, "forward bound {bound} beyond length {length}");

    state.position = start.min(bound) as isize;
    while state.position < bound as isize {
        let pos = state.position as usize;
        match ctx.document.char_at(pos) {
            Ok(ch) => state.current_char = ch,
            Err(e) => {
                trace!("forward scan aborted: {}", e);
                return None;
            }
        }
        if condition.stop(ctx, state) {
            return Some(pos);
        }
        state.position = condition.next_forward(state);
    }
    state.position = bound as isize;
    None
}

/// Highest position in `(bound, start]` where `condition` stops
///
/// `start` may be `-1`, giving an empty range. On exhaustion
/// `state.position` is left at the resolved bound.
pub(crate) fn scan_backward<C: StopCondition + ?Sized>(
    ctx: &ScanContext<'_>,
    state: &mut ScanState,
    start: isize,
    bound: Bound,
    condition: &mut C,
) -> Option<usize> {
    let bound = match bound {
        Bound::Unbound => -1,
        Bound::At(bound) => bound as isize,
    };

    if !ctx.document.is_empty() {
        state.position = start;
        while state.position > bound {
            let pos = state.position as usize;
            match ctx.document.char_at(pos) {
                Ok(ch) => state.current_char = ch,
                Err(e) => {
                    trace!("backward scan aborted: {}", e);
                    return None;
                }
            }
            if condition.stop(ctx, state) {
                return Some(pos);
            }
            state.position = condition.next_backward(state);
        }
    }
    state.position = bound;
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::document::Document;
    use crate::error::{Result, ScanError};
    use crate::partition::{Partition, PartitionClassifier, PartitionFilter, WholeDocument};
    use crate::scanner::condition::{CharSet, PartitionGated};
    use std::cell::Cell;

    /// Classifier with one string partition, counting its queries
    struct Counting {
        string: (usize, usize),
        queries: Cell<usize>,
    }

    impl PartitionClassifier for Counting {
        fn partitioning(&self) -> &str {
            "counting"
        }

        fn partition_at(&self, document: &dyn Document, offset: usize) -> Result<Partition> {
            self.queries.set(self.queries.get() + 1);
            let (start, end) = self.string;
            Ok(if offset < start {
                Partition::new("code", 0, start)
            } else if offset < end {
                Partition::new("string", start, end - start)
            } else {
                Partition::new("code", end, document.len() - end)
            })
        }
    }

    /// Classifier that always fails
    struct Broken;

    impl PartitionClassifier for Broken {
        fn partitioning(&self) -> &str {
            "broken"
        }

        fn partition_at(&self, document: &dyn Document, offset: usize) -> Result<Partition> {
            Err(ScanError::BadLocation { offset, length: document.len() })
        }
    }

    #[test]
    fn test_forward_and_backward() {
        let buffer = TextBuffer::from("ab;cd;");
        let classifier = WholeDocument::new();
        let filter = PartitionFilter::Any;
        let ctx = ScanContext::new(&buffer, &classifier, &filter);
        let mut state = ScanState::default();
        let mut semi = CharSet::single(';');

        assert_eq!(scan_forward(&ctx, &mut state, 0, Bound::Unbound, &mut semi), Some(2));
        assert_eq!(scan_forward(&ctx, &mut state, 3, Bound::Unbound, &mut semi), Some(5));
        assert_eq!(scan_backward(&ctx, &mut state, 4, Bound::Unbound, &mut semi), Some(2));
        assert_eq!(scan_backward(&ctx, &mut state, 1, Bound::Unbound, &mut semi), None);
        assert_eq!(state.position, -1);
        assert_eq!(scan_backward(&ctx, &mut state, -1, Bound::Unbound, &mut semi), None);
    }

    #[test]
    fn test_read_failure_is_not_found() {
        let buffer = TextBuffer::from("abc");
        let classifier = WholeDocument::new();
        let filter = PartitionFilter::Any;
        let ctx = ScanContext::new(&buffer, &classifier, &filter);
        let mut state = ScanState::default();

        let mut any = CharSet::single('z');
        assert_eq!(scan_backward(&ctx, &mut state, 10, Bound::Unbound, &mut any), None);
        assert_eq!(state.position, 10);
    }

    #[test]
    fn test_backward_on_empty_document() {
        let buffer = TextBuffer::from("");
        let classifier = WholeDocument::new();
        let filter = PartitionFilter::Any;
        let ctx = ScanContext::new(&buffer, &classifier, &filter);
        let mut state = ScanState::default();

        let mut any = CharSet::single('z');
        assert_eq!(scan_backward(&ctx, &mut state, 0, Bound::Unbound, &mut any), None);
        assert_eq!(state.position, -1);
    }

    #[test]
    fn test_partition_skip_is_constant() {
        let text = format!("x(\"{}\")", "(".repeat(10_000));
        let buffer = TextBuffer::from(text.as_str());
        let classifier = Counting {
            string: (2, 10_004),
            queries: Cell::new(0),
        };
        let filter = PartitionFilter::single("code");
        let ctx = ScanContext::new(&buffer, &classifier, &filter);
        let mut state = ScanState::default();

        let mut paren = PartitionGated::new(CharSet::new(&['(', ')']));
        assert_eq!(scan_forward(&ctx, &mut state, 2, Bound::Unbound, &mut paren), Some(10_004));
        assert_eq!(classifier.queries.get(), 2);

        let mut paren = PartitionGated::new(CharSet::new(&['(', ')']));
        classifier.queries.set(0);
        assert_eq!(scan_backward(&ctx, &mut state, 10_003, Bound::Unbound, &mut paren), Some(1));
        assert_eq!(classifier.queries.get(), 2);
    }

    #[test]
    fn test_classifier_failure_is_tolerated() {
        let buffer = TextBuffer::from("a(b");
        let classifier = Broken;
        let ctx_any = PartitionFilter::Any;
        let ctx = ScanContext::new(&buffer, &classifier, &ctx_any);
        let mut state = ScanState::default();

        // The placeholder partition matches only an unrestricted filter
        let mut paren = PartitionGated::new(CharSet::single('('));
        assert_eq!(scan_forward(&ctx, &mut state, 0, Bound::Unbound, &mut paren), Some(1));

        let code = PartitionFilter::single("code");
        let ctx = ScanContext::new(&buffer, &classifier, &code);
        let mut paren = PartitionGated::new(CharSet::single('('));
        assert_eq!(scan_forward(&ctx, &mut state, 0, Bound::Unbound, &mut paren), None);
        assert_eq!(state.position, 3);
    }
}

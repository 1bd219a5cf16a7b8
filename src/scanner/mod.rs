//! Heuristic token scanner
//!
//! Answers point queries on a document snapshot without parsing it: find the
//! next non-blank, the matching bracket, the word around an offset. Scans are
//! restricted to the partitions accepted by the configured
//! [`PartitionFilter`], so brackets inside strings or comments are ignored
//! unless those partitions are scanned on purpose.
//!
//! A scanner holds the state of the scan in flight and is not reentrant;
//! every scan takes `&mut self`.

mod condition;
mod linear;
mod peer;
mod region;

use std::sync::Arc;

use log::debug;

use crate::document::Document;
use crate::partition::{Partition, PartitionClassifier, PartitionFilter, DEFAULT_CONTENT_TYPE};

pub use condition::{
    is_blank, CharSet, EscapedCharSet, NonBlank, PartitionGated, Predicate, StopCondition,
    WordBoundary, NON_BLANK, NON_BLANK_OR_LINE_BREAK,
};

/// Result of a find operation that found nothing
pub const NOT_FOUND: Option<usize> = None;

/// Bound resolving to the document extremity in scan direction
pub const UNBOUND: Bound = Bound::Unbound;

/// Limit of a scan range
///
/// Forward scans visit positions `< bound`, backward scans positions
/// `> bound`. `Unbound` resolves to the document length (forward) or `-1`
/// (backward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    #[default]
    Unbound,
    At(usize),
}

impl From<usize> for Bound {
    fn from(offset: usize) -> Self {
        Bound::At(offset)
    }
}

impl From<Option<usize>> for Bound {
    fn from(offset: Option<usize>) -> Self {
        offset.map_or(Bound::Unbound, Bound::At)
    }
}

/// An opening/closing character pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerPair {
    pub open: char,
    pub close: char,
}

impl PeerPair {
    pub const PARENTHESES: PeerPair = PeerPair::new('(', ')');
    pub const BRACKETS: PeerPair = PeerPair::new('[', ']');
    pub const BRACES: PeerPair = PeerPair::new('{', '}');
    pub const ANGLES: PeerPair = PeerPair::new('<', '>');
    pub const DOUBLE_QUOTES: PeerPair = PeerPair::new('"', '"');
    pub const SINGLE_QUOTES: PeerPair = PeerPair::new('\'', '\'');

    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// Quotes use the same character on both sides
    pub fn is_symmetric(&self) -> bool {
        self.open == self.close
    }

    pub fn chars(&self) -> [char; 2] {
        [self.open, self.close]
    }

    /// Pair containing `ch` on either side
    pub fn find(pairs: &[PeerPair], ch: char) -> Option<PeerPair> {
        pairs.iter().copied().find(|p| p.open == ch || p.close == ch)
    }
}

/// Position and character of the most recent scan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub position: isize,
    pub current_char: char,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            position: 0,
            current_char: '\0',
        }
    }
}

/// Read-only environment of a scan
#[derive(Clone, Copy)]
pub struct ScanContext<'s> {
    pub document: &'s dyn Document,
    pub classifier: &'s dyn PartitionClassifier,
    pub filter: &'s PartitionFilter,
}

impl<'s> ScanContext<'s> {
    pub fn new(
        document: &'s dyn Document,
        classifier: &'s dyn PartitionClassifier,
        filter: &'s PartitionFilter,
    ) -> Self {
        Self {
            document,
            classifier,
            filter,
        }
    }

    /// Partition at `offset`, or a zero-length placeholder if the classifier fails
    pub fn partition(&self, offset: usize) -> Partition {
        self.classifier
            .partition_at(self.document, offset)
            .unwrap_or_else(|e| {
                debug!("no partition at {}: {}", offset, e);
                Partition::sentinel(offset)
            })
    }

    /// Content type at `offset`, `None` if the classifier fails
    pub fn content_type(&self, offset: usize) -> Option<Arc<str>> {
        match self.classifier.content_type_at(self.document, offset) {
            Ok(kind) => Some(kind),
            Err(e) => {
                debug!("no content type at {}: {}", offset, e);
                None
            }
        }
    }
}

struct Configuration<'a> {
    document: &'a dyn Document,
    filter: PartitionFilter,
}

/// Partition-aware heuristic scanner over one configured document
pub struct HeuristicScanner<'a> {
    classifier: &'a dyn PartitionClassifier,
    config: Option<Configuration<'a>>,
    state: ScanState,
}

impl<'a> HeuristicScanner<'a> {
    /// Create a scanner using `classifier` for partition lookups
    ///
    /// [`configure`](Self::configure) must be called before scanning.
    pub fn new(classifier: &'a dyn PartitionClassifier) -> Self {
        Self {
            classifier,
            config: None,
            state: ScanState::default(),
        }
    }

    /// Create a scanner already configured for `document`
    pub fn with_document(
        classifier: &'a dyn PartitionClassifier,
        document: &'a dyn Document,
        filter: PartitionFilter,
    ) -> Self {
        let mut scanner = Self::new(classifier);
        scanner.configure(document, filter);
        scanner
    }

    /// Set the document and the partitions to scan in, replacing any
    /// previous configuration
    pub fn configure(&mut self, document: &'a dyn Document, filter: PartitionFilter) {
        self.config = Some(Configuration { document, filter });
        self.state = ScanState::default();
    }

    /// Name of the partitioning used for scanning
    pub fn partitioning(&self) -> &str {
        self.classifier.partitioning()
    }

    pub fn is_default_partition(&self, kind: &str) -> bool {
        kind == DEFAULT_CONTENT_TYPE
    }

    /// Most recently read position
    ///
    /// After an exhausted scan this is the bound the scan stopped at, which
    /// is `-1` for an unbounded backward scan.
    pub fn position(&self) -> isize {
        self.state.position
    }

    /// Most recently read character
    pub fn current_char(&self) -> char {
        self.state.current_char
    }

    /// The configured document
    ///
    /// # Panics
    /// If the scanner has not been configured.
    pub fn document(&self) -> &'a dyn Document {
        self.configuration().document
    }

    /// The configured partition filter
    ///
    /// # Panics
    /// If the scanner has not been configured.
    pub fn filter(&self) -> &PartitionFilter {
        &self.configuration().filter
    }

    fn configuration(&self) -> &Configuration<'a> {
        match &self.config {
            Some(config) => config,
            None => panic!("HeuristicScanner used before configure()"),
        }
    }

    /// Split the scanner into its read-only context and the scan state
    fn session(&mut self) -> (ScanContext<'_>, &mut ScanState) {
        let Some(config) = self.config.as_ref() else {
            panic!("HeuristicScanner used before configure()");
        };
        let ctx = ScanContext::new(config.document, self.classifier, &config.filter);
        (ctx, &mut self.state)
    }

    /// Lowest position in `[start, bound)` where `condition` stops
    pub fn scan_forward_with<C: StopCondition + ?Sized>(
        &mut self,
        start: usize,
        bound: Bound,
        condition: &mut C,
    ) -> Option<usize> {
        let (ctx, state) = self.session();
        linear::scan_forward(&ctx, state, start, bound, condition)
    }

    /// Highest position in `(bound, start]` where `condition` stops
    pub fn scan_backward_with<C: StopCondition + ?Sized>(
        &mut self,
        start: usize,
        bound: Bound,
        condition: &mut C,
    ) -> Option<usize> {
        let (ctx, state) = self.session();
        let start = isize::try_from(start).unwrap_or(isize::MAX);
        linear::scan_backward(&ctx, state, start, bound, condition)
    }

    /// Lowest position of `ch` in `[position, bound)` inside an accepted partition
    pub fn scan_forward(&mut self, position: usize, bound: Bound, ch: char) -> Option<usize> {
        self.scan_forward_with(position, bound, &mut PartitionGated::new(CharSet::single(ch)))
    }

    /// Lowest position of any of `chars` in `[position, bound)` inside an
    /// accepted partition
    pub fn scan_forward_any(&mut self, position: usize, bound: Bound, chars: &[char]) -> Option<usize> {
        self.scan_forward_with(position, bound, &mut PartitionGated::new(CharSet::new(chars)))
    }

    /// Highest position of `ch` in `(bound, position]` inside an accepted partition
    pub fn scan_backward(&mut self, position: usize, bound: Bound, ch: char) -> Option<usize> {
        self.scan_backward_with(position, bound, &mut PartitionGated::new(CharSet::single(ch)))
    }

    /// Highest position of any of `chars` in `(bound, position]` inside an
    /// accepted partition
    pub fn scan_backward_any(&mut self, position: usize, bound: Bound, chars: &[char]) -> Option<usize> {
        self.scan_backward_with(position, bound, &mut PartitionGated::new(CharSet::new(chars)))
    }

    /// Number of `ch` in `[start, stop)` inside accepted partitions
    pub fn count(&mut self, start: usize, stop: usize, ch: char) -> usize {
        let mut condition = PartitionGated::new(CharSet::single(ch));
        let (ctx, state) = self.session();
        let stop = stop.min(ctx.document.len());

        let mut count = 0;
        let mut next = start;
        while next < stop {
            match linear::scan_forward(&ctx, state, next, Bound::At(stop), &mut condition) {
                Some(found) => {
                    count += 1;
                    next = found + 1;
                }
                None => break,
            }
        }
        count
    }
}

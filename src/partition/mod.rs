//! Document partitioning
//!
//! A partition is a maximal contiguous span of one classification (code,
//! comment, string, ...). The scanner never computes partitions itself; it
//! asks a [`PartitionClassifier`]. This module defines that seam and ships
//! two classifiers plus a rule engine built from per-language definitions:
//! - [`WholeDocument`]: everything is default content
//! - [`PartitionMap`]: a precomputed, binary-searched snapshot
//! - [`RulePartitioner`]: walks regex block/line rules line by line to
//!   build a [`PartitionMap`]

mod rules;
mod language;
mod map;
mod registry;
pub mod builtin;

use std::sync::Arc;

use crate::document::{Document, Region};
use crate::error::{Result, ScanError};

pub use rules::{BlockRule, LineRule, LineState};
pub use language::{LanguageDefinition, LinePartitions, PartitionSpan};
pub use map::{PartitionMap, RulePartitioner};
pub use registry::LanguageRegistry;

/// Content type of everything no rule claims
pub const DEFAULT_CONTENT_TYPE: &str = "__dftl_partition_content_type";

/// Content type of the placeholder used when classification fails
pub const NO_PARTITION: &str = "__no_partition_at_all";

/// A typed, contiguous span of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub kind: Arc<str>,
    pub offset: usize,
    pub length: usize,
}

impl Partition {
    pub fn new(kind: impl Into<Arc<str>>, offset: usize, length: usize) -> Self {
        Self {
            kind: kind.into(),
            offset,
            length,
        }
    }

    /// Zero-length placeholder at `offset`
    pub fn sentinel(offset: usize) -> Self {
        Self::new(NO_PARTITION, offset, 0)
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn region(&self) -> Region {
        Region::new(self.offset, self.length)
    }
}

/// Selects the partitions a scan may stop in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartitionFilter {
    /// Every partition matches
    #[default]
    Any,
    /// Only partitions of exactly this type match
    Single(Arc<str>),
}

impl PartitionFilter {
    pub fn single(kind: impl Into<Arc<str>>) -> Self {
        PartitionFilter::Single(kind.into())
    }

    /// Filter matching only default content
    pub fn default_content() -> Self {
        Self::single(DEFAULT_CONTENT_TYPE)
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            PartitionFilter::Any => true,
            PartitionFilter::Single(wanted) => wanted.as_ref() == kind,
        }
    }
}

impl From<Option<&str>> for PartitionFilter {
    fn from(kind: Option<&str>) -> Self {
        kind.map_or(PartitionFilter::Any, PartitionFilter::single)
    }
}

/// Classifies offsets of a document into partitions
pub trait PartitionClassifier {
    /// Name of the partitioning this classifier implements
    fn partitioning(&self) -> &str;

    /// Partition covering `offset`
    ///
    /// `offset == document.len()` must be accepted and yields the last
    /// partition (or an empty default partition for an empty document).
    fn partition_at(&self, document: &dyn Document, offset: usize) -> Result<Partition>;

    /// Type of the partition covering `offset`
    fn content_type_at(&self, document: &dyn Document, offset: usize) -> Result<Arc<str>> {
        self.partition_at(document, offset).map(|p| p.kind)
    }
}

/// Classifier treating the whole document as default content
#[derive(Debug, Clone)]
pub struct WholeDocument {
    kind: Arc<str>,
}

impl WholeDocument {
    pub fn new() -> Self {
        Self {
            kind: Arc::from(DEFAULT_CONTENT_TYPE),
        }
    }
}

impl Default for WholeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionClassifier for WholeDocument {
    fn partitioning(&self) -> &str {
        "__whole_document"
    }

    fn partition_at(&self, document: &dyn Document, offset: usize) -> Result<Partition> {
        let length = document.len();
        if offset > length {
            return Err(ScanError::BadLocation { offset, length });
        }
        Ok(Partition {
            kind: Arc::clone(&self.kind),
            offset: 0,
            length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    #[test]
    fn test_filter_matches() {
        assert!(PartitionFilter::Any.matches("anything"));
        assert!(PartitionFilter::Any.matches(NO_PARTITION));

        let filter = PartitionFilter::default_content();
        assert!(filter.matches(DEFAULT_CONTENT_TYPE));
        assert!(!filter.matches("__r_string"));
        assert!(!filter.matches(NO_PARTITION));
    }

    #[test]
    fn test_filter_from_option() {
        assert_eq!(PartitionFilter::from(None), PartitionFilter::Any);
        assert_eq!(
            PartitionFilter::from(Some("__r_comment")),
            PartitionFilter::single("__r_comment")
        );
    }

    #[test]
    fn test_whole_document() {
        let buffer = TextBuffer::from("abc");
        let classifier = WholeDocument::new();
        let partition = classifier.partition_at(&buffer, 3).unwrap();
        assert_eq!(partition.region(), Region::new(0, 3));
        assert_eq!(&*partition.kind, DEFAULT_CONTENT_TYPE);
        assert!(classifier.partition_at(&buffer, 4).is_err());
    }

    #[test]
    fn test_sentinel_partition() {
        let partition = Partition::sentinel(7);
        assert_eq!(partition.offset, 7);
        assert_eq!(partition.end(), 7);
        assert_eq!(&*partition.kind, NO_PARTITION);
    }
}

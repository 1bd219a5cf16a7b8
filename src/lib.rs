//! heurscan - heuristic, partition-aware token scanning
//!
//! Point queries over a text buffer without a parser: matching brackets,
//! blank runs, words, line blocks. A pluggable [`PartitionClassifier`]
//! splits the text into typed partitions (code, comment, string, ...) and
//! scans only stop inside the partitions they are configured for.
//!
//! ```
//! use heurscan::{HeuristicScanner, PartitionFilter, PeerPair, TextBuffer, WholeDocument};
//!
//! let buffer = TextBuffer::from("foo(bar(1,2),baz)");
//! let classifier = WholeDocument::new();
//! let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);
//! assert_eq!(scanner.find_closing_peer(3, PeerPair::PARENTHESES), Some(16));
//! ```

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod line;
pub mod partition;
pub mod scanner;

pub use buffer::TextBuffer;
pub use config::Config;
pub use document::{Document, Region};
pub use error::{Result, ScanError};
pub use partition::{
    LanguageRegistry, Partition, PartitionClassifier, PartitionFilter, PartitionMap, RulePartitioner,
    WholeDocument, DEFAULT_CONTENT_TYPE, NO_PARTITION,
};
pub use scanner::{Bound, HeuristicScanner, PeerPair, NOT_FOUND, UNBOUND};

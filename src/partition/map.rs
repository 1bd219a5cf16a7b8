//! Partition maps and the rule-based partitioner

use std::sync::Arc;

use log::trace;

use super::language::LanguageDefinition;
use super::rules::LineState;
use super::{Partition, PartitionClassifier, DEFAULT_CONTENT_TYPE};
use crate::document::Document;
use crate::error::{Result, ScanError};

/// Precomputed partitioning of one document snapshot
///
/// Partitions are sorted, contiguous and cover the whole document; adjacent
/// spans of the same type are merged.
#[derive(Debug, Clone)]
pub struct PartitionMap {
    partitioning: String,
    partitions: Vec<Partition>,
    length: usize,
}

impl PartitionMap {
    /// Build a map of `length` characters from sorted, non-overlapping typed
    /// spans; uncovered ranges become default content.
    pub fn from_spans(
        partitioning: impl Into<String>,
        length: usize,
        spans: impl IntoIterator<Item = Partition>,
    ) -> Self {
        let default_kind: Arc<str> = Arc::from(DEFAULT_CONTENT_TYPE);
        let mut partitions: Vec<Partition> = Vec::new();
        let mut cursor = 0;

        for span in spans {
            if span.length == 0 || span.offset < cursor {
                continue;
            }
            if span.offset > cursor {
                push_merged(
                    &mut partitions,
                    Partition::new(Arc::clone(&default_kind), cursor, span.offset - cursor),
                );
            }
            cursor = span.end();
            push_merged(&mut partitions, span);
        }
        if cursor < length {
            push_merged(&mut partitions, Partition::new(default_kind, cursor, length - cursor));
        }

        Self {
            partitioning: partitioning.into(),
            partitions,
            length,
        }
    }

    /// All partitions in document order
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Length of the document snapshot this map describes
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Partitions of one type, in document order
    pub fn of_type<'m>(&'m self, kind: &'m str) -> impl Iterator<Item = &'m Partition> + 'm {
        self.partitions.iter().filter(move |p| &*p.kind == kind)
    }
}

fn push_merged(partitions: &mut Vec<Partition>, partition: Partition) {
    if let Some(last) = partitions.last_mut() {
        if last.kind == partition.kind && last.end() == partition.offset {
            last.length += partition.length;
            return;
        }
    }
    partitions.push(partition);
}

impl PartitionClassifier for PartitionMap {
    fn partitioning(&self) -> &str {
        &self.partitioning
    }

    fn partition_at(&self, document: &dyn Document, offset: usize) -> Result<Partition> {
        if document.len() != self.length {
            return Err(ScanError::Message(format!(
                "Partition map covers {} characters, document has {}",
                self.length,
                document.len()
            )));
        }
        if offset > self.length {
            return Err(ScanError::BadLocation {
                offset,
                length: self.length,
            });
        }
        let Some(last) = self.partitions.last() else {
            return Ok(Partition::new(DEFAULT_CONTENT_TYPE, 0, 0));
        };
        if offset == self.length {
            return Ok(last.clone());
        }
        let idx = self.partitions.partition_point(|p| p.end() <= offset);
        Ok(self.partitions[idx].clone())
    }
}

/// Partitions documents by the rules of a language definition
///
/// The partitioner is not a classifier itself: [`RulePartitioner::partition`]
/// builds a [`PartitionMap`] once per document snapshot, and the map answers
/// the scanner's queries.
#[derive(Debug, Clone, Copy)]
pub struct RulePartitioner<'l> {
    language: &'l LanguageDefinition,
}

impl<'l> RulePartitioner<'l> {
    pub fn new(language: &'l LanguageDefinition) -> Self {
        Self { language }
    }

    pub fn language(&self) -> &'l LanguageDefinition {
        self.language
    }

    /// Name of the partitioning the produced maps implement
    pub fn partitioning(&self) -> &'l str {
        &self.language.name
    }

    /// Partition the whole document
    pub fn partition(&self, document: &dyn Document) -> Result<PartitionMap> {
        let mut spans = Vec::new();
        let mut state = LineState::default();

        for line in 0..document.line_count() {
            let info = document.line_information(line)?;
            let text = (info.offset..info.end())
                .map(|i| document.char_at(i))
                .collect::<Result<String>>()?;
            let result = self.language.partition_line(&text, state);

            // Byte offsets of the line text -> character offsets
            let starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
            let to_char = |byte: usize| match starts.binary_search(&byte) {
                Ok(i) | Err(i) => i,
            };
            for span in result.spans {
                let start = to_char(span.start);
                let end = to_char(span.end);
                spans.push(Partition::new(span.kind, info.offset + start, end - start));
            }

            // An open construct swallows the line delimiter too
            if let Some(kind) = self.language.partition_of_state(result.end_state) {
                let delimiter = document.line_length(line)? - info.length;
                spans.push(Partition::new(kind, info.end(), delimiter));
            }
            state = result.end_state;
        }

        trace!(
            "partitioned {} lines as {} into {} typed spans",
            document.line_count(),
            self.language.name,
            spans.len()
        );
        Ok(PartitionMap::from_spans(self.partitioning(), document.len(), spans))
    }
}

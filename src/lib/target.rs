//! The unit of work flowing from the reader to the correction workers.

use dagcorrect_graph::Alignment;

/// A template sequence together with every alignment selected for it.
///
/// A group with no alignments is a sentinel: it carries no work and tells the worker that pops
/// it to shut down. The reader never forwards a real group without alignments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetGroup {
    /// Target (template) identifier.
    pub name: String,
    /// Template bases.
    pub template: Vec<u8>,
    /// Alignments of reads against the template.
    pub alignments: Vec<Alignment>,
}

impl TargetGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, template: impl Into<Vec<u8>>, alignments: Vec<Alignment>) -> Self {
        Self { name: name.into(), template: template.into(), alignments }
    }

    /// The end-of-stream marker sent once to each worker.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.alignments.is_empty()
    }

    /// Number of alignments in the group.
    #[must_use]
    pub fn coverage(&self) -> usize {
        self.alignments.len()
    }
}

//! Sources of template/alignment groups.
//!
//! An [`AlignmentProvider`] yields one [`TargetGroup`] per template, in input order, until it is
//! exhausted. Providers apply [`ProviderOptions`] themselves, so the groups they hand to the
//! reader are already filtered, sorted and truncated.
//!
//! - [`M5AlignmentProvider`] parses M5 alignment lines and looks templates up in a FASTA file
//! - [`InMemoryProvider`] replays a prepared list of groups

use std::collections::{HashSet, VecDeque};
use std::io;

use dagcorrect_graph::Alignment;

use crate::target::TargetGroup;

pub mod fasta;
pub mod m5;

pub use fasta::load_templates;
pub use m5::M5AlignmentProvider;

/// Default maximum number of alignments kept per target.
pub const DEFAULT_MAX_HITS: usize = 85;

/// A pull-based source of target groups.
pub trait AlignmentProvider: Send {
    /// Returns the next target group, or `None` once the input is exhausted.
    ///
    /// A returned group may have no alignments left after filtering; callers decide what to do
    /// with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read or is malformed. Malformed input
    /// is reported with [`io::ErrorKind::InvalidData`].
    fn next_target(&mut self) -> io::Result<Option<TargetGroup>>;
}

impl<P: AlignmentProvider + ?Sized> AlignmentProvider for Box<P> {
    fn next_target(&mut self) -> io::Result<Option<TargetGroup>> {
        (**self).next_target()
    }
}

/// Selection rules applied to each target's alignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Maximum alignments kept per target.
    pub max_hits: usize,
    /// Sort alignments by template span, longest first, before truncating.
    pub sort_by_coverage: bool,
    /// Keep only alignments that run off an end of both sequences.
    pub proper_overlaps_only: bool,
    /// Targets to correct; empty means all.
    pub targets: HashSet<String>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_hits: DEFAULT_MAX_HITS,
            sort_by_coverage: false,
            proper_overlaps_only: false,
            targets: HashSet::new(),
        }
    }
}

impl ProviderOptions {
    /// Returns true if `name` passes the target filter.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.targets.is_empty() || self.targets.contains(name)
    }

    /// Filters, orders and truncates one target's alignments.
    #[must_use]
    pub fn select(&self, mut alignments: Vec<Alignment>) -> Vec<Alignment> {
        if self.proper_overlaps_only {
            alignments.retain(Alignment::is_proper_overlap);
        }
        if self.sort_by_coverage {
            alignments.sort_by(|a, b| b.template_span().cmp(&a.template_span()));
        }
        alignments.truncate(self.max_hits);
        alignments
    }
}

/// Replays a fixed sequence of groups and errors.
///
/// Options are not applied; the groups are yielded exactly as given.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    items: VecDeque<io::Result<TargetGroup>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new(groups: impl IntoIterator<Item = TargetGroup>) -> Self {
        Self { items: groups.into_iter().map(Ok).collect() }
    }

    /// Creates a provider that yields each result in turn, errors included.
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = io::Result<TargetGroup>>) -> Self {
        Self { items: results.into_iter().collect() }
    }
}

impl AlignmentProvider for InMemoryProvider {
    fn next_target(&mut self) -> io::Result<Option<TargetGroup>> {
        self.items.pop_front().transpose()
    }
}

//! Metrics collected during correction.
//!
//! Every worker keeps its own [`CorrectionMetrics`] and hands it back when it terminates; the
//! pipeline merges them into one run-level value that is logged and optionally written to a TSV
//! file with [`writer::write_metrics`].

use serde::{Deserialize, Serialize};

pub mod writer;

pub use writer::write_metrics;

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track processing counts.
pub trait ProcessingMetrics {
    /// Total number of input items processed.
    fn total_input(&self) -> u64;

    /// Total number of output items produced.
    fn total_output(&self) -> u64;

    /// Total number of input items filtered out.
    fn total_filtered(&self) -> u64;
}

/// Counters describing what the correction workers did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionMetrics {
    /// Target groups popped by workers, sentinels excluded.
    pub targets_processed: u64,
    /// Targets discarded for having fewer alignments than the minimum coverage.
    pub targets_below_coverage: u64,
    /// Targets that produced at least one consensus record.
    pub targets_corrected: u64,
    /// Alignments examined in targets that met the coverage threshold.
    pub alignments_considered: u64,
    /// Alignments dropped for an aligned query shorter than the minimum length.
    pub alignments_too_short: u64,
    /// Alignments with nothing left after trimming.
    pub alignments_trimmed_away: u64,
    /// Alignments added to an alignment graph.
    pub alignments_used: u64,
    /// Consensus records emitted.
    pub consensus_records: u64,
    /// Total bases across emitted consensus records.
    pub consensus_bases: u64,
}

impl CorrectionMetrics {
    /// Adds another worker's counts into this one.
    pub fn merge(&mut self, other: &Self) {
        self.targets_processed += other.targets_processed;
        self.targets_below_coverage += other.targets_below_coverage;
        self.targets_corrected += other.targets_corrected;
        self.alignments_considered += other.alignments_considered;
        self.alignments_too_short += other.alignments_too_short;
        self.alignments_trimmed_away += other.alignments_trimmed_away;
        self.alignments_used += other.alignments_used;
        self.consensus_records += other.consensus_records;
        self.consensus_bases += other.consensus_bases;
    }
}

impl Metric for CorrectionMetrics {
    fn metric_name() -> &'static str {
        "correction"
    }
}

impl ProcessingMetrics for CorrectionMetrics {
    fn total_input(&self) -> u64 {
        self.targets_processed
    }

    fn total_output(&self) -> u64 {
        self.targets_corrected
    }

    fn total_filtered(&self) -> u64 {
        self.targets_processed - self.targets_corrected
    }
}

//! Immutable configuration shared by every pipeline stage.

use crate::errors::Result;
use crate::validation::validate_at_least;

/// Default number of correction workers.
pub const DEFAULT_THREADS: usize = 4;
/// Default minimum coverage, used both as the per-target alignment count and window support.
pub const DEFAULT_MIN_COVERAGE: u32 = 6;
/// Default minimum aligned and consensus length.
pub const DEFAULT_MIN_LEN: usize = 500;
/// Default number of template bases trimmed from each alignment end.
pub const DEFAULT_TRIM: usize = 10;
/// Capacity of the queue between the reader and the workers.
pub const INPUT_QUEUE_CAPACITY: usize = 20;
/// Capacity of the queue between the workers and the writer.
pub const OUTPUT_QUEUE_CAPACITY: usize = 10;

/// Parameters of a correction run.
///
/// Built once at startup and handed by reference to every stage; nothing mutates it after
/// [`CorrectionConfig::validate`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionConfig {
    /// Number of correction workers.
    pub threads: usize,
    /// Minimum alignments per target, and minimum node support inside a consensus window.
    pub min_coverage: u32,
    /// Minimum aligned query length of an alignment and minimum consensus length.
    pub min_len: usize,
    /// Template bases removed from each end of every alignment.
    pub trim: usize,
    pub input_capacity: usize,
    pub output_capacity: usize,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            min_coverage: DEFAULT_MIN_COVERAGE,
            min_len: DEFAULT_MIN_LEN,
            trim: DEFAULT_TRIM,
            input_capacity: INPUT_QUEUE_CAPACITY,
            output_capacity: OUTPUT_QUEUE_CAPACITY,
        }
    }
}

impl CorrectionConfig {
    /// Checks that the configuration describes a runnable pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`](crate::errors::CorrectionError::InvalidParameter) if the
    /// worker count or either queue capacity is zero.
    pub fn validate(&self) -> Result<()> {
        validate_at_least(self.threads, 1, "threads")?;
        validate_at_least(self.input_capacity, 1, "input-capacity")?;
        validate_at_least(self.output_capacity, 1, "output-capacity")
    }
}

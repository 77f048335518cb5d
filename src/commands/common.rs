//! Option groups shared by the command line.
//!
//! Each group is a clap [`Args`] struct flattened into the command, with a `validate` method
//! for checks clap cannot express.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use dagcorrect_lib::config::{
    CorrectionConfig, DEFAULT_MIN_COVERAGE, DEFAULT_MIN_LEN, DEFAULT_THREADS, DEFAULT_TRIM,
};
use dagcorrect_lib::provider::{DEFAULT_MAX_HITS, ProviderOptions};
use dagcorrect_lib::validation::validate_files_exist;

/// Input alignment and sequence files.
#[derive(Debug, Clone, Args)]
pub struct InputOptions {
    /// M5 alignment file, grouped by target
    #[arg(short = 'a', long = "align-file")]
    pub align_file: PathBuf,

    /// FASTA file holding the target sequences
    #[arg(short = 's', long = "seq-file")]
    pub seq_file: PathBuf,
}

impl InputOptions {
    /// Validates that both input files exist.
    ///
    /// # Errors
    ///
    /// Returns an error if either file does not exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_files_exist(&[
            (&self.align_file, "Alignment file"),
            (&self.seq_file, "Sequence file"),
        ])?;
        Ok(())
    }
}

/// Which alignments are considered for each target.
#[derive(Debug, Clone, Args)]
pub struct HitSelectionOptions {
    /// Maximum number of alignments used per target
    #[arg(short = 'm', long = "max-hit", default_value_t = DEFAULT_MAX_HITS)]
    pub max_hit: usize,

    /// Sort alignments by target coverage, longest first, before applying --max-hit
    #[arg(short = 'x', long = "coverage-sort", default_value_t = false)]
    pub coverage_sort: bool,

    /// Only use alignments that overlap the ends of both the read and the target
    #[arg(short = 'o', long = "only-proper-overlaps", default_value_t = false)]
    pub only_proper_overlaps: bool,

    /// Targets to correct; all targets are corrected when none are given
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}

impl HitSelectionOptions {
    #[must_use]
    pub fn to_provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            max_hits: self.max_hit,
            sort_by_coverage: self.coverage_sort,
            proper_overlaps_only: self.only_proper_overlaps,
            targets: self.targets.iter().cloned().collect::<HashSet<_>>(),
        }
    }
}

/// Thresholds controlling alignment filtering and consensus calling.
#[derive(Debug, Clone, Args)]
pub struct ConsensusOptions {
    /// Minimum alignments per target, and minimum support for a consensus base
    #[arg(short = 'c', long = "min-coverage", default_value_t = DEFAULT_MIN_COVERAGE)]
    pub min_coverage: u32,

    /// Minimum aligned length of an alignment and minimum length of a consensus sequence
    #[arg(short = 'l', long = "min-len", default_value_t = DEFAULT_MIN_LEN)]
    pub min_len: usize,

    /// Number of target bases trimmed from each end of every alignment
    #[arg(short = 't', long = "trim", default_value_t = DEFAULT_TRIM)]
    pub trim: usize,
}

/// Worker thread count.
#[derive(Debug, Clone, Args)]
pub struct ThreadingOptions {
    /// Number of correction worker threads
    #[arg(short = 'j', long = "threads", default_value_t = DEFAULT_THREADS)]
    pub threads: usize,
}

impl ThreadingOptions {
    /// # Errors
    ///
    /// Returns an error if fewer than one worker is requested.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads < 1 {
            anyhow::bail!("threads must be >= 1, got {}", self.threads);
        }
        Ok(())
    }
}

/// Optional metrics output.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Write correction metrics to this TSV file
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,
}

/// Builds the pipeline configuration from the parsed option groups.
#[must_use]
pub fn correction_config(consensus: &ConsensusOptions, threading: &ThreadingOptions) -> CorrectionConfig {
    CorrectionConfig {
        threads: threading.threads,
        min_coverage: consensus.min_coverage,
        min_len: consensus.min_len,
        trim: consensus.trim,
        ..CorrectionConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        hits: HitSelectionOptions,
        #[command(flatten)]
        consensus: ConsensusOptions,
        #[command(flatten)]
        threading: ThreadingOptions,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.hits.max_hit, 85);
        assert!(!args.hits.coverage_sort);
        assert!(!args.hits.only_proper_overlaps);
        assert!(args.hits.targets.is_empty());
        assert_eq!(args.consensus.min_coverage, 6);
        assert_eq!(args.consensus.min_len, 500);
        assert_eq!(args.consensus.trim, 10);
        assert_eq!(args.threading.threads, 4);
    }

    #[test]
    fn test_short_flags_and_targets() {
        let args = TestArgs::try_parse_from([
            "test", "-m", "10", "-x", "-o", "-c", "3", "-l", "100", "-t", "0", "-j", "2", "t1", "t2",
        ])
        .unwrap();
        let options = args.hits.to_provider_options();
        assert_eq!(options.max_hits, 10);
        assert!(options.sort_by_coverage);
        assert!(options.proper_overlaps_only);
        assert!(options.targets.contains("t1") && options.targets.contains("t2"));

        let config = correction_config(&args.consensus, &args.threading);
        assert_eq!(config.threads, 2);
        assert_eq!(config.min_coverage, 3);
        assert_eq!(config.min_len, 100);
        assert_eq!(config.trim, 0);
        assert_eq!(config.input_capacity, 20);
        assert_eq!(config.output_capacity, 10);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(16, true)]
    fn test_threading_validate(#[case] threads: usize, #[case] ok: bool) {
        assert_eq!(ThreadingOptions { threads }.validate().is_ok(), ok);
    }

    #[test]
    fn test_input_validate() {
        let file = NamedTempFile::new().unwrap();
        let options = InputOptions {
            align_file: file.path().to_path_buf(),
            seq_file: PathBuf::from("/nonexistent/reads.fa"),
        };
        let msg = options.validate().unwrap_err().to_string();
        assert!(msg.contains("Sequence file"));
    }
}

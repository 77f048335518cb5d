//! Corrects long reads from their alignments to one another.
//!
//! Reads a grouped M5 alignment file and a FASTA file of target sequences, runs the correction
//! pipeline and writes consensus records to stdout:
//!
//! ```text
//! >{readId}/{counter}/{start}_{end}
//! {sequence}
//! ```
//!
//! `readId` is the first alignment used for the target, `counter` numbers the records written by
//! one worker thread, and `start`/`end` give the half-open target range the consensus covers.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info};

use dagcorrect_lib::logging::{OperationTimer, log_correction_summary};
use dagcorrect_lib::metrics::writer::write_metrics_auto;
use dagcorrect_lib::pipeline::run_correction;
use dagcorrect_lib::provider::M5AlignmentProvider;

use crate::commands::command::Command;
use crate::commands::common::{
    ConsensusOptions, HitSelectionOptions, InputOptions, MetricsOptions, ThreadingOptions,
    correction_config,
};

/// Consensus correction of long reads.
#[derive(Debug, Args)]
pub struct Correct {
    #[command(flatten)]
    pub input: InputOptions,

    #[command(flatten)]
    pub consensus: ConsensusOptions,

    #[command(flatten)]
    pub hits: HitSelectionOptions,

    #[command(flatten)]
    pub threading: ThreadingOptions,

    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Correct {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.input.validate()?;
        self.threading.validate()?;
        let config = correction_config(&self.consensus, &self.threading);
        config.validate()?;
        debug!("Command line: {command_line}");

        let provider = M5AlignmentProvider::from_paths(
            &self.input.align_file,
            &self.input.seq_file,
            self.hits.to_provider_options(),
        )
        .with_context(|| {
            format!(
                "Failed to open inputs {} and {}",
                self.input.align_file.display(),
                self.input.seq_file.display()
            )
        })?;

        let timer = OperationTimer::new("Correcting reads");
        let sink = BufWriter::new(io::stdout());
        let summary = run_correction(&config, provider, sink).context("Correction failed")?;
        timer.log_completion(summary.reader.targets_forwarded);

        info!(
            "Read {} targets ({} without usable alignments), wrote {} records",
            summary.reader.targets_forwarded,
            summary.reader.targets_dropped_empty,
            summary.writer.records_written
        );
        log_correction_summary(&summary.metrics);

        if let Some(path) = &self.metrics.metrics {
            write_metrics_auto(path, std::slice::from_ref(&summary.metrics))?;
            info!("Wrote correction metrics to {}", path.display());
        }
        Ok(())
    }
}

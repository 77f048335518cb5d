#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # dagcorrect - long-read consensus correction
//!
//! This library corrects noisy long reads by overlaying, for each read used as a template, the
//! alignments of other reads onto an alignment graph and calling consensus along its best path.
//!
//! ## Overview
//!
//! ### Pipeline
//!
//! - **[`pipeline`]** - reader, correction workers and writer connected by bounded queues
//! - **[`queue`]** - the blocking bounded FIFO shared between stages
//! - **[`provider`]** - sources of template/alignment groups (M5 + FASTA, in-memory)
//! - **[`target`]** - the [`TargetGroup`](target::TargetGroup) unit of work
//!
//! The alignment graph itself lives in the `dagcorrect_graph` crate.
//!
//! ### Utilities
//!
//! - **[`config`]** - immutable run configuration
//! - **[`errors`]** - structured error type
//! - **[`metrics`]** - correction counters and TSV output
//! - **[`logging`]** - summary and formatting helpers
//! - **[`progress`]** - interval progress logging
//! - **[`validation`]** - parameter and path checks
//!
//! ## Quick Start
//!
//! ```no_run
//! use dagcorrect_lib::config::CorrectionConfig;
//! use dagcorrect_lib::pipeline::run_correction;
//! use dagcorrect_lib::provider::{M5AlignmentProvider, ProviderOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let provider = M5AlignmentProvider::from_paths("hits.m5", "reads.fa", ProviderOptions::default())?;
//! let summary = run_correction(&CorrectionConfig::default(), provider, std::io::stdout())?;
//! println!("wrote {} records", summary.writer.records_written);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dna;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod queue;
pub mod target;
pub mod validation;

pub use dagcorrect_graph as graph;

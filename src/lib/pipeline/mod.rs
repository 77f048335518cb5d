//! The staged correction pipeline.
//!
//! ```text
//! provider -> reader -> [input queue] -> worker x N -> [output queue] -> writer -> sink
//! ```
//!
//! Stages run on their own OS threads and talk only through two [`BoundedQueue`]s. Shutdown
//! is a sentinel handshake:
//!
//! 1. when the provider is exhausted the reader pushes one sentinel [`TargetGroup`] per worker
//! 2. each worker that pops a sentinel pushes one sentinel [`OutputRecord`] and exits
//! 3. the writer exits after it has seen one sentinel record per worker
//!
//! Every worker therefore terminates exactly once and the writer never misses a record, with no
//! shared flags or counters beyond the queues themselves. A worker that panics still pushes its
//! sentinel record while unwinding, so the writer terminates and the panic is reported once all
//! stages are joined.
//!
//! A provider error aborts the process from the reader thread with exit status 1; no sentinels
//! are posted and buffered output is not flushed.

use std::io::{self, Write};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::config::CorrectionConfig;
use crate::errors::{CorrectionError, Result};
use crate::metrics::CorrectionMetrics;
use crate::provider::AlignmentProvider;
use crate::queue::BoundedQueue;
use crate::target::TargetGroup;

pub mod reader;
pub mod worker;
pub mod writer;

pub use reader::{ReaderSummary, run_reader};
pub use worker::{ConsensusSegment, correct_target, run_worker};
pub use writer::{WriterSummary, run_writer};

/// A formatted consensus record, or the empty end-of-stream sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputRecord(String);

impl OutputRecord {
    /// Formats a consensus segment as a two-line FASTA record:
    /// `>{source_id}/{counter}/{start}_{end}` followed by the sequence.
    #[must_use]
    pub fn consensus(segment: &ConsensusSegment, counter: u64) -> Self {
        Self(format!(
            ">{}/{}/{}_{}\n{}\n",
            segment.source_id,
            counter,
            segment.range_start,
            segment.range_end,
            String::from_utf8_lossy(&segment.sequence)
        ))
    }

    #[must_use]
    pub fn sentinel() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the pipeline reports once all stages have been joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub reader: ReaderSummary,
    pub writer: WriterSummary,
    /// Worker metrics merged across all workers.
    pub metrics: CorrectionMetrics,
}

fn spawn_stage<T, F>(name: String, f: F) -> Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new().name(name.clone()).spawn(f).map_err(|e| CorrectionError::StageFailed {
        stage: name,
        reason: format!("could not spawn thread: {e}"),
    })
}

fn join_stage<T>(name: &str, handle: JoinHandle<T>) -> Result<T> {
    handle.join().map_err(|_| CorrectionError::StageFailed {
        stage: name.to_string(),
        reason: "thread panicked".to_string(),
    })
}

/// Joins the writer, then every worker, then the reader.
///
/// All handles are joined even when one stage has failed; the first failure is returned
/// afterwards, writer before workers before reader.
fn join_stages(
    writer: JoinHandle<io::Result<WriterSummary>>,
    workers: Vec<JoinHandle<CorrectionMetrics>>,
    reader: JoinHandle<ReaderSummary>,
) -> Result<(ReaderSummary, WriterSummary, CorrectionMetrics)> {
    let writer_result = join_stage("writer", writer);
    let mut metrics = CorrectionMetrics::default();
    let mut worker_failure = None;
    for (worker_id, handle) in workers.into_iter().enumerate() {
        match join_stage(&format!("worker-{worker_id}"), handle) {
            Ok(worker_metrics) => metrics.merge(&worker_metrics),
            Err(e) => {
                error!("Correction worker {worker_id} failed: {e}");
                worker_failure.get_or_insert(e);
            }
        }
    }
    let reader_result = join_stage("reader", reader);
    debug!("All pipeline stages joined");

    let writer_summary = writer_result?.map_err(|e| CorrectionError::StageFailed {
        stage: "writer".to_string(),
        reason: e.to_string(),
    })?;
    if let Some(e) = worker_failure {
        return Err(e);
    }
    Ok((reader_result?, writer_summary, metrics))
}

/// Runs the full pipeline: one reader, `config.threads` workers and one writer.
///
/// Stages are started writer first and joined in the order writer, workers, reader.
///
/// If the provider fails, the reader thread logs the error and exits the process with status 1.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a stage thread cannot be spawned or
/// panics, or the sink cannot be written.
pub fn run_correction<P, W>(config: &CorrectionConfig, provider: P, sink: W) -> Result<PipelineSummary>
where
    P: AlignmentProvider + 'static,
    W: Write + Send + 'static,
{
    config.validate()?;
    let threads = config.threads;
    let input: BoundedQueue<TargetGroup> = BoundedQueue::new(config.input_capacity);
    let output: BoundedQueue<OutputRecord> = BoundedQueue::new(config.output_capacity);
    info!(
        "Starting correction with {threads} workers (min coverage {}, min length {}, trim {})",
        config.min_coverage, config.min_len, config.trim
    );

    let writer = {
        let output = output.clone();
        spawn_stage("writer".to_string(), move || run_writer(sink, &output, threads))?
    };

    let mut workers = Vec::with_capacity(threads);
    for worker_id in 0..threads {
        let input = input.clone();
        let output = output.clone();
        let config = config.clone();
        workers.push(spawn_stage(format!("worker-{worker_id}"), move || {
            run_worker(worker_id, &config, &input, &output)
        })?);
    }

    let reader = {
        let input = input.clone();
        let mut provider = provider;
        spawn_stage("reader".to_string(), move || match run_reader(&mut provider, &input, threads) {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to read alignments: {e}");
                std::process::exit(1);
            }
        })?
    };

    let (reader_summary, writer_summary, metrics) = join_stages(writer, workers, reader)?;

    Ok(PipelineSummary { reader: reader_summary, writer: writer_summary, metrics })
}

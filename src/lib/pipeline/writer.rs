//! The single consumer draining consensus records to the sink.

use std::io::{self, Write};

use log::{debug, error};

use super::OutputRecord;
use crate::progress::ProgressTracker;
use crate::queue::BoundedQueue;

/// Counts reported by [`run_writer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterSummary {
    pub records_written: u64,
    pub sentinels_observed: usize,
}

/// Writes records from `output` to `sink` until one sentinel per worker has been seen, then
/// flushes the sink.
///
/// Records are written verbatim in the order they are popped. After a write error the writer
/// keeps popping, discarding records, so that workers never block on a full queue.
///
/// # Errors
///
/// Returns the first write or flush error, once all sentinels have been observed.
pub fn run_writer<W: Write>(
    mut sink: W,
    output: &BoundedQueue<OutputRecord>,
    threads: usize,
) -> io::Result<WriterSummary> {
    let progress = ProgressTracker::new("Wrote consensus records").with_interval(10_000);
    let mut summary = WriterSummary::default();
    let mut failure: Option<io::Error> = None;

    while summary.sentinels_observed < threads {
        let record = output.pop();
        if record.is_sentinel() {
            summary.sentinels_observed += 1;
            continue;
        }
        if failure.is_some() {
            continue;
        }
        match sink.write_all(record.as_str().as_bytes()) {
            Ok(()) => {
                summary.records_written += 1;
                progress.log_if_needed(1);
            }
            Err(e) => {
                error!("Failed to write consensus record: {e}");
                failure = Some(e);
            }
        }
    }

    if failure.is_none() {
        failure = sink.flush().err();
    }
    progress.log_final();
    debug!("Writer observed {} sentinels", summary.sentinels_observed);

    match failure {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}

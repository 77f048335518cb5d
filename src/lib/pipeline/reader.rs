//! The single producer feeding target groups to the workers.

use std::io;

use log::debug;

use crate::progress::ProgressTracker;
use crate::provider::AlignmentProvider;
use crate::queue::BoundedQueue;
use crate::target::TargetGroup;

/// Counts reported by [`run_reader`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderSummary {
    /// Groups pushed to the input queue, sentinels excluded.
    pub targets_forwarded: u64,
    /// Groups the provider returned without any alignments.
    pub targets_dropped_empty: u64,
}

/// Drains `provider` into `input`, then pushes one sentinel per worker.
///
/// Groups without alignments are dropped. Blocks whenever the input queue is full.
///
/// # Errors
///
/// Returns the provider's error as soon as it occurs. No sentinels are pushed in that case, so
/// the caller must not wait for the workers to finish.
pub fn run_reader<P: AlignmentProvider + ?Sized>(
    provider: &mut P,
    input: &BoundedQueue<TargetGroup>,
    threads: usize,
) -> io::Result<ReaderSummary> {
    let progress = ProgressTracker::new("Read targets").with_interval(1_000);
    let mut summary = ReaderSummary::default();

    while let Some(group) = provider.next_target()? {
        if group.is_sentinel() {
            debug!("Dropping target {} with no alignments", group.name);
            summary.targets_dropped_empty += 1;
            continue;
        }
        input.push(group);
        summary.targets_forwarded += 1;
        progress.log_if_needed(1);
    }
    progress.log_final();

    for _ in 0..threads {
        input.push(TargetGroup::sentinel());
    }
    debug!("Reader finished after {} targets", summary.targets_forwarded);
    Ok(summary)
}

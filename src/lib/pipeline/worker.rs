//! Correction workers: one target group in, zero or more consensus records out.

use dagcorrect_graph::{AlignmentGraph, normalize_gaps, trim_alignment};
use log::{debug, trace};

use super::OutputRecord;
use crate::config::CorrectionConfig;
use crate::metrics::CorrectionMetrics;
use crate::queue::BoundedQueue;
use crate::target::TargetGroup;

/// A corrected subsequence of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusSegment {
    /// Id of the first alignment that contributed to the graph.
    pub source_id: String,
    pub sequence: Vec<u8>,
    /// Template start of the segment, inclusive.
    pub range_start: usize,
    /// Template end of the segment, exclusive.
    pub range_end: usize,
}

/// Pushes the worker's sentinel record when dropped, including while unwinding from a panic,
/// so the writer always sees one sentinel per worker.
struct SentinelGuard<'a> {
    output: &'a BoundedQueue<OutputRecord>,
}

impl Drop for SentinelGuard<'_> {
    fn drop(&mut self) {
        self.output.push(OutputRecord::sentinel());
    }
}

/// Builds the alignment graph for one target and calls its consensus.
///
/// Alignments with an aligned query shorter than `min_len` are skipped. The rest are
/// normalized and trimmed; those with nothing left after trimming are skipped too. Returns no
/// segments if no alignment survives.
#[must_use]
pub fn correct_target(
    group: &TargetGroup,
    config: &CorrectionConfig,
    metrics: &mut CorrectionMetrics,
) -> Vec<ConsensusSegment> {
    let mut graph = AlignmentGraph::new(&group.template);
    let mut source_id: Option<&str> = None;

    for aln in &group.alignments {
        metrics.alignments_considered += 1;
        if aln.aligned_len() < config.min_len {
            metrics.alignments_too_short += 1;
            continue;
        }
        let Some(trimmed) = trim_alignment(normalize_gaps(aln), config.trim) else {
            metrics.alignments_trimmed_away += 1;
            continue;
        };
        source_id.get_or_insert(&aln.id);
        graph.add_alignment(&trimmed);
        metrics.alignments_used += 1;
    }

    let Some(source_id) = source_id else {
        trace!("No usable alignments for target {}", group.name);
        return Vec::new();
    };

    graph.merge_nodes();
    graph
        .consensus(config.min_coverage, config.min_len)
        .into_iter()
        .map(|result| ConsensusSegment {
            source_id: source_id.to_string(),
            sequence: result.sequence,
            range_start: result.range.0,
            range_end: result.range.1,
        })
        .collect()
}

/// Consumes target groups until a sentinel arrives, pushing formatted records to `output`.
///
/// Exactly one sentinel record is pushed when the worker stops. Record counters are local to
/// the worker and start at zero.
pub fn run_worker(
    worker_id: usize,
    config: &CorrectionConfig,
    input: &BoundedQueue<TargetGroup>,
    output: &BoundedQueue<OutputRecord>,
) -> CorrectionMetrics {
    let _guard = SentinelGuard { output };
    let mut metrics = CorrectionMetrics::default();
    let mut counter: u64 = 0;

    let mut group = input.pop();
    while !group.is_sentinel() {
        metrics.targets_processed += 1;

        if group.coverage() < config.min_coverage as usize {
            trace!("Skipping target {} with coverage {}", group.name, group.coverage());
            metrics.targets_below_coverage += 1;
        } else {
            let segments = correct_target(&group, config, &mut metrics);
            if !segments.is_empty() {
                metrics.targets_corrected += 1;
            }
            for segment in &segments {
                output.push(OutputRecord::consensus(segment, counter));
                counter += 1;
                metrics.consensus_records += 1;
                metrics.consensus_bases += segment.sequence.len() as u64;
            }
        }

        group = input.pop();
    }

    debug!(
        "Worker {worker_id} finished: {} targets, {} records",
        metrics.targets_processed, metrics.consensus_records
    );
    metrics
}

//! Concurrency tests for the correction pipeline.
//!
//! These tests drive `run_correction` with in-memory providers across worker counts and check
//! that shutdown always completes, that no record is lost or duplicated, and that each worker's
//! records keep their relative order.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use dagcorrect_lib::config::CorrectionConfig;
use dagcorrect_lib::graph::Alignment;
use dagcorrect_lib::pipeline::run_correction;
use dagcorrect_lib::provider::InMemoryProvider;
use dagcorrect_lib::target::TargetGroup;
use parking_lot::Mutex;
use rstest::rstest;

use crate::helpers::{exact_group, random_sequence};

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedSink {
    fn headers(&self) -> Vec<String> {
        let text = String::from_utf8(self.0.lock().clone()).unwrap();
        text.lines().filter(|l| l.starts_with('>')).map(str::to_string).collect()
    }
}

fn config(threads: usize) -> CorrectionConfig {
    CorrectionConfig { threads, min_coverage: 3, min_len: 20, trim: 0, ..CorrectionConfig::default() }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(8)]
fn test_no_targets_terminates(#[case] threads: usize) {
    let sink = SharedSink::default();
    let summary = run_correction(&config(threads), InMemoryProvider::default(), sink.clone()).unwrap();
    assert_eq!(summary.writer.sentinels_observed, threads);
    assert_eq!(summary.writer.records_written, 0);
    assert!(sink.headers().is_empty());
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn test_more_targets_than_queue_capacity(#[case] threads: usize) {
    let targets = 200;
    let groups: Vec<_> = (0..targets)
        .map(|i| exact_group(&format!("t{i}"), &random_sequence(60, i as u64), 3))
        .collect();
    let sink = SharedSink::default();
    let summary = run_correction(&config(threads), InMemoryProvider::new(groups), sink.clone()).unwrap();

    assert_eq!(summary.reader.targets_forwarded, targets as u64);
    assert_eq!(summary.metrics.targets_processed, targets as u64);
    assert_eq!(summary.writer.records_written, targets as u64);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for header in sink.headers() {
        let read_id = header[1..].split('/').next().unwrap().to_string();
        *seen.entry(read_id).or_default() += 1;
    }
    assert_eq!(seen.len(), targets);
    assert!(seen.values().all(|&n| n == 1));
}

#[test]
fn test_default_config_corrects_full_span_alignments() {
    let template = random_sequence(1000, 2024);
    let group = exact_group("target", &template, 8);
    let sink = SharedSink::default();
    let summary =
        run_correction(&CorrectionConfig::default(), InMemoryProvider::new(vec![group]), sink.clone())
            .unwrap();
    assert_eq!(summary.writer.records_written, 1);

    let text = String::from_utf8(sink.0.lock().clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let range = lines[0].rsplit('/').next().unwrap();
    let (start, end) = range.split_once('_').unwrap();
    let (start, end): (usize, usize) = (start.parse().unwrap(), end.parse().unwrap());
    assert!(start < end && end <= 1000);
    assert_eq!((start, end), (10, 990));
    assert!(lines[1].len() >= 500);
    assert_eq!(lines[1], &template[10..990]);
}

#[test]
fn test_per_worker_counters_are_dense() {
    let groups: Vec<_> =
        (0..40).map(|i| exact_group(&format!("t{i}"), &random_sequence(50, 100 + i), 4)).collect();
    let sink = SharedSink::default();
    run_correction(&config(1), InMemoryProvider::new(groups), sink.clone()).unwrap();

    // With a single worker the counter runs 0..n in input order.
    let counters: Vec<u64> = sink
        .headers()
        .iter()
        .map(|h| h.split('/').nth(1).unwrap().parse().unwrap())
        .collect();
    assert_eq!(counters, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_records_of_one_target_keep_worker_order() {
    // Each target has two supported regions separated by a stretch only one read covers, so
    // every target yields two records from the same worker.
    let template = random_sequence(90, 42);
    let groups: Vec<TargetGroup> = (0..30)
        .map(|i| {
            let name = format!("t{i}");
            let mut alignments = Vec::new();
            for r in 0..3 {
                alignments.push(Alignment::new(format!("{name}_left{r}"), 0, &template[..30], &template[..30]));
                alignments.push(Alignment::new(format!("{name}_right{r}"), 60, &template[60..], &template[60..]));
            }
            alignments.push(Alignment::new(format!("{name}_mid"), 30, &template[30..60], &template[30..60]));
            TargetGroup::new(name, template.as_str(), alignments)
        })
        .collect();

    let sink = SharedSink::default();
    let summary = run_correction(&config(4), InMemoryProvider::new(groups), sink.clone()).unwrap();
    assert_eq!(summary.writer.records_written, 60);

    // Records from different workers may interleave, but a target's two records arrive in
    // template order with consecutive counters.
    let mut by_source: HashMap<String, Vec<(u64, String)>> = HashMap::new();
    for header in sink.headers() {
        let fields: Vec<&str> = header[1..].split('/').collect();
        let counter: u64 = fields[1].parse().unwrap();
        by_source.entry(fields[0].to_string()).or_default().push((counter, fields[2].to_string()));
    }
    assert_eq!(by_source.len(), 30);
    for (source, records) in &by_source {
        assert_eq!(records.len(), 2, "{source}");
        assert_eq!(records[0].1, "0_30", "{source}");
        assert_eq!(records[1].1, "60_90", "{source}");
        assert_eq!(records[1].0, records[0].0 + 1, "{source}");
    }
}

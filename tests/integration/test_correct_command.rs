//! End-to-end CLI tests for the dagcorrect binary.
//!
//! These tests run the actual binary over M5 + FASTA fixtures and validate:
//! 1. Consensus records on stdout
//! 2. Exit codes for argument and input errors
//! 3. Metrics output

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

use crate::helpers::{SimulatedRead, random_sequence, write_single_target};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dagcorrect"))
        .args(args)
        .output()
        .expect("Failed to run dagcorrect")
}

fn run_on(m5: &Path, fasta: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["-a", m5.to_str().unwrap(), "-s", fasta.to_str().unwrap()];
    args.extend_from_slice(extra);
    run(&args)
}

/// Eight reads over a 600 base target, two of them carrying the same minority substitution.
fn standard_reads() -> Vec<SimulatedRead> {
    let mut reads: Vec<_> = (0..6).map(|i| SimulatedRead::exact(&format!("read{i}"))).collect();
    reads.push(SimulatedRead::with_substitutions("read6", &[100, 300]));
    reads.push(SimulatedRead::with_substitutions("read7", &[100]));
    reads
}

fn parse_records(stdout: &[u8]) -> Vec<(String, String)> {
    let text = String::from_utf8(stdout.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    lines
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}

#[test]
fn test_correct_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let target = random_sequence(600, 7);
    let (m5, fasta) = write_single_target(temp_dir.path(), "target1", &target, &standard_reads());

    let output = run_on(&m5, &fasta, &["-j", "2"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let records = parse_records(&output.stdout);
    assert_eq!(records.len(), 1);
    let (header, sequence) = &records[0];
    assert_eq!(header, ">read0/0/10_590");
    assert_eq!(sequence, &target[10..590]);
}

#[test]
fn test_correct_with_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let target = random_sequence(600, 11);
    let (m5, fasta) = write_single_target(temp_dir.path(), "target1", &target, &standard_reads());
    let metrics = temp_dir.path().join("metrics.tsv");

    let output = run_on(&m5, &fasta, &["--metrics", metrics.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let content = fs::read_to_string(&metrics).unwrap();
    let mut lines = content.lines();
    let header: Vec<_> = lines.next().unwrap().split('\t').collect();
    let values: Vec<_> = lines.next().unwrap().split('\t').collect();
    let value = |name: &str| values[header.iter().position(|h| *h == name).unwrap()].to_string();
    assert_eq!(value("targets_processed"), "1");
    assert_eq!(value("targets_corrected"), "1");
    assert_eq!(value("alignments_used"), "8");
    assert_eq!(value("consensus_records"), "1");
    assert_eq!(value("consensus_bases"), "580");
}

#[test]
fn test_correct_below_min_coverage_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let target = random_sequence(600, 3);
    let (m5, fasta) = write_single_target(temp_dir.path(), "target1", &target, &standard_reads());

    let output = run_on(&m5, &fasta, &["-c", "9"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_correct_target_filter() {
    let temp_dir = TempDir::new().unwrap();
    let target = random_sequence(600, 5);
    let (m5, fasta) = write_single_target(temp_dir.path(), "target1", &target, &standard_reads());

    let skipped = run_on(&m5, &fasta, &["some_other_target"]);
    assert!(skipped.status.success());
    assert!(skipped.stdout.is_empty());

    let selected = run_on(&m5, &fasta, &["target1"]);
    assert!(selected.status.success());
    assert_eq!(parse_records(&selected.stdout).len(), 1);
}

#[test]
fn test_missing_required_flag_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let m5 = temp_dir.path().join("hits.m5");
    fs::write(&m5, "").unwrap();

    let output = run(&["-a", m5.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--seq-file"));
}

#[test]
fn test_unknown_flag_exits_1() {
    let output = run(&["--no-such-flag"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_0() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--min-coverage"));
    assert!(stdout.contains("--only-proper-overlaps"));
}

#[test]
fn test_malformed_alignment_file_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let target = random_sequence(600, 1);
    let (m5, fasta) = write_single_target(temp_dir.path(), "target1", &target, &standard_reads());
    fs::write(&m5, "read0 600 0 600 + target1\n").unwrap();

    let output = run_on(&m5, &fasta, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_sequence_file_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let m5 = temp_dir.path().join("hits.m5");
    fs::write(&m5, "").unwrap();
    let fasta = temp_dir.path().join("missing.fa");

    let output = run_on(&m5, &fasta, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

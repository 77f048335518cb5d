//! Synthetic targets, reads and M5/FASTA files.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use dagcorrect_lib::graph::Alignment;
use dagcorrect_lib::target::TargetGroup;

/// Deterministic pseudo-random sequence of `len` bases.
pub fn random_sequence(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            b"ACGT"[(state >> 33) as usize % 4] as char
        })
        .collect()
}

/// Returns a base different from `base`.
pub fn other_base(base: u8) -> u8 {
    if base == b'A' { b'C' } else { b'A' }
}

/// A read aligned gap-free over the whole target, with optional substitutions.
pub struct SimulatedRead {
    pub name: String,
    pub substitutions: Vec<usize>,
}

impl SimulatedRead {
    pub fn exact(name: &str) -> Self {
        Self { name: name.to_string(), substitutions: Vec::new() }
    }

    pub fn with_substitutions(name: &str, substitutions: &[usize]) -> Self {
        Self { name: name.to_string(), substitutions: substitutions.to_vec() }
    }

    /// The read's bases given the target it was sampled from.
    pub fn bases(&self, target: &str) -> String {
        let mut bases = target.as_bytes().to_vec();
        for &pos in &self.substitutions {
            bases[pos] = other_base(bases[pos]);
        }
        String::from_utf8(bases).unwrap()
    }
}

/// Formats one M5 line for a read aligned over the full target.
pub fn m5_line(read: &SimulatedRead, target_name: &str, target: &str) -> String {
    let query = read.bases(target);
    let len = target.len();
    let pattern: String = query
        .bytes()
        .zip(target.bytes())
        .map(|(q, t)| if q == t { '|' } else { '*' })
        .collect();
    let mismatches = read.substitutions.len();
    format!(
        "{} {len} 0 {len} + {target_name} {len} 0 {len} + -{score} {matches} {mismatches} 0 0 254 {query} {pattern} {target}",
        read.name,
        score = len * 5,
        matches = len - mismatches,
    )
}

/// Writes targets to a FASTA file.
pub fn write_fasta(path: &Path, targets: &[(&str, &str)]) {
    let mut out = String::new();
    for (name, seq) in targets {
        writeln!(out, ">{name}").unwrap();
        for chunk in seq.as_bytes().chunks(80) {
            writeln!(out, "{}", std::str::from_utf8(chunk).unwrap()).unwrap();
        }
    }
    fs::write(path, out).expect("Failed to write FASTA");
}

/// Writes M5 lines to a file.
pub fn write_m5(path: &Path, lines: &[String]) {
    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(path, out).expect("Failed to write M5");
}

/// Writes a single target with `reads` to `dir`, returning the (M5, FASTA) paths.
pub fn write_single_target(
    dir: &Path,
    target_name: &str,
    target: &str,
    reads: &[SimulatedRead],
) -> (PathBuf, PathBuf) {
    let m5 = dir.join("hits.m5");
    let fasta = dir.join("targets.fa");
    let lines: Vec<String> = reads.iter().map(|r| m5_line(r, target_name, target)).collect();
    write_m5(&m5, &lines);
    write_fasta(&fasta, &[(target_name, target)]);
    (m5, fasta)
}

/// A target group whose `reads` alignments all match the template exactly.
pub fn exact_group(name: &str, template: &str, reads: usize) -> TargetGroup {
    let alignments = (0..reads)
        .map(|i| Alignment::new(format!("{name}_read{i}"), 0, template, template))
        .collect();
    TargetGroup::new(name, template, alignments)
}

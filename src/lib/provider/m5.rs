//! Provider reading M5 alignment lines.
//!
//! Each non-blank, non-`#` line holds 19 whitespace-separated columns:
//!
//! ```text
//! qName qLen qStart qEnd qStrand tName tLen tStart tEnd tStrand score
//! numMatch numMismatch numIns numDel mapQV qAlignedSeq matchPattern tAlignedSeq
//! ```
//!
//! Coordinates are 0-based and half-open. Consecutive lines sharing `tName` form one target
//! group, so every target's alignments must be contiguous in the file. When `tStrand` is `-` the
//! aligned strings are reverse complemented onto the forward strand of the template. The
//! ungapped aligned target must then equal the FASTA template over `tStart..tEnd`.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use dagcorrect_graph::{Alignment, GAP};
use log::debug;

use super::{AlignmentProvider, ProviderOptions, load_templates};
use crate::dna::reverse_complement;
use crate::errors::CorrectionError;
use crate::target::TargetGroup;

const NUM_COLUMNS: usize = 19;

mod column {
    pub const Q_NAME: usize = 0;
    pub const Q_LEN: usize = 1;
    pub const Q_START: usize = 2;
    pub const Q_END: usize = 3;
    pub const Q_STRAND: usize = 4;
    pub const T_NAME: usize = 5;
    pub const T_LEN: usize = 6;
    pub const T_START: usize = 7;
    pub const T_END: usize = 8;
    pub const T_STRAND: usize = 9;
    pub const Q_ALIGNED: usize = 16;
    pub const T_ALIGNED: usize = 18;
}

/// One parsed M5 line.
type Hit = (String, Alignment);

/// Groups M5 alignments by target and pairs them with template sequences.
pub struct M5AlignmentProvider<R> {
    reader: R,
    source: String,
    templates: HashMap<String, Vec<u8>>,
    options: ProviderOptions,
    pending: Option<Hit>,
    finished_targets: HashSet<String>,
    line_number: usize,
    line: String,
}

impl M5AlignmentProvider<BufReader<File>> {
    /// Opens an M5 file and loads the templates it refers to from a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or the FASTA file is malformed.
    pub fn from_paths<A: AsRef<Path>, S: AsRef<Path>>(
        align_path: A,
        seq_path: S,
        options: ProviderOptions,
    ) -> io::Result<Self> {
        let align_path = align_path.as_ref();
        let templates = load_templates(seq_path)?;
        let reader = BufReader::new(File::open(align_path)?);
        Ok(Self::new(reader, align_path.display().to_string(), templates, options))
    }
}

impl<R: BufRead> M5AlignmentProvider<R> {
    /// Creates a provider over `reader`; `source` names the input in error messages.
    pub fn new(
        reader: R,
        source: impl Into<String>,
        templates: HashMap<String, Vec<u8>>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            reader,
            source: source.into(),
            templates,
            options,
            pending: None,
            finished_targets: HashSet::new(),
            line_number: 0,
            line: String::new(),
        }
    }

    fn format_error(&self, reason: impl Into<String>) -> io::Error {
        CorrectionError::InvalidFileFormat {
            file_type: "M5".to_string(),
            path: self.source.clone(),
            reason: format!("line {}: {}", self.line_number, reason.into()),
        }
        .into()
    }

    /// Returns the next parsed line, honouring a line pushed back by the previous group.
    fn next_hit(&mut self) -> io::Result<Option<Hit>> {
        if let Some(hit) = self.pending.take() {
            return Ok(Some(hit));
        }
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return parse_line(trimmed).map(Some).map_err(|reason| self.format_error(reason));
        }
    }
}

impl<R: BufRead + Send> AlignmentProvider for M5AlignmentProvider<R> {
    fn next_target(&mut self) -> io::Result<Option<TargetGroup>> {
        loop {
            let Some((name, first)) = self.next_hit()? else {
                return Ok(None);
            };
            if self.finished_targets.contains(&name) {
                return Err(self.format_error(format!(
                    "alignments for target '{name}' are not contiguous"
                )));
            }

            let mut alignments = vec![first];
            while let Some((next_name, aln)) = self.next_hit()? {
                if next_name == name {
                    alignments.push(aln);
                } else {
                    self.pending = Some((next_name, aln));
                    break;
                }
            }
            self.finished_targets.insert(name.clone());

            if !self.options.accepts(&name) {
                debug!("Skipping target {name} not in the target list");
                continue;
            }
            let Some(template) = self.templates.remove(&name) else {
                return Err(CorrectionError::TargetNotFound { name }.into());
            };
            if let Some(aln) = alignments.iter().find(|a| a.template_end > template.len()) {
                return Err(self.format_error(format!(
                    "alignment of {} ends at {} beyond target '{name}' of length {}",
                    aln.id,
                    aln.template_end,
                    template.len()
                )));
            }

            if let Some(aln) = alignments.iter().find(|a| !matches_template(a, &template)) {
                return Err(self.format_error(format!(
                    "aligned target of {} does not match target '{name}' at {}-{}",
                    aln.id, aln.template_start, aln.template_end
                )));
            }

            let alignments = self.options.select(alignments);
            return Ok(Some(TargetGroup::new(name, template, alignments)));
        }
    }
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize, name: &str) -> Result<T, String> {
    fields[index].parse().map_err(|_| format!("invalid {name} '{}'", fields[index]))
}

fn parse_strand(fields: &[&str], index: usize, name: &str) -> Result<bool, String> {
    match fields[index] {
        "+" | "0" => Ok(false),
        "-" | "1" => Ok(true),
        other => Err(format!("invalid {name} '{other}'")),
    }
}

fn count_bases(aligned: &[u8]) -> usize {
    aligned.iter().filter(|&&b| b != GAP).count()
}

/// Whether the ungapped aligned target equals the template over the alignment's range.
fn matches_template(aln: &Alignment, template: &[u8]) -> bool {
    let expected = &template[aln.template_start..aln.template_end];
    let mut observed = aln.template_aligned.iter().filter(|&&b| b != GAP);
    expected.iter().all(|e| observed.next().is_some_and(|o| o.eq_ignore_ascii_case(e)))
        && observed.next().is_none()
}

/// Parses one M5 line into its target name and alignment.
fn parse_line(line: &str) -> Result<Hit, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != NUM_COLUMNS {
        return Err(format!("expected {NUM_COLUMNS} columns, found {}", fields.len()));
    }

    let query_len: usize = parse_field(&fields, column::Q_LEN, "qLen")?;
    let query_start: usize = parse_field(&fields, column::Q_START, "qStart")?;
    let query_end: usize = parse_field(&fields, column::Q_END, "qEnd")?;
    parse_strand(&fields, column::Q_STRAND, "qStrand")?;
    let template_len: usize = parse_field(&fields, column::T_LEN, "tLen")?;
    let template_start: usize = parse_field(&fields, column::T_START, "tStart")?;
    let template_end: usize = parse_field(&fields, column::T_END, "tEnd")?;
    let reverse = parse_strand(&fields, column::T_STRAND, "tStrand")?;

    let mut query_aligned = fields[column::Q_ALIGNED].as_bytes().to_vec();
    let mut template_aligned = fields[column::T_ALIGNED].as_bytes().to_vec();
    if query_aligned.len() != template_aligned.len() {
        return Err(format!(
            "aligned query length {} differs from aligned target length {}",
            query_aligned.len(),
            template_aligned.len()
        ));
    }
    if query_start > query_end || query_end > query_len {
        return Err(format!("query range {query_start}-{query_end} is invalid for length {query_len}"));
    }
    if template_start > template_end || template_end > template_len {
        return Err(format!(
            "target range {template_start}-{template_end} is invalid for length {template_len}"
        ));
    }
    if count_bases(&template_aligned) != template_end - template_start {
        return Err(format!(
            "aligned target has {} bases but the target range spans {}",
            count_bases(&template_aligned),
            template_end - template_start
        ));
    }
    if reverse {
        query_aligned = reverse_complement(&query_aligned);
        template_aligned = reverse_complement(&template_aligned);
    }

    let alignment = Alignment {
        id: fields[column::Q_NAME].to_string(),
        template_start,
        template_end,
        template_len,
        query_start,
        query_end,
        query_len,
        query_aligned,
        template_aligned,
    };
    Ok((fields[column::T_NAME].to_string(), alignment))
}

//! Template sequences loaded from FASTA.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use noodles::fasta;

use crate::errors::CorrectionError;

/// Loads every FASTA record from `path`, keyed by record name.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid FASTA.
pub fn load_templates<P: AsRef<Path>>(path: P) -> io::Result<HashMap<String, Vec<u8>>> {
    let path = path.as_ref();
    info!("Loading template sequences from {}", path.display());
    let file = File::open(path)?;
    let templates = read_templates(BufReader::new(file), &path.display().to_string())?;
    debug!("Loaded {} template sequences", templates.len());
    Ok(templates)
}

/// Reads FASTA records from any buffered source.
///
/// `source` names the input in error messages.
pub fn read_templates<R: BufRead>(reader: R, source: &str) -> io::Result<HashMap<String, Vec<u8>>> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut templates = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = std::str::from_utf8(record.name())
            .map_err(|e| CorrectionError::InvalidFileFormat {
                file_type: "FASTA".to_string(),
                path: source.to_string(),
                reason: format!("record name is not UTF-8: {e}"),
            })?
            .to_string();
        let sequence: &[u8] = record.sequence().as_ref();
        if templates.insert(name.clone(), sequence.to_vec()).is_some() {
            return Err(CorrectionError::InvalidFileFormat {
                file_type: "FASTA".to_string(),
                path: source.to_string(),
                reason: format!("duplicate record name '{name}'"),
            }
            .into());
        }
    }

    Ok(templates)
}

//! Input validation utilities
//!
//! Common checks for command-line parameters and input paths, reported as
//! [`CorrectionError`](crate::errors::CorrectionError)s with consistent messages.

use crate::errors::{CorrectionError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Errors
/// Returns an error if the path does not exist
///
/// # Example
/// ```
/// use dagcorrect_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/hits.m5", "Alignment file");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(CorrectionError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist, reporting the first missing one
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate that a value is at least `min`
///
/// # Errors
/// Returns an error if `value < min`
///
/// # Example
/// ```
/// use dagcorrect_lib::validation::validate_at_least;
///
/// assert!(validate_at_least(4, 1, "threads").is_ok());
/// assert!(validate_at_least(0, 1, "threads").is_err());
/// ```
pub fn validate_at_least<T: PartialOrd + Display>(value: T, min: T, name: &str) -> Result<()> {
    if value < min {
        return Err(CorrectionError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be >= {min}, got {value}"),
        });
    }
    Ok(())
}

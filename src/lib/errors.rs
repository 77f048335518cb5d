//! Custom error types for correction runs.

use thiserror::Error;

/// Result type alias for correction operations
pub type Result<T> = std::result::Result<T, CorrectionError>;

/// Error type for correction operations
#[derive(Error, Debug)]
pub enum CorrectionError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "M5", "FASTA")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// An alignment refers to a target missing from the sequence file
    #[error("Target sequence '{name}' not found in sequence file")]
    TargetNotFound {
        /// The target name
        name: String,
    },

    /// A pipeline stage terminated abnormally
    #[error("Pipeline stage '{stage}' failed: {reason}")]
    StageFailed {
        /// Name of the stage (thread name)
        stage: String,
        /// What went wrong
        reason: String,
    },
}

impl From<CorrectionError> for std::io::Error {
    fn from(error: CorrectionError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter() {
        let error = CorrectionError::InvalidParameter {
            parameter: "threads".to_string(),
            reason: "must be >= 1".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Invalid parameter 'threads'"));
        assert!(msg.contains("must be >= 1"));
    }

    #[test]
    fn test_invalid_file_format() {
        let error = CorrectionError::InvalidFileFormat {
            file_type: "M5".to_string(),
            path: "/path/to/hits.m5".to_string(),
            reason: "expected 19 columns".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Invalid M5 file"));
        assert!(msg.contains("expected 19 columns"));
    }

    #[test]
    fn test_target_not_found() {
        let error = CorrectionError::TargetNotFound { name: "read42".to_string() };
        assert!(error.to_string().contains("'read42' not found"));
    }

    #[test]
    fn test_into_io_error_is_invalid_data() {
        let error = CorrectionError::TargetNotFound { name: "t".to_string() };
        let io: std::io::Error = error.into();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
        assert!(io.to_string().contains("'t' not found"));
    }
}

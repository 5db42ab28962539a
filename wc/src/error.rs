//! Error types for form assembly and file ingestion

use std::path::PathBuf;
use thiserror::Error;

use crate::document::{FileFormat, FileType};

/// Errors raised by the schema registry and the form session.
///
/// None of these are caused by user-entered values. They signal a mismatch
/// between what a caller asked for and what the registry defines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown action: {key}")]
    UnknownAction { key: String },

    #[error("Action {action} has no parameter named {parameter}")]
    UnknownParameter { action: String, parameter: String },

    #[error("Transformation slot {index} out of range (have {len})")]
    SlotOutOfRange { index: usize, len: usize },
}

/// Errors raised while previewing the columns of a data file
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column preview is not supported for {file_type}/{file_format} files")]
    Unsupported { file_type: FileType, file_format: FileFormat },

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Line {line} is not valid {encoding}")]
    Decode { line: usize, encoding: String },

    #[error("No header row found after skipping {skip_rows} rows")]
    MissingHeader { skip_rows: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_message() {
        let err = FormError::UnknownAction {
            key: "explode_rows".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown action: explode_rows");
    }

    #[test]
    fn test_unsupported_message() {
        let err = IngestionError::Unsupported {
            file_type: FileType::Zip,
            file_format: FileFormat::Xlsx,
        };

        let msg = err.to_string();
        assert!(msg.contains("zip"));
        assert!(msg.contains("xlsx"));
    }
}

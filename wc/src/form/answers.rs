//! Answers file: the form filled in ahead of time
//!
//! ```yaml
//! file:
//!   file_type: file
//!   file_format: csv
//!   encoding: utf-8
//!   delimiter: ","
//!   skip_rows: 0
//! columns: [id, qty]
//! transformations:
//!   - action: select_columns
//!     parameters:
//!       column_names: [id]
//! ```

use std::path::Path;

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::document::{Delimiter, FileConfig, FileFormat, FileType, ParamValue};
use crate::form::session::FormSession;

/// Deserialized answers file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormAnswers {
    /// File settings; fields left out fall back to the configured defaults
    pub file: FileOverrides,

    /// Column names as a list
    pub columns: Vec<String>,

    /// Column names as text, one per line; used when `columns` is empty
    pub columns_text: Option<String>,

    pub transformations: Vec<SlotAnswers>,
}

/// File settings as written in the answers file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileOverrides {
    pub file_type: Option<FileType>,
    pub file_format: Option<FileFormat>,
    pub encoding: Option<String>,
    pub delimiter: Option<Delimiter>,
    pub skip_rows: Option<u64>,
}

impl FileOverrides {
    /// Apply these settings on top of `defaults`
    pub fn merge(self, defaults: &FileConfig) -> FileConfig {
        FileConfig {
            file_type: self.file_type.unwrap_or(defaults.file_type),
            file_format: self.file_format.unwrap_or(defaults.file_format),
            encoding: self.encoding.unwrap_or_else(|| defaults.encoding.clone()),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            skip_rows: self.skip_rows.unwrap_or(defaults.skip_rows),
        }
    }
}

/// Answers for one transformation slot
#[derive(Debug, Clone, Deserialize)]
pub struct SlotAnswers {
    pub action: String,
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
}

impl FormAnswers {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse answers file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read answers file {}", path.display()))?;
        let answers = Self::from_yaml(&content)?;
        info!(path = %path.display(), slots = answers.transformations.len(), "Loaded answers");
        Ok(answers)
    }

    /// Build a session from these answers
    ///
    /// `defaults` supplies the file settings when the answers leave them out.
    /// Fails on actions or parameters the registry does not know.
    pub fn into_session(self, defaults: &FileConfig) -> Result<FormSession> {
        let mut session = FormSession::new(self.file.merge(defaults));

        if !self.columns.is_empty() {
            session.set_columns(self.columns);
        } else if let Some(text) = &self.columns_text {
            session.set_columns_from_text(text);
        }

        for answers in self.transformations {
            let Some(index) = session.add_slot(&answers.action)? else {
                tracing::warn!(action = %answers.action, "Ignoring transformations beyond the limit");
                break;
            };
            for (name, value) in answers.parameters {
                session.set_value(index, &name, value)?;
            }
        }

        Ok(session)
    }
}

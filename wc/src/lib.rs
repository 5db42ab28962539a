//! wmsconfig - schema-driven builder for WMS file-parsing configurations
//!
//! Describes how a tabular data file (CSV/Excel, optionally zipped or
//! gzipped) should be parsed and which transformations run after loading,
//! and emits that description as a JSON document. No data is transformed.
//!
//! # Architecture
//!
//! ```text
//! schema (static registry) ──► form::assembler ◄── form::input (InputSource)
//!                                   │                 ├── form::answers (YAML)
//!                                   ▼                 └── form::prompt (terminal)
//!                          document::PipelineConfig
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wmsconfig::{FileConfig, FormSession};
//!
//! let mut session = FormSession::new(FileConfig::default());
//! session.set_columns(vec!["id".into(), "qty".into()]);
//! let slot = session.add_slot("select_columns")?.unwrap();
//! session.set_value(slot, "column_names", vec!["id"])?;
//! let json = session.assemble()?.document.to_json(true)?;
//! ```

pub mod cli;
pub mod columns;
pub mod config;
pub mod document;
pub mod error;
pub mod form;
pub mod schema;

pub use config::Config;
pub use document::{Delimiter, FileConfig, FileFormat, FileType, ParamValue, PipelineConfig, TransformationInstance};
pub use error::{FormError, IngestionError};
pub use form::{Assembly, AssemblyWarning, FormAnswers, FormSession, InputKey, InputRequest, InputSource, ValueStore};
pub use schema::{ActionDescriptor, ParamKind, ParameterDescriptor, list_actions, lookup};

/// Default name of the generated document
pub const DEFAULT_OUTPUT_FILE: &str = "wms_config.json";

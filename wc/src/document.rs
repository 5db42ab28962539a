//! Pipeline configuration document
//!
//! The document is the only artifact the tool produces:
//!
//! ```json
//! {
//!   "type": "wms-file-parsing",
//!   "config": {
//!     "file_type": "file",
//!     "file_format": "csv",
//!     "encoding": "utf-8",
//!     "delimiter": ",",
//!     "skip_rows": 0,
//!     "transformations": [
//!       { "action": "select_columns", "parameters": { "column_names": ["id"] } }
//!     ]
//!   }
//! }
//! ```

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of the document's top-level `type` key
pub const DOCUMENT_TYPE: &str = "wms-file-parsing";

/// How the data file is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    File,
    Zip,
    Gz,
}

impl FileType {
    pub const ALL: [FileType; 3] = [Self::File, Self::Zip, Self::Gz];
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Zip => write!(f, "zip"),
            Self::Gz => write!(f, "gz"),
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "zip" => Ok(Self::Zip),
            "gz" => Ok(Self::Gz),
            _ => Err(format!("Unknown file type: {}", s)),
        }
    }
}

/// Tabular format of the (unpacked) data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Csv,
    Xls,
    Xlsx,
}

impl FileFormat {
    pub const ALL: [FileFormat; 3] = [Self::Csv, Self::Xls, Self::Xlsx];
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xls => write!(f, "xls"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(format!("Unknown file format: {}", s)),
        }
    }
}

/// Field delimiter, serialized as the literal character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Delimiter {
    #[default]
    Comma,
    Pipe,
    Colon,
    Tab,
}

impl Delimiter {
    pub const ALL: [Delimiter; 4] = [Self::Comma, Self::Pipe, Self::Colon, Self::Tab];

    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Pipe => '|',
            Self::Colon => ':',
            Self::Tab => '\t',
        }
    }

    /// Human-readable name, used where a raw tab would be invisible
    pub fn name(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Pipe => "pipe",
            Self::Colon => "colon",
            Self::Tab => "tab",
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," => return Ok(Self::Comma),
            "|" => return Ok(Self::Pipe),
            ":" => return Ok(Self::Colon),
            "\t" | "\\t" => return Ok(Self::Tab),
            _ => {}
        }
        match s.to_lowercase().as_str() {
            "comma" => Ok(Self::Comma),
            "pipe" => Ok(Self::Pipe),
            "colon" => Ok(Self::Colon),
            "tab" => Ok(Self::Tab),
            _ => Err(format!("Unknown delimiter: {:?}", s)),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Delimiter> for String {
    fn from(value: Delimiter) -> Self {
        value.to_string()
    }
}

/// File parsing settings, set once per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub file_type: FileType,
    pub file_format: FileFormat,
    pub encoding: String,
    pub delimiter: Delimiter,
    pub skip_rows: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            file_type: FileType::default(),
            file_format: FileFormat::default(),
            encoding: crate::schema::ENCODINGS[0].to_string(),
            delimiter: Delimiter::default(),
            skip_rows: 0,
        }
    }
}

/// A single parameter value
///
/// MultiSelect parameters carry a list, Select and Text parameters carry text,
/// Number parameters carry a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    List(Vec<String>),
    Number(serde_json::Number),
    Text(String),
}

impl ParamValue {
    /// True for an empty list or blank text; such values are omitted from the document
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// One configured transformation in the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationInstance {
    pub action: String,
    pub parameters: IndexMap<String, ParamValue>,
}

impl TransformationInstance {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: IndexMap::new(),
        }
    }
}

/// Marker for the top-level `type` key; only one document type exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "wms-file-parsing")]
    WmsFileParsing,
}

/// Body of the document: file settings flattened next to the transformations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineBody {
    #[serde(flatten)]
    pub file: FileConfig,
    pub transformations: Vec<TransformationInstance>,
}

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub config: PipelineBody,
}

impl PipelineConfig {
    pub fn new(file: FileConfig, transformations: Vec<TransformationInstance>) -> Self {
        Self {
            doc_type: DocumentType::WmsFileParsing,
            config: PipelineBody { file, transformations },
        }
    }

    pub fn transformations(&self) -> &[TransformationInstance] {
        &self.config.transformations
    }

    /// Serialize to JSON, pretty-printed with two-space indentation when requested
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("Failed to serialize pipeline configuration")
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse pipeline configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delimiter_serde() {
        assert_eq!(serde_json::to_string(&Delimiter::Tab).unwrap(), "\"\\t\"");
        assert_eq!(serde_json::to_string(&Delimiter::Pipe).unwrap(), "\"|\"");

        let delimiter: Delimiter = serde_json::from_str("\":\"").unwrap();
        assert_eq!(delimiter, Delimiter::Colon);
        assert!(serde_json::from_str::<Delimiter>("\";\"").is_err());
    }

    #[test]
    fn test_delimiter_parse_names() {
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("\\t".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("PIPE".parse::<Delimiter>().unwrap(), Delimiter::Pipe);
        assert!("semicolon".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_file_type_and_format_parse() {
        assert_eq!("GZ".parse::<FileType>().unwrap(), FileType::Gz);
        assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Xlsx);
        assert!("tar".parse::<FileType>().is_err());
        assert!("json".parse::<FileFormat>().is_err());
    }

    #[test]
    fn test_param_value_is_empty() {
        assert!(ParamValue::List(vec![]).is_empty());
        assert!(ParamValue::from("").is_empty());
        assert!(ParamValue::from("   ").is_empty());
        assert!(!ParamValue::from("18").is_empty());
        assert!(!ParamValue::Number(0.into()).is_empty());
    }

    #[test]
    fn test_param_value_untagged() {
        let values: Vec<ParamValue> = serde_json::from_value(json!([["a", "b"], 3, "18"])).unwrap();
        assert_eq!(values[0], ParamValue::from(vec!["a", "b"]));
        assert_eq!(values[1], ParamValue::Number(3.into()));
        assert_eq!(values[2], ParamValue::from("18"));
    }

    #[test]
    fn test_document_shape() {
        let mut select = TransformationInstance::new("select_columns");
        select
            .parameters
            .insert("column_names".to_string(), ParamValue::from(vec!["id"]));
        let doc = PipelineConfig::new(FileConfig::default(), vec![select]);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "wms-file-parsing",
                "config": {
                    "file_type": "file",
                    "file_format": "csv",
                    "encoding": "utf-8",
                    "delimiter": ",",
                    "skip_rows": 0,
                    "transformations": [
                        {"action": "select_columns", "parameters": {"column_names": ["id"]}}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_document_rejects_other_type() {
        let content = r#"{"type":"other","config":{"file_type":"file","file_format":"csv","encoding":"utf-8","delimiter":",","skip_rows":0,"transformations":[]}}"#;
        assert!(PipelineConfig::from_json(content).is_err());
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let doc = PipelineConfig::new(FileConfig::default(), vec![]);
        let pretty = doc.to_json(true).unwrap();
        assert!(pretty.contains("\n  \"type\": \"wms-file-parsing\""));
        assert_eq!(PipelineConfig::from_json(&pretty).unwrap(), doc);
    }
}

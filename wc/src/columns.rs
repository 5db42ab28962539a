//! Column name sources
//!
//! Columns come either from free text (one name per line) or from the header
//! row of a plain CSV file. Nothing beyond the header is read.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::document::{FileConfig, FileFormat, FileType};
use crate::error::IngestionError;

/// Split free text into column names, one per line, ignoring blank lines
pub fn parse_column_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read the header row of a data file and return its column names
///
/// Only uncompressed CSV files can be previewed. The first `skip_rows` lines
/// are skipped before the header is read.
pub fn read_header(path: &Path, file: &FileConfig) -> Result<Vec<String>, IngestionError> {
    if file.file_type != FileType::File || file.file_format != FileFormat::Csv {
        return Err(IngestionError::Unsupported {
            file_type: file.file_type,
            file_format: file.file_format,
        });
    }
    let encoding = Encoding::parse(&file.encoding)?;

    let io_err = |source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    };
    let handle = fs::File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(handle);

    let mut line_no = 0usize;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(io_err)?;
        if read == 0 {
            return Err(IngestionError::MissingHeader {
                skip_rows: file.skip_rows,
            });
        }
        line_no += 1;
        if (line_no as u64) > file.skip_rows {
            break;
        }
    }

    let line = encoding.decode(&buf).ok_or_else(|| IngestionError::Decode {
        line: line_no,
        encoding: file.encoding.clone(),
    })?;
    let line = line.trim_start_matches('\u{feff}').trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(IngestionError::MissingHeader {
            skip_rows: file.skip_rows,
        });
    }

    let columns = split_fields(line, file.delimiter.as_char());

    debug!(path = %path.display(), line = line_no, "Read header row");
    info!(count = columns.len(), "Detected columns");
    Ok(columns)
}

/// Split one CSV record on `delimiter`
///
/// Delimiters inside `"`-quoted fields are kept, and `""` inside quotes is a
/// literal quote. Unquoted fields are trimmed; quoted fields are kept as written.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                _ => field.push(c),
            }
        } else if c == delimiter {
            fields.push(finish_field(&mut field, was_quoted));
            was_quoted = false;
        } else if was_quoted && c.is_whitespace() {
            // padding after a closing quote
        } else if c == '"' && field.trim().is_empty() {
            field.clear();
            quoted = true;
            was_quoted = true;
        } else {
            field.push(c);
        }
    }
    fields.push(finish_field(&mut field, was_quoted));
    fields
}

fn finish_field(field: &mut String, was_quoted: bool) -> String {
    let value = std::mem::take(field);
    if was_quoted { value } else { value.trim().to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    fn parse(name: &str) -> Result<Self, IngestionError> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(Self::Latin1),
            _ => Err(IngestionError::UnsupportedEncoding(name.to_string())),
        }
    }

    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Ascii if bytes.is_ascii() => String::from_utf8(bytes.to_vec()).ok(),
            Self::Ascii => None,
            // ISO-8859-1 maps every byte to the code point of the same value
            Self::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

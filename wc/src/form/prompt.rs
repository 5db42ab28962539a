//! Interactive terminal form

use std::path::Path;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::columns::read_header;
use crate::document::{Delimiter, FileConfig, FileFormat, FileType, ParamValue};
use crate::form::input::{InputRequest, InputSource, parse_number};
use crate::form::session::FormSession;
use crate::schema::{self, ENCODINGS, MAX_TRANSFORMATIONS, MIN_TRANSFORMATIONS, ParamKind};

/// Line-editing prompt that fills in a form
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }

    /// Read one line; `None` when the user pressed Ctrl+C or Ctrl+D
    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(&format!("{} ", prompt.bright_green())) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }

    /// Pick one of `options`; Enter keeps `default`
    fn choose(&mut self, label: &str, options: &[String], default: usize) -> Result<usize> {
        print_options(label, options);
        loop {
            let Some(line) = self.read(&format!("[{}]>", options[default]))? else {
                return Ok(default);
            };
            if line.trim().is_empty() {
                return Ok(default);
            }
            match resolve(line.trim(), options) {
                Some(index) => return Ok(index),
                None => println!("{} {}", "Not an option:".red(), line.trim()),
            }
        }
    }

    fn count(&mut self, label: &str, default: u64, min: u64, max: u64) -> Result<u64> {
        loop {
            let line = self.read(&format!("{} [{}]>", label, default))?.unwrap_or_default();
            if line.trim().is_empty() {
                return Ok(default);
            }
            match line.trim().parse::<u64>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => println!("{} {}..={}", "Enter a whole number in".red(), min, max),
            }
        }
    }

    /// Ask for the file settings, starting from `defaults`
    pub fn file_config(&mut self, defaults: &FileConfig) -> Result<FileConfig> {
        println!("{}", "File Configuration".bright_cyan().bold());

        let file_type = pick(self, "File Type", &FileType::ALL, defaults.file_type, |t| t.to_string())?;
        let file_format = pick(self, "File Format", &FileFormat::ALL, defaults.file_format, |f| {
            f.to_string()
        })?;

        let mut encodings: Vec<String> = ENCODINGS.iter().map(|e| e.to_string()).collect();
        if !encodings.contains(&defaults.encoding) {
            encodings.push(defaults.encoding.clone());
        }
        let default_encoding = encodings.iter().position(|e| *e == defaults.encoding).unwrap_or(0);
        let encoding = encodings[self.choose("Encoding", &encodings, default_encoding)?].clone();

        let delimiter = pick(self, "Delimiter", &Delimiter::ALL, defaults.delimiter, |d| {
            format!("{} ({})", d.name(), d.as_char().escape_default())
        })?;
        let skip_rows = self.count("Skip Rows", defaults.skip_rows, 0, u64::MAX)?;

        Ok(FileConfig {
            file_type,
            file_format,
            encoding,
            delimiter,
            skip_rows,
        })
    }

    /// Ask for column names, comma-separated
    pub fn columns(&mut self) -> Result<Vec<String>> {
        println!("{}", "Column Names".bright_cyan().bold());
        let line = self.read("Enter column names (comma-separated)>")?.unwrap_or_default();
        Ok(line
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect())
    }

    /// Build the rest of a form for the chosen `file` settings: columns, slots and their actions
    ///
    /// Columns are asked for when `columns` is `None`. Parameter values are
    /// requested later, while assembling.
    pub fn fill_session(&mut self, file: FileConfig, columns: Option<Vec<String>>) -> Result<FormSession> {
        let mut session = FormSession::new(file);
        let columns = match columns {
            Some(columns) => columns,
            None => self.columns()?,
        };
        session.set_columns(columns);

        if session.columns().is_empty() {
            return Ok(session);
        }
        println!("Number of columns detected: {}", session.columns().len());

        println!("{}", "Transformations".bright_cyan().bold());
        let count = self.count(
            "Number of Transformations",
            MIN_TRANSFORMATIONS as u64,
            MIN_TRANSFORMATIONS as u64,
            MAX_TRANSFORMATIONS as u64,
        )?;
        session.set_transformation_count(count as usize);

        let actions = schema::list_actions();
        let names: Vec<String> = actions.iter().map(|(_, name)| name.to_string()).collect();
        for (index, label) in session.slot_labels().into_iter().enumerate() {
            println!("{}", label.bold());
            let choice = self.choose("Action Type", &names, 0)?;
            session.set_action(index, actions[choice].0)?;
        }

        Ok(session)
    }
}

/// Column names from the header of `path`, read with the chosen `file` settings
///
/// A file that cannot be read is reported on stderr and yields `None`, so the
/// user can type the columns instead.
pub fn columns_from_header(path: &Path, file: &FileConfig) -> Option<Vec<String>> {
    match read_header(path, file) {
        Ok(columns) => Some(columns),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Column preview failed");
            eprintln!("{} {}", "Could not read columns:".red(), e);
            None
        }
    }
}

impl InputSource for Prompt {
    fn request(&mut self, request: &InputRequest<'_>) -> Option<ParamValue> {
        if !request.options.is_empty() {
            print_options(request.label, request.options);
        }
        let hint = match request.kind {
            ParamKind::MultiSelect => "numbers or names, comma-separated; Enter to skip",
            ParamKind::Select => "number or name; Enter to skip",
            ParamKind::Text | ParamKind::Number => "Enter to skip",
        };
        let line = match self.read(&format!("{} ({})>", request.label, hint)) {
            Ok(line) => line?,
            Err(e) => {
                warn!(key = %request.key, error = %e, "Failed to read input");
                return None;
            }
        };
        let value = parse_answer(request.kind, request.options, &line);
        debug!(key = %request.key, ?value, "Prompt answer");
        value
    }
}

/// Turn one typed line into a parameter value
///
/// Choices may be given by 1-based number or by name. Entries that match no
/// option are ignored. Blank input means the parameter is left unset.
pub fn parse_answer(kind: ParamKind, options: &[String], line: &str) -> Option<ParamValue> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match kind {
        ParamKind::MultiSelect => {
            let mut picked: Vec<String> = Vec::new();
            for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                match resolve(token, options) {
                    Some(index) if !picked.contains(&options[index]) => picked.push(options[index].clone()),
                    Some(_) => {}
                    None => warn!(token, "Ignoring unknown choice"),
                }
            }
            Some(ParamValue::List(picked))
        }
        ParamKind::Select => resolve(line, options).map(|index| ParamValue::Text(options[index].clone())),
        ParamKind::Text => Some(ParamValue::Text(line.to_string())),
        ParamKind::Number => parse_number(line).map(ParamValue::Number),
    }
}

/// Index of the option named or numbered by `token`
fn resolve(token: &str, options: &[String]) -> Option<usize> {
    if let Some(index) = options.iter().position(|o| o == token) {
        return Some(index);
    }
    match token.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
        _ => None,
    }
}

fn print_options(label: &str, options: &[String]) {
    println!("{}", label.bold());
    for (i, option) in options.iter().enumerate() {
        println!("  {} {}", format!("{:>2})", i + 1).yellow(), option);
    }
}

fn pick<T: Copy + PartialEq>(
    prompt: &mut Prompt,
    label: &str,
    choices: &[T],
    default: T,
    render: impl Fn(&T) -> String,
) -> Result<T> {
    let names: Vec<String> = choices.iter().map(render).collect();
    let default = choices.iter().position(|c| *c == default).unwrap_or(0);
    Ok(choices[prompt.choose(label, &names, default)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_columns_from_header_uses_chosen_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("data.csv");
        std::fs::write(&path, "# export 2024-05-01\nsku|qty,on hand|site\n").unwrap();

        let chosen = FileConfig {
            delimiter: Delimiter::Pipe,
            skip_rows: 1,
            ..Default::default()
        };
        assert_eq!(
            columns_from_header(&path, &chosen),
            Some(vec!["sku".to_string(), "qty,on hand".to_string(), "site".to_string()])
        );
    }

    #[test]
    fn test_columns_from_header_failure_falls_back() {
        let temp = tempfile::TempDir::new().unwrap();
        let chosen = FileConfig {
            file_type: FileType::Zip,
            ..Default::default()
        };
        assert_eq!(columns_from_header(&temp.path().join("data.zip"), &chosen), None);
        assert_eq!(columns_from_header(&temp.path().join("missing.csv"), &FileConfig::default()), None);
    }

    #[test]
    fn test_blank_answer_skips() {
        assert_eq!(parse_answer(ParamKind::Text, &[], "   "), None);
        assert_eq!(parse_answer(ParamKind::Select, &opts(&["a"]), ""), None);
    }

    #[test]
    fn test_multiselect_by_number_and_name() {
        let options = opts(&["id", "qty", "name"]);
        let value = parse_answer(ParamKind::MultiSelect, &options, "3, id, 3, bogus");
        assert_eq!(value, Some(ParamValue::from(vec!["name", "id"])));
    }

    #[test]
    fn test_multiselect_nothing_matched() {
        let value = parse_answer(ParamKind::MultiSelect, &opts(&["id"]), "zzz");
        assert_eq!(value, Some(ParamValue::List(vec![])));
    }

    #[test]
    fn test_select_prefers_name_over_number() {
        // A column literally named "2" wins over the second option
        let options = opts(&["1", "2", "x"]);
        assert_eq!(
            parse_answer(ParamKind::Select, &options, "2"),
            Some(ParamValue::from("2"))
        );
        assert_eq!(
            parse_answer(ParamKind::Select, &options, "3"),
            Some(ParamValue::from("x"))
        );
        assert_eq!(parse_answer(ParamKind::Select, &options, "4"), None);
    }

    #[test]
    fn test_text_and_number() {
        assert_eq!(
            parse_answer(ParamKind::Text, &[], " 18 "),
            Some(ParamValue::from("18"))
        );
        assert_eq!(
            parse_answer(ParamKind::Number, &[], "7"),
            Some(ParamValue::Number(7.into()))
        );
        assert_eq!(parse_answer(ParamKind::Number, &[], "seven"), None);
    }
}

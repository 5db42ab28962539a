//! CLI argument parsing for wmsconfig

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wmsconfig")]
#[command(author, version, about = "Build WMS file-parsing pipeline configurations", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the generated document goes
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the document to this path instead of the configured one
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available transformation actions
    Actions,

    /// Show the parameters of an action
    Describe {
        /// Action key (see `actions`)
        #[arg(required = true)]
        action: String,
    },

    /// Preview the column names in a CSV file's header row
    Columns {
        /// Data file to read
        #[arg(required = true)]
        file: PathBuf,

        /// Field delimiter (",", "|", ":", "tab")
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Rows to skip before the header
        #[arg(short, long)]
        skip_rows: Option<u64>,

        /// File encoding (utf-8, ascii, iso-8859-1)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Generate a configuration from an answers file
    Generate {
        /// YAML answers file
        #[arg(required = true)]
        answers: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fill in the form interactively
    Interactive {
        /// Take column names from this CSV file's header row
        #[arg(long)]
        header_from: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from(["wmsconfig", "-l", "debug", "generate", "form.yml", "--stdout"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Generate { answers, output } => {
                assert_eq!(answers, PathBuf::from("form.yml"));
                assert!(output.stdout);
                assert!(output.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result = Cli::try_parse_from(["wmsconfig", "generate", "form.yml", "--stdout", "-o", "x.json"]);
        assert!(result.is_err());
    }
}

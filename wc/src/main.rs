//! wmsconfig - WMS file-parsing configuration builder
//!
//! CLI entry point: list and describe actions, preview columns, and generate
//! configuration documents from an answers file or an interactive form.

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use wmsconfig::cli::{Cli, Command, OutputArgs};
use wmsconfig::columns::read_header;
use wmsconfig::config::Config;
use wmsconfig::form::{Assembly, FormAnswers, Prompt, columns_from_header};
use wmsconfig::schema::{self, ParamKind};
use wmsconfig::{Delimiter, FileConfig};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("wmsconfig starting");
    debug!(command = ?cli.command, "main: dispatching command");

    match cli.command {
        Command::Actions => cmd_actions(),
        Command::Describe { action } => cmd_describe(&action),
        Command::Columns {
            file,
            delimiter,
            skip_rows,
            encoding,
        } => {
            let mut settings = config.defaults.clone();
            if let Some(delimiter) = delimiter {
                settings.delimiter = delimiter.parse::<Delimiter>().map_err(|e| eyre::eyre!(e))?;
            }
            if let Some(skip_rows) = skip_rows {
                settings.skip_rows = skip_rows;
            }
            if let Some(encoding) = encoding {
                settings.encoding = encoding;
            }
            cmd_columns(&file, &settings)
        }
        Command::Generate { answers, output } => {
            let mut session = FormAnswers::load(&answers)?.into_session(&config.defaults)?;
            let assembly = session.assemble()?;
            emit(&assembly, &output, &config)
        }
        Command::Interactive { header_from, output } => {
            let mut prompt = Prompt::new()?;
            let file = prompt.file_config(&config.defaults)?;
            let columns = header_from
                .as_deref()
                .and_then(|path| columns_from_header(path, &file));
            let session = prompt.fill_session(file, columns)?;
            let assembly = session.assemble_with(&mut prompt)?;
            emit(&assembly, &output, &config)
        }
    }
}

fn cmd_actions() -> Result<()> {
    for (key, name) in schema::list_actions() {
        println!("{:<34} {}", key.cyan(), name);
    }
    Ok(())
}

fn cmd_describe(action: &str) -> Result<()> {
    let descriptor = schema::lookup(action)?;
    println!("{} ({})", descriptor.display_name.bold(), descriptor.key.cyan());
    for (name, param) in descriptor.parameters {
        let choices = match (param.kind, param.options) {
            (_, Some(options)) => options.join(", "),
            (ParamKind::MultiSelect | ParamKind::Select, None) => "<columns>".to_string(),
            (ParamKind::Text | ParamKind::Number, None) => String::new(),
        };
        println!(
            "  {:<14} {:<12} {:<26} {}",
            name.yellow(),
            param.kind.to_string(),
            param.label,
            choices.dimmed()
        );
    }
    Ok(())
}

fn cmd_columns(file: &Path, settings: &FileConfig) -> Result<()> {
    let columns = read_header(file, settings)?;
    println!("Number of columns detected: {}", columns.len());
    for column in columns {
        println!("{}", column);
    }
    Ok(())
}

fn emit(assembly: &Assembly, output: &OutputArgs, config: &Config) -> Result<()> {
    for warning in &assembly.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let json = assembly.document.to_json(config.output.pretty)?;
    if output.stdout {
        println!("{}", json);
        return Ok(());
    }

    let path = output.output.as_ref().unwrap_or(&config.output.path);
    fs::write(path, format!("{}\n", json)).context(format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote configuration");
    println!(
        "{} Wrote {} transformation(s) to {}",
        "✓".green(),
        assembly.document.transformations().len(),
        path.display().to_string().cyan()
    );
    Ok(())
}

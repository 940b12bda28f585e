use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;

use metaobj_core::{InspectError, ObjectReport, Report};

#[derive(Parser, Debug)]
#[command(name = "metaobj")]
#[command(version)]
#[command(
    about = "Inspector for exported PKCS#11 meta-object records.",
    long_about = None,
    after_help = "Examples:\n  metaobj inspect opaque.bin\n  metaobj inspect opaque.bin --json --pretty\n  metaobj inspect opaque.bin -o report.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an exported meta-object and print its fields.
    #[command(
        after_help = "The opaque export is obtained with:\n  yubihsm-shell -a get-opaque -i <META_OBJECT ID> --out opaque.bin --outformat=binary\n\nExamples:\n  metaobj inspect opaque.bin\n  metaobj inspect opaque.bin --json --pretty\n  metaobj inspect opaque.bin -o report.json"
    )]
    Inspect {
        /// Path to an opaque export file
        input: PathBuf,

        /// Write the JSON report to stdout instead of the human listing
        #[arg(long, conflicts_with = "report")]
        json: bool,

        /// Output report path (JSON)
        #[arg(short = 'o', long)]
        report: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect {
            input,
            json,
            report,
            pretty,
            compact,
            quiet,
        } => cmd_inspect(input, json, report, pretty, compact, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

impl From<InspectError> for CliError {
    fn from(err: InspectError) -> Self {
        let hint = match &err {
            InspectError::Source(_) => "does the input file exist?".to_string(),
            InspectError::Decode(_) => {
                "is this really a meta-object export? (yubihsm-shell -a get-opaque --outformat=binary)"
                    .to_string()
            }
        };
        CliError::new(err.to_string(), Some(hint))
    }
}

fn cmd_inspect(
    input: PathBuf,
    json: bool,
    report: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if (pretty || compact) && !json && report.is_none() {
        return Err(CliError::new(
            "--pretty/--compact only apply to JSON output",
            Some("add --json or -o/--report".to_string()),
        ));
    }

    let resolved_input = resolve_input_path(&input)?;
    let input_abs = fs::canonicalize(&resolved_input).map_err(|_| {
        CliError::new(
            format!("input file not found: {}", resolved_input.display()),
            Some("does it exist?".to_string()),
        )
    })?;

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the opaque export written by yubihsm-shell".to_string()),
        ));
    }

    if let Some(report_path) = report.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let rep = metaobj_core::inspect_opaque_file(&resolved_input)?;

    if json {
        print!("{}", serialize_report(&rep, pretty, compact)?);
        return Ok(());
    }

    if let Some(report_path) = report {
        let body = serialize_report(&rep, pretty, compact)?;
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&report_path, body)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        if !quiet {
            eprintln!("OK: report written -> {}", report_path.display());
        }
        return Ok(());
    }

    if !quiet {
        print_object(&rep.object);
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_object(object: &ObjectReport) {
    if !object.has_target {
        println!("No target original object is found. Is this really a meta object?");
        return;
    }
    println!("   Original Object ID: 0x{:02x}", object.target_id);
    println!("   Original Object Type: {}", object.target_type);
    println!("   Original Object Sequence: {}", object.target_sequence);
    for attribute in &object.attributes {
        println!("   {} len: {}", attribute.name, attribute.len);
        if let Some(hex) = &attribute.hex {
            println!("   {}: {}", attribute.name, hex);
        }
    }
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single export file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use heartwire_core::{ParsedMeasurement, Report, decode_source, parse_hex_payload};
use serde::Serialize;

mod logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HEARTWIRE_BUILD_COMMIT"),
    " ",
    env!("HEARTWIRE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  heartwire decode 104b00010002\n  heartwire log analyse session.hexlog -o report.json\n  heartwire log analyze session.hexlog --stdout --pretty";

#[derive(Parser, Debug)]
#[command(name = "heartwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Bluetooth Heart Rate Measurement (0x2A37) notifications.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode characteristic values given as hex ("-" for an absent value).
    Decode {
        /// Hex payloads, e.g. 104b0001 or 0x10:4b:00:01
        #[arg(required = true, allow_hyphen_values = true)]
        payloads: Vec<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Exit with a non-zero code if any payload is malformed
        #[arg(long)]
        strict: bool,
    },
    /// Operations on notification logs (one hex value per line).
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Analyse a notification log and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(after_help = EXAMPLES)]
    Analyse(AnalyseArgs),
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Path to a .hexlog or .txt notification log
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if malformed notifications are present
    #[arg(long)]
    strict: bool,

    /// List decode issues after analysis
    #[arg(long)]
    list_issues: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let result = match cli.command {
        Commands::Decode {
            payloads,
            pretty,
            strict,
        } => cmd_decode(&payloads, pretty, strict),
        Commands::Log { command } => match command {
            LogCommands::Analyse(args) => cmd_log_analyse(args),
        },
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
        CliError::new(format!("{err:#}"), None)
    }
}

/// Per-payload result of `heartwire decode`.
#[derive(Debug, Serialize)]
struct DecodeOutput {
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement: Option<ParsedMeasurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_decode(payloads: &[String], pretty: bool, strict: bool) -> Result<(), CliError> {
    let mut outputs = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let value = parse_hex_payload(payload).map_err(|err| {
            CliError::new(
                err.to_string(),
                Some("payloads are hex bytes, e.g. 104b0001, or - for no value".to_string()),
            )
        })?;
        let output = match decode_source(&value) {
            Ok(measurement) => DecodeOutput {
                payload: payload.clone(),
                measurement,
                error: None,
            },
            Err(err) => {
                tracing::warn!(payload = %payload, error = %err, "malformed payload");
                DecodeOutput {
                    payload: payload.clone(),
                    measurement: None,
                    error: Some(err.to_string()),
                }
            }
        };
        outputs.push(output);
    }

    let json = to_json(&outputs, pretty)?;
    println!("{}", json);

    if strict && outputs.iter().any(|output| output.error.is_some()) {
        return Err(CliError::new(
            "malformed payloads detected",
            Some("inspect the \"error\" entries in the output".to_string()),
        ));
    }
    Ok(())
}

fn cmd_log_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    if args.pretty && args.compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }

    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_from_input(&path, &input_abs)?;
        Some(path)
    };

    tracing::info!(input = %resolved_input.display(), "analysing notification log");
    let rep = heartwire_core::analyze_hexlog_file(&resolved_input)
        .context("Notification log analysis failed")?;
    let json = to_json(&rep, args.pretty)?;

    match report_path {
        None => print!("{}", json),
        Some(report_path) => {
            if let Some(parent) = report_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report_path, json)
                .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", report_path.display());
            }
        }
    }

    if args.list_issues && !args.quiet {
        print_issues(&rep);
    }
    if args.strict && has_issues(&rep) {
        return Err(CliError::new(
            "malformed notifications detected",
            Some("use --list-issues to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_from_input(report_path: &PathBuf, input_abs: &PathBuf) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    // A missing output directory is created later, so it cannot alias the input.
    let Ok(report_dir) = fs::canonicalize(&parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if &report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn has_issues(rep: &Report) -> bool {
    !rep.issues.is_empty()
}

fn print_issues(rep: &Report) {
    eprintln!("Decode issues:");
    for issue in &rep.issues {
        eprintln!("  {} {} ({})", issue.field, issue.id, issue.count);
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .hexlog or .txt notification log".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .hexlog or .txt notification log".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "hexlog" && ext != "txt" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .hexlog or .txt file".to_string()),
        ));
    }
    Ok(())
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
            Some("check the path or quote the pattern; expected .hexlog or .txt".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single log file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

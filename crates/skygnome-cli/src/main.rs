use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use skygnome_core::{
    DecodedEvent, Decoder, LINE_SETTINGS, SessionSummary, SourceError, StopReason, listen,
    open_device,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SKYGNOME_LOG";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SKYGNOME_BUILD_COMMIT"),
    " ",
    env!("SKYGNOME_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "skygnome")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for the Sky set-top box serial status protocol.",
    long_about = None,
    after_help = "Examples:\n  skygnome decode capture.bin -o events.jsonl\n  skygnome decode capture.bin --stdout --pretty\n  skygnome listen /dev/ttyUSB0 --limit 10\n\nLogging is controlled by SKYGNOME_LOG (default: warn)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw byte capture into one JSON document per packet.
    #[command(
        after_help = "Examples:\n  skygnome decode capture.bin -o events.jsonl\n  skygnome decode 'captures/*.bin' --stdout --limit 5"
    )]
    Decode {
        /// Path (or single-match glob pattern) of a raw capture file
        input: PathBuf,

        /// Output path (JSON lines)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write events to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print each event
        #[arg(long)]
        pretty: bool,

        /// Stop after this many events
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Print decoder statistics to stderr when done
        #[arg(long)]
        stats: bool,
    },
    /// Listen on a serial device node and print events as they arrive.
    #[command(after_help = line_settings_help())]
    Listen {
        /// Device node, already configured for the box's line settings
        device: PathBuf,

        /// Stop after this many events
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Pretty-print each event
        #[arg(long)]
        pretty: bool,

        /// Print decoder statistics to stderr when done
        #[arg(long)]
        stats: bool,
    },
}

fn line_settings_help() -> String {
    format!(
        "The device must already be configured for {LINE_SETTINGS}, e.g.\n  stty -F /dev/ttyUSB0 {} cs{} -cstopb -parenb raw\n\nExamples:\n  skygnome listen /dev/ttyUSB0\n  skygnome listen /dev/ttyUSB0 --limit 1 --pretty",
        LINE_SETTINGS.baud_rate, LINE_SETTINGS.data_bits
    )
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            stdout,
            pretty,
            limit,
            quiet,
            stats,
        } => cmd_decode(input, output, stdout, pretty, limit, quiet, stats),
        Commands::Listen {
            device,
            limit,
            pretty,
            stats,
        } => cmd_listen(device, limit, pretty, stats),
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
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
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    limit: Option<usize>,
    quiet: bool,
    stats: bool,
) -> Result<(), CliError> {
    validate_limit(limit)?;
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    if stdout {
        let out = io::stdout().lock();
        let (summary, written) = run_session(&resolved_input, out, pretty, limit)?;
        return finish_session(&resolved_input, summary, written, stats);
    }

    let output = output.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--output or --stdout".to_string()),
        )
    })?;
    ensure_distinct_output(&resolved_input, &output)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    let (summary, written) = run_session(&resolved_input, BufWriter::new(file), pretty, limit)?;
    finish_session(&resolved_input, summary, written, stats)?;
    if !quiet {
        eprintln!("OK: {} events written -> {}", written, output.display());
    }
    Ok(())
}

fn cmd_listen(
    device: PathBuf,
    limit: Option<usize>,
    pretty: bool,
    stats: bool,
) -> Result<(), CliError> {
    validate_limit(limit)?;
    let out = io::stdout().lock();
    let (summary, written) = run_session(&device, out, pretty, limit)?;
    finish_session(&device, summary, written, stats)
}

/// Decode everything `path` yields, writing one document per event.
///
/// Returns the session summary and the number of events written. Open and
/// read failures of the source become the command's error.
fn run_session<W: Write>(
    path: &Path,
    mut out: W,
    pretty: bool,
    limit: Option<usize>,
) -> Result<(SessionSummary, usize), CliError> {
    let mut decoder = Decoder::new();
    let mut written = 0usize;
    let mut write_error: Option<anyhow::Error> = None;
    let mut source_error: Option<SourceError> = None;

    let summary = listen(
        || open_device(path),
        &mut decoder,
        |result| {
            let event = match result {
                Ok(event) => event,
                Err(err) => {
                    source_error = Some(err);
                    return ControlFlow::Break(());
                }
            };
            if let Err(err) = write_event(&mut out, &event, pretty) {
                write_error = Some(err);
                return ControlFlow::Break(());
            }
            written += 1;
            match limit {
                Some(limit) if written >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        },
    );

    if let Some(err) = write_error {
        return Err(err.into());
    }
    out.flush().context("Failed to flush output")?;
    if let Some(err) = source_error {
        return Err(source_error_to_cli(path, summary.reason, err));
    }
    Ok((summary, written))
}

fn write_event<W: Write>(out: &mut W, event: &DecodedEvent, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(event)
    } else {
        serde_json::to_string(event)
    }
    .context("JSON serialization failed")?;
    writeln!(out, "{}", json).context("Failed to write event")?;
    // keep a live listener's output visible as packets arrive
    out.flush().context("Failed to flush output")?;
    Ok(())
}

fn source_error_to_cli(path: &Path, reason: StopReason, err: SourceError) -> CliError {
    match reason {
        StopReason::OpenFailed => CliError::new(
            err.to_string(),
            Some(format!(
                "check that {} exists and is readable",
                path.display()
            )),
        ),
        _ => CliError::new(
            format!("reading {} failed: {}", path.display(), err),
            Some(format!("the link expects {}", LINE_SETTINGS)),
        ),
    }
}

/// Statistics line printed by `--stats`.
#[derive(Debug, Serialize)]
struct StatsReport {
    input: String,
    events_written: usize,
    #[serde(flatten)]
    summary: SessionSummary,
}

fn finish_session(
    path: &Path,
    summary: SessionSummary,
    written: usize,
    stats: bool,
) -> Result<(), CliError> {
    debug!(path = %path.display(), reason = ?summary.reason, written, "session ended");
    if stats {
        let report = StatsReport {
            input: path.display().to_string(),
            events_written: written,
            summary,
        };
        let json = serde_json::to_string(&report).context("JSON serialization failed")?;
        eprintln!("{}", json);
    }
    Ok(())
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent).ok(),
        _ => fs::canonicalize(".").ok(),
    };
    let Some(output_dir) = output_dir else {
        // directory does not exist yet, so it cannot contain the input
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_limit(limit: Option<usize>) -> Result<(), CliError> {
    if limit == Some(0) {
        return Err(CliError::new(
            "--limit must be at least 1",
            Some("omit --limit to decode until the input ends".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw capture of the serial link".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use `skygnome listen` for device nodes".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
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

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, count, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

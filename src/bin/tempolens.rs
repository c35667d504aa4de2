//! Tempolens CLI - Command-line interface for the analytics engine
//!
//! Commands:
//! - score: Score raw observations (batch mode)
//! - patterns: Produce a pattern report over an observation stream
//! - insights: Produce an insight report over an observation stream

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tempolens::insights::UserPreferences;
use tempolens::{
    AnalysisOrchestrator, AnalyticsError, Observation, WindowSelector, ENGINE_VERSION,
    PRODUCER_NAME,
};

/// Tempolens - Activity pattern and productivity analytics engine
#[derive(Parser)]
#[command(name = "tempolens")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Turn activity observations into scores, patterns, and insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score raw observations (batch mode)
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format (defaults to pretty JSON on a TTY, NDJSON otherwise)
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// Produce a pattern report over an observation stream
    Patterns {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format (defaults to pretty JSON on a TTY, JSON otherwise)
        #[arg(long)]
        output_format: Option<OutputFormat>,

        /// Only analyze the most recent N observations
        #[arg(long)]
        last: Option<usize>,
    },

    /// Produce an insight report over an observation stream
    Insights {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format (defaults to pretty JSON on a TTY, JSON otherwise)
        #[arg(long)]
        output_format: Option<OutputFormat>,

        /// Preferences file with goals (JSON)
        #[arg(long)]
        preferences: Option<PathBuf>,

        /// Only analyze the most recent N observations
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one observation per line)
    Ndjson,
    /// JSON array of observations
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TempolensCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            output_format,
        } => cmd_score(&input, &output, input_format, output_format),

        Commands::Patterns {
            input,
            output,
            input_format,
            output_format,
            last,
        } => cmd_patterns(&input, &output, input_format, output_format, last),

        Commands::Insights {
            input,
            output,
            input_format,
            output_format,
            preferences,
            last,
        } => cmd_insights(
            &input,
            &output,
            input_format,
            output_format,
            preferences.as_deref(),
            last,
        ),
    }
}

fn cmd_score(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: Option<OutputFormat>,
) -> Result<(), TempolensCliError> {
    let observations = read_observations(input, input_format)?;
    let orchestrator = AnalysisOrchestrator::with_defaults()?;

    let mut scored = Vec::with_capacity(observations.len());
    for observation in observations {
        scored.push(orchestrator.record_observation(observation)?);
    }

    let format = output_format.unwrap_or_else(|| default_format(OutputFormat::Ndjson));
    write_output(output, &format_records(&scored, format)?)
}

fn cmd_patterns(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: Option<OutputFormat>,
    last: Option<usize>,
) -> Result<(), TempolensCliError> {
    let orchestrator = record_all(input, input_format)?;
    let report = orchestrator.analyze_patterns(selector(last))?;

    let envelope = Envelope {
        producer: PRODUCER_NAME,
        version: ENGINE_VERSION,
        report,
    };
    let format = output_format.unwrap_or_else(|| default_format(OutputFormat::Json));
    write_output(output, &format_value(&envelope, format)?)
}

fn cmd_insights(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: Option<OutputFormat>,
    preferences: Option<&Path>,
    last: Option<usize>,
) -> Result<(), TempolensCliError> {
    let prefs = match preferences {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => UserPreferences::default(),
    };

    let orchestrator = record_all(input, input_format)?;
    let report = orchestrator.generate_insights(selector(last), &prefs)?;

    let envelope = Envelope {
        producer: PRODUCER_NAME,
        version: ENGINE_VERSION,
        report,
    };
    let format = output_format.unwrap_or_else(|| default_format(OutputFormat::Json));
    write_output(output, &format_value(&envelope, format)?)
}

// Helper functions

fn selector(last: Option<usize>) -> WindowSelector {
    match last {
        Some(n) => WindowSelector::LastN(n),
        None => WindowSelector::All,
    }
}

fn record_all(
    input: &Path,
    input_format: InputFormat,
) -> Result<AnalysisOrchestrator, TempolensCliError> {
    let observations = read_observations(input, input_format)?;
    let orchestrator = AnalysisOrchestrator::with_defaults()?;
    for observation in observations {
        orchestrator.record_observation(observation)?;
    }
    Ok(orchestrator)
}

fn read_observations(
    input: &Path,
    input_format: InputFormat,
) -> Result<Vec<Observation>, TempolensCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let observations = match input_format {
        InputFormat::Ndjson => input_data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<Observation>, _>>()?,
        InputFormat::Json => serde_json::from_str(&input_data)?,
    };

    if observations.is_empty() {
        return Err(TempolensCliError::NoObservations);
    }
    Ok(observations)
}

/// Pretty JSON when writing to an interactive terminal, the given format
/// otherwise.
fn default_format(piped: OutputFormat) -> OutputFormat {
    if atty::is(atty::Stream::Stdout) {
        OutputFormat::JsonPretty
    } else {
        piped
    }
}

fn format_records<T: serde::Serialize>(
    records: &[T],
    format: OutputFormat,
) -> Result<String, TempolensCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::with_capacity(records.len());
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn format_value<T: serde::Serialize>(
    value: &T,
    format: OutputFormat,
) -> Result<String, TempolensCliError> {
    match format {
        OutputFormat::Ndjson | OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), TempolensCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
        Ok(())
    } else {
        fs::write(output, data)?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct Envelope<T> {
    producer: &'static str,
    version: &'static str,
    report: T,
}

// Error types

#[derive(Debug)]
enum TempolensCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Engine(AnalyticsError),
    NoObservations,
}

impl From<io::Error> for TempolensCliError {
    fn from(e: io::Error) -> Self {
        TempolensCliError::Io(e)
    }
}

impl From<serde_json::Error> for TempolensCliError {
    fn from(e: serde_json::Error) -> Self {
        TempolensCliError::Json(e)
    }
}

impl From<AnalyticsError> for TempolensCliError {
    fn from(e: AnalyticsError) -> Self {
        TempolensCliError::Engine(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TempolensCliError> for CliError {
    fn from(e: TempolensCliError) -> Self {
        match e {
            TempolensCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TempolensCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check that each observation is valid JSON".to_string()),
            },
            TempolensCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Observations must be sorted by timestamp".to_string()),
            },
            TempolensCliError::NoObservations => CliError {
                code: "NO_OBSERVATIONS".to_string(),
                message: "No observations found in input".to_string(),
                hint: Some("Ensure the input file is not empty".to_string()),
            },
        }
    }
}

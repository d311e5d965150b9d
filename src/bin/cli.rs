use clap::{Args, Parser, Subcommand, ValueEnum};
use construction_schedule::{
    LabelScheduleOptions, PersistenceError, RequestError, ScheduleRequest, Task,
    build_label_schedule, calendar::parse_input_date, load_classified_objects,
    load_label_sequences, logging, render_text_table, summarize, tasks_to_dataframe,
    write_tasks_csv, write_tasks_json,
};
use polars::prelude::PolarsError;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("No parameters provided (pass a JSON payload or --input <file>)")]
    MissingParams,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("report error: {0}")]
    Report(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "cli", version, about = "Construction schedule generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a schedule from a JSON parameter payload.
    Generate(GenerateArgs),
    /// Build a schedule from classified object labels.
    Labels(LabelsArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print a one-line summary to stderr.
    #[arg(long)]
    summary: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON payload, e.g. '{"projectStartDate": "2024-01-01", ...}'.
    #[arg(value_name = "PARAMS_JSON", conflicts_with = "input")]
    params: Option<String>,

    /// Read the JSON payload from a file.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct LabelsArgs {
    /// Label code to description/sequence mapping (JSON object).
    #[arg(long, value_name = "FILE")]
    mapping: PathBuf,

    /// Classified objects (JSON array of objects with a `label`).
    #[arg(long, value_name = "FILE")]
    classifications: PathBuf,

    #[arg(long, default_value = "2024-01-01", value_name = "YYYY-MM-DD")]
    start: String,

    #[arg(long, default_value_t = construction_schedule::labels::DEFAULT_DAYS_PER_SEQUENCE)]
    days_per_sequence: i64,

    #[command(flatten)]
    output: OutputArgs,
}

fn run_generate(args: &GenerateArgs) -> Result<Vec<Task>, CliError> {
    let payload = match (&args.params, &args.input) {
        (Some(params), _) => params.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Err(CliError::MissingParams),
    };
    let request = ScheduleRequest::from_json(&payload)?;
    Ok(request.generate()?)
}

fn run_labels(args: &LabelsArgs) -> Result<Vec<Task>, CliError> {
    let base_date =
        parse_input_date(&args.start).ok_or_else(|| CliError::InvalidDate(args.start.clone()))?;
    let sequences = load_label_sequences(&args.mapping)?;
    let objects = load_classified_objects(&args.classifications)?;
    let options = LabelScheduleOptions {
        base_date,
        days_per_sequence: args.days_per_sequence,
    };
    Ok(build_label_schedule(&sequences, &objects, &options))
}

fn render(tasks: &[Task], format: OutputFormat) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Json => {
            write_tasks_json(tasks, &mut buf)?;
            buf.push(b'\n');
        }
        OutputFormat::Csv => write_tasks_csv(tasks, &mut buf)?,
        OutputFormat::Table => {
            let df = tasks_to_dataframe(tasks)?;
            buf.extend_from_slice(render_text_table(&df).as_bytes());
        }
    }
    Ok(buf)
}

// Output is rendered in full before anything is written.
fn emit(tasks: &[Task], args: &OutputArgs) -> Result<(), CliError> {
    let rendered = render(tasks, args.format)?;
    match &args.output {
        Some(path) => fs::write(path, rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }
    if args.summary {
        eprintln!("{}", summarize(tasks).to_cli_summary());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Generate(args) => emit(&run_generate(args)?, &args.output),
        Command::Labels(args) => emit(&run_labels(args)?, &args.output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging("warn") {
        eprintln!("Warning: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use asbuilt_tools::{ProcessorConfig, Result, ToolError, process, validate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_file.as_deref())?;
    match cli.command {
        Command::Process(args) => execute_process(args),
        Command::Validate(args) => execute_validate(args),
    }
}

fn execute_process(args: ProcessArgs) -> Result<()> {
    let config = args.location.resolve()?;
    let summary = process::run(&config)?;
    let results = &summary.results;
    println!(
        "Copied {} file(s) for {} reference(s); {} without matches, {} missing file(s), {} copy error(s).",
        results.copied.len(),
        results.total_references(),
        results.no_matches.len(),
        results.missing_files.len(),
        results.copy_errors.len(),
    );
    println!("Report: {}", summary.report_path.display());
    Ok(())
}

fn execute_validate(args: ValidateArgs) -> Result<()> {
    let config = args.location.resolve()?;
    let report = validate::run(&config, args.sample)?;
    print!("{report}");
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let outcome = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    outcome.map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Match unit references to architect drawings and file them by house or flat type."
)]
struct Cli {
    /// Write log output to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match, copy and rename drawings, then write the processing report.
    Process(ProcessArgs),
    /// Inspect the input spreadsheets and try the matcher without copying.
    Validate(ValidateArgs),
}

#[derive(clap::Args)]
struct LocationArgs {
    /// Project directory holding the spreadsheet, architect and processed folders.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// JSON configuration overriding paths and column bindings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ProcessArgs {
    #[command(flatten)]
    location: LocationArgs,
}

#[derive(clap::Args)]
struct ValidateArgs {
    #[command(flatten)]
    location: LocationArgs,

    /// Number of references and drawing files to sample.
    #[arg(long, default_value_t = 10)]
    sample: usize,
}

impl LocationArgs {
    fn resolve(&self) -> Result<ProcessorConfig> {
        let config = match &self.config {
            Some(path) => ProcessorConfig::load(path)?,
            None => ProcessorConfig::default(),
        };
        let config = match &self.base_dir {
            Some(base_dir) => config.with_base_dir(base_dir),
            None => config,
        };
        config.validate()?;
        Ok(config)
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bloodwork::write_output;
use bloodwork_core::{clean_csv, FormatterConfig, PipelineStages, RenderMode, ReportProcessor};

#[derive(Parser)]
#[command(name = "bloodwork")]
#[command(about = "Turns lab report text dumps into short readable summaries")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format a lab report text dump
    Format {
        /// Path to the report text file
        input: PathBuf,

        /// Output format: standard, detailed, compact or structured (alias: json)
        #[arg(short = 'f', long, default_value = "standard")]
        format: String,

        /// Path to custom config file (YAML format, see configs/catalog.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,

        /// Print the parse tree and filtered data as JSON to stderr
        #[arg(long)]
        dump_stages: bool,
    },

    /// Clean a knowledge-base CSV export (Sources, Tiroirs or Questions)
    CleanCsv {
        /// Path to the CSV export
        input: PathBuf,

        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();

    let (label, outcome) = match args.command {
        Command::Format {
            input,
            format,
            config,
            output,
            verbose,
            dump_stages,
        } => {
            init_tracing(verbose);
            let outcome = run_format(&input, &format, config.as_deref(), output.as_deref(), dump_stages);
            ("Formatting", outcome)
        }
        Command::CleanCsv {
            input,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            ("CSV cleaning", run_clean_csv(&input, output.as_deref()))
        }
    };

    if let Err(e) = outcome {
        eprintln!("❌ {label} failed: {e:#}");
        std::process::exit(1);
    }
}

fn run_format(
    input: &Path,
    format: &str,
    config_path: Option<&Path>,
    output: Option<&Path>,
    dump_stages: bool,
) -> Result<()> {
    let mode: RenderMode = format.parse()?;

    let config = FormatterConfig::load_with_fallback(config_path);
    match config_path {
        Some(path) => tracing::info!("📋 Loaded config from: {}", path.display()),
        None => tracing::info!("📋 Using default config"),
    }
    let processor = ReportProcessor::new(config);

    if dump_stages {
        let text = std::fs::read_to_string(input)
            .with_context(|| format!("failed to read input {}", input.display()))?;
        dump(&processor.capture_stages(&text))?;
    }

    let rendered = processor.process_file(input, mode)?;
    write_output(&rendered, output)
}

fn dump(stages: &PipelineStages) -> Result<()> {
    eprintln!("🔬 Pipeline stages");
    eprintln!("{}", serde_json::to_string_pretty(stages)?);
    Ok(())
}

fn run_clean_csv(input: &Path, output: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input {}", input.display()))?;
    let cleaned = clean_csv(&text)?;

    eprintln!("✅ {} export cleaned", cleaned.kind);
    eprintln!(
        "📊 Columns: {} -> {} ({})",
        cleaned.stats.original_columns,
        cleaned.stats.cleaned_columns,
        cleaned.stats.columns_kept.join(", ")
    );
    eprintln!("📊 Rows: {}", cleaned.stats.rows);

    write_output(&cleaned.csv, output)
}

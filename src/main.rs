//! fieldfill command-line interface.
//!
//! `fill` completes the academic-field column of a CSV file; `add` appends a
//! manually labeled entry to the cleaned file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fieldfill::{
    append_entry, fill_records, labeled_entry, read_records, write_cleaned, write_staged,
    FieldFillConfig, FillLevel, ReferenceFile, ReferenceSource,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fieldfill", version, about = "Fill missing academic-field labels")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long = "json-logs", global = true, action = ArgAction::SetTrue)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill missing labels in a CSV file.
    Fill {
        input: PathBuf,
        /// Highest tier to run: 1 keyword, 2 fuzzy, 3 reference.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        level: Option<u8>,
        /// Also write the staged file with every intermediate column.
        #[arg(long, action = ArgAction::SetTrue)]
        debug: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long)]
        staged: Option<PathBuf>,
        #[arg(long)]
        reference: Option<PathBuf>,
    },
    /// Append a labeled entry to the cleaned file.
    Add {
        field_of_study: String,
        academic_field: String,
        #[arg(long)]
        level: Option<String>,
        #[arg(long = "level-name")]
        level_name: Option<String>,
        #[arg(long, default_value = "csv/cleaned/cleaned_field_of_study.csv")]
        file: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Fill {
            input,
            level,
            debug,
            config,
            output,
            report,
            staged,
            reference,
        } => {
            let mut cfg = match &config {
                Some(path) => FieldFillConfig::from_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => FieldFillConfig::default(),
            };
            if let Some(path) = output {
                cfg.output.cleaned = path;
            }
            if let Some(path) = report {
                cfg.output.report = path;
            }
            if let Some(path) = staged {
                cfg.output.staged = path;
            }
            if let Some(path) = reference {
                cfg.reference.path = path;
            }
            let level = level.map(FillLevel::try_from).transpose()?;
            run_fill(&input, &cfg, level, debug)
        }
        Commands::Add {
            field_of_study,
            academic_field,
            level,
            level_name,
            file,
        } => {
            let entry = labeled_entry(
                &field_of_study,
                &academic_field,
                level.as_deref(),
                level_name.as_deref(),
            );
            let added = append_entry(&file, entry)
                .with_context(|| format!("updating {}", file.display()))?;
            if added {
                println!("Added entry to {}", file.display());
            } else {
                println!("Entry already present in {}", file.display());
            }
            Ok(())
        }
    }
}

fn run_fill(
    input: &Path,
    cfg: &FieldFillConfig,
    level: Option<FillLevel>,
    debug: bool,
) -> Result<()> {
    let options = cfg.fill_options(level);
    let records =
        read_records(input).with_context(|| format!("reading {}", input.display()))?;

    let reference_file = ReferenceFile::new(&cfg.reference.path);
    let reference = (options.level >= FillLevel::Reference)
        .then_some(&reference_file as &dyn ReferenceSource);

    let outcome = fill_records(&records, &options, reference)?;

    write_cleaned(&cfg.output.cleaned, &outcome.records)
        .with_context(|| format!("writing {}", cfg.output.cleaned.display()))?;
    if debug {
        write_staged(&cfg.output.staged, &outcome.records)
            .with_context(|| format!("writing {}", cfg.output.staged.display()))?;
    }

    let text = outcome.report.to_string();
    write_report(&cfg.output.report, &text)
        .with_context(|| format!("writing {}", cfg.output.report.display()))?;
    info!(
        path = %cfg.output.report.display(),
        report = %serde_json::to_string(&outcome.report)?,
        "report_written"
    );
    println!("{text}");
    Ok(())
}

fn write_report(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{text}\n"))
}

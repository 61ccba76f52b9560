//! Kessan CLI binary.
//!
//! Screens a directory of statement feeds from the command line.

mod config;
mod logging;
mod pipeline;

use clap::{Parser, Subcommand, ValueEnum};
use config::Settings;
use kessan::{ScreenCriteria, Screener};
use kessan_output::{ExportFormat, Exporter};
use kessan_rules::{RuleConfig, available_rules};
use logging::{LogFormat, init_logging};
use pipeline::ingest;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "kessan")]
#[command(about = "Kessan: fundamentals screener over annual statements", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directives; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScreenFormat {
    /// Qualifying codes, one per line
    Text,
    /// Verdict table
    Table,
    /// JSON export
    Json,
    /// CSV export
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InspectFormat {
    /// Plain-text report
    Text,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen every company in the data directory
    Screen {
        /// Directory holding the feed files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Qualification criteria (safe-and-growing, safe or growing)
        #[arg(long, default_value_t = ScreenCriteria::SafeAndGrowing)]
        criteria: ScreenCriteria,

        /// Output format
        #[arg(long, value_enum, default_value_t = ScreenFormat::Text)]
        format: ScreenFormat,

        /// Write the result to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Explain the verdicts for one company
    Inspect {
        /// Company code
        code: String,

        /// Directory holding the feed files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = InspectFormat::Text)]
        format: InspectFormat,
    },

    /// List the rules and the thresholds in effect
    Rules,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Screen {
            data_dir,
            criteria,
            format,
            output,
        } => {
            screen(&settings, data_dir, criteria, format, output)?;
        }
        Commands::Inspect {
            code,
            data_dir,
            format,
        } => {
            inspect(&settings, &code, data_dir, format)?;
        }
        Commands::Rules => {
            list_rules(&settings.rules)?;
        }
    }

    Ok(())
}

fn screen(
    settings: &Settings,
    data_dir: Option<PathBuf>,
    criteria: ScreenCriteria,
    format: ScreenFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = settings.resolve_data_dir(data_dir);
    let ingested = ingest(&dir, settings.loader.clone())?;

    let result = Screener::new(settings.rules.clone()).screen(&ingested.snapshot, criteria);
    let export = result.to_export();

    let rendered = match format {
        ScreenFormat::Text => {
            let mut text = result.candidates.join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            text
        }
        ScreenFormat::Table => export.to_ascii_table(),
        ScreenFormat::Json => export.export_to_string(ExportFormat::PrettyJson)?,
        ScreenFormat::Csv => export.export_to_string(ExportFormat::Csv)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            tracing::info!(path = %path.display(), "wrote screen result");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn inspect(
    settings: &Settings,
    code: &str,
    data_dir: Option<PathBuf>,
    format: InspectFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = settings.resolve_data_dir(data_dir);
    let ingested = ingest(&dir, settings.loader.clone())?;

    let skipped: Vec<_> = ingested
        .reports
        .iter()
        .flat_map(|r| r.skipped.iter().map(move |s| (r.feed, s)))
        .filter(|(_, s)| s.code == code)
        .collect();

    let diagnosis = Screener::new(settings.rules.clone())
        .inspect(&ingested.snapshot, code)
        .ok_or_else(|| format!("company not found: {code}"))?;
    let report = diagnosis.report();

    match format {
        InspectFormat::Text => {
            print!("{}", report.to_ascii_table());
            if !skipped.is_empty() {
                println!("\nSkipped rows:");
                for (feed, row) in &skipped {
                    println!(
                        "  {feed} line {}: {} = {:?} ({:?})",
                        row.line, row.field, row.value, row.reason
                    );
                }
            }
        }
        InspectFormat::Markdown => print!("{}", report.to_markdown()),
        InspectFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

fn list_rules(config: &RuleConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{:<24} {:<8} {:<14} Description", "Rule", "Set", "Category");
    println!("{}", "=".repeat(100));
    for rule in available_rules() {
        println!(
            "{:<24} {:<8} {:<14} {}",
            rule.name,
            format!("{:?}", rule.set),
            format!("{:?}", rule.category),
            rule.description
        );
    }

    println!("\nThresholds in effect:");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

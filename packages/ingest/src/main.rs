#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the weekly quality report ingestion tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dsp_quality_ingest::{IngestConfig, IngestContext, ingest_file};
use dsp_quality_models::{ReportCategory, ReportPeriod};
use dsp_quality_store::{FileRepository, Repository as _, available_periods, load_history, week_key};

#[derive(Parser)]
#[command(name = "dsp_quality_ingest", about = "Weekly quality report ingestion tool")]
struct Cli {
    /// Path to a TOML config file (overrides `DSP_QUALITY_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a report file and store the result under its week
    Ingest {
        /// Report file (PDF, Excel, CSV or HTML)
        file: PathBuf,
        /// Report category (`scorecard`, `mentor`, `customer-contact`, `concessions`)
        #[arg(long)]
        category: ReportCategory,
        /// Reporting week, overriding the file name
        #[arg(long)]
        week: Option<u32>,
        /// Reporting year, overriding the file name
        #[arg(long)]
        year: Option<i32>,
        /// Positional text layout (JSON) to use instead of the PDF text layer
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Print a stored report as JSON
    Show {
        /// Report category
        category: ReportCategory,
        /// Reporting week
        #[arg(long)]
        week: u32,
        /// Reporting year
        #[arg(long)]
        year: i32,
    },
    /// List the stored weeks of a category, newest first
    Weeks {
        /// Report category
        category: ReportCategory,
    },
    /// Print the upload history, newest first
    History,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = IngestConfig::load(cli.config.as_deref())?;
    let repository = FileRepository::new(&config.data_dir);

    match cli.command {
        Commands::Ingest {
            file,
            category,
            week,
            year,
            layout,
        } => {
            let today = chrono::Local::now().date_naive();
            let mut context = IngestContext::new(config, Box::new(repository), today);
            context.week = week;
            context.year = year;
            context.layout = layout;

            let outcome = ingest_file(&file, category, &context)?;
            println!(
                "Stored {} {} records for {} under '{}'",
                outcome.records, outcome.category, outcome.period, outcome.key
            );
            for warning in &outcome.warnings {
                println!("  warning: {warning}");
            }
        }
        Commands::Show {
            category,
            week,
            year,
        } => {
            let key = week_key(category, ReportPeriod::new(week, year));
            let value = repository
                .load(&key)?
                .ok_or_else(|| format!("No {category} data stored for KW{week:02}/{year}"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Weeks { category } => {
            let periods = available_periods(&repository, category)?;
            if periods.is_empty() {
                println!("No {category} data stored");
            }
            for period in periods {
                println!("{period}");
            }
        }
        Commands::History => {
            let history = load_history(&repository)?;
            println!("{:<25} {:<18} {:<6} NAME", "TIMESTAMP", "CATEGORY", "TYPE");
            println!("{}", "-".repeat(70));
            for entry in history {
                println!(
                    "{:<25} {:<18} {:<6} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.category.to_string(),
                    entry.kind.to_string(),
                    entry.name
                );
            }
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tally_ingest::sample::write_sample_csv;
use tally_ingest::SourceFormat;
use tally_report::Tracker;

mod config;
mod logging;
mod output;
mod state;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = LONG_VERSION,
    about = "Summaries and xlsx reports from bank statement exports"
)]
struct Cli {
    /// Log level used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Config file (default: $TALLY_HOME/config.toml, else ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Income, expenses, balance, averages and top categories
    Stats {
        /// Statement export (.csv, .xlsx or .xls)
        file: PathBuf,

        /// Print JSON instead of `label: value` lines
        #[arg(long)]
        json: bool,
    },

    /// Amount and transaction count per month
    Monthly { file: PathBuf },

    /// Amount and transaction count per category, smallest amount first
    Categories { file: PathBuf },

    /// Export the multi-sheet workbook with charts
    Report {
        file: PathBuf,

        /// Output path (default: report.output from the config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a three-row demo export to try the other commands on
    Sample {
        #[arg(long, default_value = "sample_data.csv")]
        out: PathBuf,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (never overwrites)
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level)?;

    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let cfg = config::load_config(&config_path)?;

    match cli.command {
        Command::Stats { file, json } => {
            let tracker = load(&cfg, &file)?;
            let stats = tracker.basic_stats().into_result()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", output::stats_text(&stats));
            }
        }

        Command::Monthly { file } => {
            let tracker = load(&cfg, &file)?;
            let monthly = tracker.monthly_summary().into_result()?;
            print!("{}", output::group_text("Period", &monthly));
        }

        Command::Categories { file } => {
            let tracker = load(&cfg, &file)?;
            let categories = tracker.category_summary().into_result()?;
            print!("{}", output::group_text("Category", &categories));
        }

        Command::Report { file, output } => {
            let mut tracker = load(&cfg, &file)?;
            let out = output.unwrap_or_else(|| cfg.report.output.clone());
            let message = tracker
                .export_report(&out)
                .with_context(|| format!("exporting {}", out.display()))?
                .into_result()?;
            println!("{message}");
        }

        Command::Sample { out } => {
            if out.exists() {
                bail!("{} already exists; pass --out <path>", out.display());
            }
            write_sample_csv(&out).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote sample data to {}", out.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                if config::init_config(&config_path)? {
                    println!("Wrote {}", config_path.display());
                } else {
                    println!("Config already exists: {}", config_path.display());
                }
            }
            ConfigCommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load(cfg: &config::Config, file: &Path) -> Result<Tracker> {
    SourceFormat::detect(file)?;
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }
    let mut tracker = cfg.tracker();
    let loaded = tracker
        .load(file)
        .with_context(|| format!("loading {}", file.display()))?;
    if loaded.coerced_values > 0 {
        tracing::warn!(
            file = %file.display(),
            count = loaded.coerced_values,
            "non-numeric amounts were read as 0"
        );
    }
    Ok(tracker)
}

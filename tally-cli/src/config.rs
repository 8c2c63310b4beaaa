use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_ingest::ColumnMap;
use tally_report::reporter::DEFAULT_TOP_N;
use tally_report::{ChartLayout, Reporter, Tracker};

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source column names of the bank export
    pub columns: ColumnMap,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Used by `tally report` when `--output` is not given
    pub output: PathBuf,
    /// Categories per pie chart
    pub top_n: usize,
    pub layout: ChartLayout,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("my_financial_report.xlsx"),
            top_n: DEFAULT_TOP_N,
            layout: ChartLayout::default(),
        }
    }
}

impl Config {
    pub fn reporter(&self) -> Reporter {
        Reporter::default()
            .with_layout(self.report.layout)
            .with_top_n(self.report.top_n)
    }

    pub fn tracker(&self) -> Tracker {
        Tracker::with_reporter(self.columns.clone(), self.reporter())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

/// `--config` if given, else `~/.tally/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns whether a file was written.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), path)?;
    Ok(true)
}

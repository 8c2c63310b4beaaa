//! Location of tally's per-user directory (config lives there).

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Overrides `~/.tally` when set to a non-empty path.
pub const HOME_ENV: &str = "TALLY_HOME";

fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn resolve_home(tally_home: Option<OsString>, user_home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = non_empty(tally_home) {
        return Ok(dir);
    }
    match non_empty(user_home) {
        Some(home) => Ok(home.join(".tally")),
        None => bail!("neither {HOME_ENV} nor HOME is set"),
    }
}

pub fn tally_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os(HOME_ENV), std::env::var_os("HOME"))
}

/// `tally_home()`, created on first use.
pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    if !dir.is_dir() {
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "created tally home");
    }
    Ok(dir)
}

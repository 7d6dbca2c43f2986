use crate::error::{CtlError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONFIG_DIR: &str = ".omnistrate";
pub const CONFIG_FILE: &str = "config.yaml";

/// Overrides the `~/.omnistrate` location (used by tests and CI runners).
pub const CONFIG_DIR_ENV: &str = "OMNISTRATE_CONFIG_DIR";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Resolve the directory holding the CLI config.
///
/// Priority:
/// 1. `OMNISTRATE_CONFIG_DIR` env var
/// 2. `$HOME/.omnistrate`
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home::home_dir().ok_or(CtlError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

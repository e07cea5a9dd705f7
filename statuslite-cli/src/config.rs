use anyhow::{anyhow, Context, Result};
use statuslite_core::StatusLiteConfig;
use std::path::{Path, PathBuf};

/// Loads the layered configuration, or only `explicit` when given.
pub fn load_config(explicit: Option<&Path>) -> Result<StatusLiteConfig> {
    let config = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
            StatusLiteConfig::load_from_paths(vec![path.to_path_buf()])
        }
        None => StatusLiteConfig::load(),
    };

    config.context("Failed to load statuslite configuration")
}

pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    Ok(dir.to_path_buf())
}

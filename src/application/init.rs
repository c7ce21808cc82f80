//! Initialize config use case

use crate::error::{KatalogError, Result};
use crate::infrastructure::{Config, CONFIG_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

/// Service writing a default config file
pub struct InitService;

impl InitService {
    /// Write a default `katalog.toml` into `dir` and return its path
    pub fn execute(dir: &Path) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Err(KatalogError::Config(format!(
                "Config already exists: {}",
                path.display()
            )));
        }

        Config::default().save(&path)?;
        Ok(path)
    }
}

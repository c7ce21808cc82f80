//! Config management use case

use crate::error::{KatalogError, Result};
use crate::infrastructure::Config;
use std::path::PathBuf;
use std::str::FromStr;

/// Keys accepted by `katalog config`
pub const VALID_KEYS: &[&str] = &[
    "erp.base_url",
    "erp.api_key",
    "erp.api_secret",
    "erp.timeout_secs",
    "images.base_url",
    "images.max_index",
    "images.miss_threshold",
    "images.timeout_secs",
    "images.log_misses_to_erp",
    "export.output_filename",
    "export.output_folder",
    "export.only_publish",
    "export.allow_private",
];

fn unknown_key(key: &str) -> KatalogError {
    KatalogError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        VALID_KEYS.join(", ")
    ))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| KatalogError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}

/// Service for managing the config file
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(path: PathBuf) -> Self {
        ConfigService { path }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = Config::load(&self.path)?;
        Self::read_key(&config, key)
    }

    fn read_key(config: &Config, key: &str) -> Result<String> {
        let value = match key {
            "erp.base_url" => config.erp.base_url.clone(),
            "erp.api_key" => config.erp.api_key.clone(),
            "erp.api_secret" => config.erp.api_secret.clone(),
            "erp.timeout_secs" => config.erp.timeout_secs.to_string(),
            "images.base_url" => config.images.base_url.clone(),
            "images.max_index" => config.images.max_index.to_string(),
            "images.miss_threshold" => config.images.miss_threshold.to_string(),
            "images.timeout_secs" => config.images.timeout_secs.to_string(),
            "images.log_misses_to_erp" => config.images.log_misses_to_erp.to_string(),
            "export.output_filename" => config.export.output_filename.clone(),
            "export.output_folder" => config.export.output_folder.clone(),
            "export.only_publish" => config.export.only_publish.to_string(),
            "export.allow_private" => config.export.allow_private.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = Config::load(&self.path)?;

        match key {
            "erp.base_url" => config.erp.base_url = value.trim_end_matches('/').to_string(),
            "erp.api_key" => config.erp.api_key = value.to_string(),
            "erp.api_secret" => config.erp.api_secret = value.to_string(),
            "erp.timeout_secs" => config.erp.timeout_secs = parse_value(key, value)?,
            "images.base_url" => config.images.base_url = value.to_string(),
            "images.max_index" => config.images.max_index = parse_value(key, value)?,
            "images.miss_threshold" => config.images.miss_threshold = parse_value(key, value)?,
            "images.timeout_secs" => config.images.timeout_secs = parse_value(key, value)?,
            "images.log_misses_to_erp" => {
                config.images.log_misses_to_erp = parse_value(key, value)?
            }
            "export.output_filename" => config.export.output_filename = value.to_string(),
            "export.output_folder" => config.export.output_folder = value.to_string(),
            "export.only_publish" => config.export.only_publish = parse_value(key, value)?,
            "export.allow_private" => config.export.allow_private = parse_value(key, value)?,
            _ => return Err(unknown_key(key)),
        }

        config.validate()?;
        config.save(&self.path)?;
        Ok(())
    }

    /// List all settable values in key order, with the API secret masked
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let config = Config::load(&self.path)?;
        VALID_KEYS
            .iter()
            .map(|key| {
                let value = Self::read_key(&config, key)?;
                let value = if *key == "erp.api_secret" {
                    mask(&value)
                } else {
                    value
                };
                Ok((key.to_string(), value))
            })
            .collect()
    }
}

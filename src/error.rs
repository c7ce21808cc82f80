//! Error types for katalog

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for katalog
#[derive(Debug, Error)]
pub enum KatalogError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("ERP API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Image not available (HTTP {status}): {url}")]
    ImageUnavailable { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl KatalogError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KatalogError::ConfigNotFound(_) => 2,
            KatalogError::Api { .. } => 3,
            KatalogError::ItemNotFound(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            KatalogError::ConfigNotFound(path) => {
                format!(
                    "Config file not found: {}\n\n\
                    Suggestions:\n\
                    • Run 'katalog init' to write a default katalog.toml\n\
                    • Pass --config <PATH> to point at an existing file\n\
                    • Set KATALOG_CONFIG environment variable to your config path",
                    path.display()
                )
            }
            KatalogError::Api { status, message } => {
                let hint = match status {
                    401 | 403 => {
                        "• Check erp.api_key and erp.api_secret\n\
                        • Make sure the API user has access to Item, File and Tag Link"
                    }
                    404 => "• Check erp.base_url (no trailing slash, no /app suffix)",
                    _ => "• Check the ERP error log for the full traceback",
                };
                format!(
                    "ERP API error (HTTP {}): {}\n\n\
                    Suggestions:\n{}",
                    status, message, hint
                )
            }
            KatalogError::ItemNotFound(code) => {
                format!(
                    "Item not found: '{}'\n\n\
                    Suggestions:\n\
                    • Item codes are matched against the Item name exactly\n\
                    • Use 'katalog attach-images --all' to process every enabled item",
                    code
                )
            }
            KatalogError::Http(err) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check network access to erp.base_url\n\
                    • Increase erp.timeout_secs for slow servers",
                    err
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using KatalogError
pub type Result<T> = std::result::Result<T, KatalogError>;

//! Configuration management

use crate::domain::{default_storage_groups, StorageGroup};
use crate::error::{KatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "katalog.toml";

/// ERP connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErpSettings {
    /// Site URL without trailing slash
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_secs: u64,
}

impl Default for ErpSettings {
    fn default() -> Self {
        ErpSettings {
            base_url: "https://kirun.pttimboel.com".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Image probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Prefix every probe URL starts with (keeps its trailing slash)
    pub base_url: String,
    pub max_index: u32,
    pub miss_threshold: u32,
    pub timeout_secs: u64,
    /// Also record probe misses in the ERP error log
    pub log_misses_to_erp: bool,
    #[serde(rename = "storage")]
    pub storage_groups: Vec<StorageGroup>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            base_url: "https://is3.cloudhost.id/image-timboel/product-img/".to_string(),
            max_index: 10,
            miss_threshold: 2,
            timeout_secs: 30,
            log_misses_to_erp: true,
            storage_groups: default_storage_groups(),
        }
    }
}

/// Custom Item and File fields read by the exporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub external_name: String,
    pub panjang: String,
    pub lebar: String,
    pub tinggi: String,
    pub berat: String,
    pub website_description: String,
    pub cbm: String,
    pub publish: String,
    pub include_in_website: String,
    pub image_role: String,
    pub image_include_in_website: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap {
            external_name: "custom_external_name".to_string(),
            panjang: "custom_panjang".to_string(),
            lebar: "custom_lebar".to_string(),
            tinggi: "custom_tinggi".to_string(),
            berat: "weight_per_unit".to_string(),
            website_description: "custom_website_description".to_string(),
            cbm: "custom_cbm".to_string(),
            publish: "custom_publish_item".to_string(),
            include_in_website: "custom_include_in_website".to_string(),
            image_role: "custom_image_role".to_string(),
            image_include_in_website: "custom_include_in_website".to_string(),
        }
    }
}

/// Catalog export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_filename: String,
    pub output_folder: String,
    pub only_publish: bool,
    /// Publish private file URLs too (they are not reachable from a static site)
    pub allow_private: bool,
    pub fields: FieldMap,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_filename: "website-products.json".to_string(),
            output_folder: "Home".to_string(),
            only_publish: false,
            allow_private: false,
            fields: FieldMap::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub erp: ErpSettings,
    pub images: ImageSettings,
    pub export: ExportSettings,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KatalogError::ConfigNotFound(path.to_path_buf())
            } else {
                KatalogError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            KatalogError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Reject settings the jobs cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.erp.base_url.ends_with('/') {
            return Err(KatalogError::Config(format!(
                "erp.base_url must not end with '/': {}",
                self.erp.base_url
            )));
        }
        if self.images.miss_threshold == 0 {
            return Err(KatalogError::Config(
                "images.miss_threshold must be at least 1".to_string(),
            ));
        }
        if self.export.output_filename.trim().is_empty() {
            return Err(KatalogError::Config(
                "export.output_filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether API credentials are present
    pub fn has_credentials(&self) -> bool {
        !self.erp.api_key.is_empty() && !self.erp.api_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.images.max_index, 10);
        assert_eq!(config.images.miss_threshold, 2);
        assert_eq!(config.images.storage_groups.len(), 7);
        assert_eq!(config.export.output_filename, "website-products.json");
        assert_eq!(config.export.output_folder, "Home");
        assert!(!config.export.only_publish);
        assert!(!config.export.allow_private);
        assert_eq!(config.export.fields.berat, "weight_per_unit");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conf").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.erp.api_key = "key".to_string();
        config.export.only_publish = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[erp]\nbase_url = \"https://erp.local\"\n\n[images]\nmax_index = 3\n\n\
             [[images.storage]]\nname = \"depan\"\nresolutions = [\"hero\"]\n",
        )
        .unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.erp.base_url, "https://erp.local");
        assert_eq!(loaded.erp.timeout_secs, 30);
        assert_eq!(loaded.images.max_index, 3);
        assert_eq!(loaded.images.miss_threshold, 2);
        assert_eq!(
            loaded.images.storage_groups,
            vec![StorageGroup::new("depan", &["hero"])]
        );
        assert_eq!(loaded.export, ExportSettings::default());
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join(CONFIG_FILE_NAME));

        match result.unwrap_err() {
            KatalogError::ConfigNotFound(_) => {}
            other => panic!("Expected ConfigNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let mut config = Config::default();
        config.erp.base_url = "https://erp.local/".to_string();
        assert!(matches!(config.validate(), Err(KatalogError::Config(_))));
    }

    #[test]
    fn test_has_credentials() {
        let mut config = Config::default();
        assert!(!config.has_credentials());
        config.erp.api_key = "k".to_string();
        config.erp.api_secret = "s".to_string();
        assert!(config.has_credentials());
    }
}

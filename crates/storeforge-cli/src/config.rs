use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storeforge_analyze::AnalyzeOptions;
use storeforge_generate::GenerateOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml decode error in {}: {source}", path.display())]
    TomlDecode {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Pipeline configuration, read from TOML.
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of the intermediate CSV files.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    /// Directory of the exported views and `summary.json`.
    pub output_dir: PathBuf,
    /// Optional NDJSON log file, in addition to stderr.
    pub log_path: Option<PathBuf>,
    pub generate: GenerateOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database_path: PathBuf::from("ecommerce.db"),
            output_dir: PathBuf::from("output"),
            log_path: None,
            generate: GenerateOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::TomlDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Generation options writing into `data_dir`.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            out_dir: self.data_dir.clone(),
            ..self.generate.clone()
        }
    }

    /// Analysis options sharing the generation reference date.
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            output_dir: self.output_dir.clone(),
            reference_date: self.generate.reference_date,
            ..AnalyzeOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = PipelineConfig::from_toml("database_path = \"shop.db\"\n").expect("parse");
        assert_eq!(config.database_path, PathBuf::from("shop.db"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.generate.orders, 200);
        assert!(config.log_path.is_none());
    }

    #[test]
    fn generate_table_overrides_counts_and_policy() {
        let config = PipelineConfig::from_toml(
            r#"
data_dir = "snapshots"

[generate]
seed = 7
orders = 10
order_items = 25
reference_date = "2023-06-30"
duplicate_product_attempts = 2

[generate.status_weights]
pending = 1.0
"#,
        )
        .expect("parse");

        let options = config.generate_options();
        assert_eq!(options.out_dir, PathBuf::from("snapshots"));
        assert_eq!(options.seed, 7);
        assert_eq!(options.orders, 10);
        assert_eq!(options.order_items, 25);
        assert_eq!(options.customers, 100);
        assert_eq!(options.policy.duplicate_product_attempts, 2);
        assert_eq!(options.policy.status_weights.pending, 1.0);
        assert_eq!(
            config.analyze_options().reference_date,
            options.reference_date
        );
    }

    #[test]
    fn absent_file_means_defaults() {
        let config =
            PipelineConfig::load(Path::new("/nonexistent/storeforge.toml")).expect("defaults");
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }
}

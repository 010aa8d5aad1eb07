// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Query for the full outgassing data table, 500 rows per page, sorted by material.
/// The page index is appended at request time.
pub const DEFAULT_BASE_URL: &str = "https://outgassing.nasa.gov/outgassing-data-table?field_material_value_op=contains&field_material_value=&field_application_value_op=contains&field_application_value=&field_data_ref_value_op=contains&field_data_ref_value=&field_cvcm_value_op=%3C%3D&field_cvcm_value%5Bvalue%5D=&field_cvcm_value%5Bmin%5D=&field_cvcm_value%5Bmax%5D=&field_tml_value_op=%3C%3D&field_tml_value%5Bvalue%5D=&field_tml_value%5Bmin%5D=&field_tml_value%5Bmax%5D=&sort_by=field_material_value&sort_order=ASC&items_per_page=500";

pub const CONFIG_PATH_VAR: &str = "OUTGASSING_CONFIG";
pub const OUTPUT_DIR_VAR: &str = "OUTGASSING_OUTPUT_DIR";
pub const BASE_URL_VAR: &str = "OUTGASSING_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Data-table query without the `page` parameter.
    pub base_url: String,
    /// Directory receiving the CSV, Parquet and XLSX artifacts.
    pub output_dir: PathBuf,
    /// File name (without extension) shared by all three artifacts.
    pub file_stem: String,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("output"),
            file_stem: "nasa_outgassing".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `OUTGASSING_CONFIG` (if set),
    /// then the per-field environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };
        cfg.apply_overrides(
            env::var(OUTPUT_DIR_VAR).ok(),
            env::var(BASE_URL_VAR).ok(),
        );
        debug!(?cfg, "resolved config");
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_overrides(&mut self, output_dir: Option<String>, base_url: Option<String>) {
        if let Some(dir) = output_dir.filter(|s| !s.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = base_url.filter(|s| !s.trim().is_empty()) {
            self.base_url = url;
        }
    }
}

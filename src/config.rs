use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKBOOK: &str = "./data/data.xlsx";
pub const DEFAULT_DATABASE: &str = "etl.db";
pub const DEFAULT_CLIENTS_SHEET: &str = "clientes";
pub const DEFAULT_SALES_SHEET: &str = "vendas";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Turns on `PRAGMA foreign_keys`, making orphan sales fail the sales load.
    pub enforce_foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE),
            enforce_foreign_keys: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub workbook: PathBuf,
    pub clients_sheet: String,
    pub sales_sheet: String,
    pub database: DatabaseConfig,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            clients_sheet: DEFAULT_CLIENTS_SHEET.to_string(),
            sales_sheet: DEFAULT_SALES_SHEET.to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl EtlConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader).context("Parsing config JSON")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing config JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let config: EtlConfig =
            serde_json::from_str(r#"{"database": {"path": "sales.db"}}"#).unwrap();
        assert_eq!(config.workbook, PathBuf::from(DEFAULT_WORKBOOK));
        assert_eq!(config.clients_sheet, "clientes");
        assert_eq!(config.sales_sheet, "vendas");
        assert_eq!(config.database.path, PathBuf::from("sales.db"));
        assert!(!config.database.enforce_foreign_keys);
    }

    #[test]
    fn config_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl.json");
        let config = EtlConfig {
            sales_sheet: "orders".into(),
            ..EtlConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EtlConfig::load(&path).unwrap(), config);
    }
}

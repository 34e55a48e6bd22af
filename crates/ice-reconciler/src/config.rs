//! Configuration for chart decoding and reconciliation.

use icechart_common::IceChartResult;
use serde::{Deserialize, Serialize};
use sigrid_codes::{ChartSource, CodeTable, CodeTableRegistry, SIGRID_TABLE};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Grids with at least this many cells are reconciled with rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 250_000;

/// Configuration for the chart decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Name of a built-in code table.
    pub code_table: String,

    /// YAML code table pinned by the campaign; overrides `code_table`.
    pub code_table_file: Option<PathBuf>,

    /// Cell count from which per-cell work runs in parallel.
    pub parallel_threshold: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            code_table: SIGRID_TABLE.to_string(),
            code_table_file: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ReconcilerConfig {
    /// Configuration using the built-in table for a chart source.
    pub fn for_source(source: ChartSource) -> Self {
        Self {
            code_table: source.table_name().to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ICECHART_CODE_TABLE") {
            if !val.is_empty() {
                config.code_table = val;
            }
        }

        if let Ok(val) = std::env::var("ICECHART_CODE_TABLE_FILE") {
            if !val.is_empty() {
                config.code_table_file = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("ICECHART_PARALLEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.parallel_threshold = threshold;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.code_table_file.is_none() && self.code_table.is_empty() {
            return Err("code_table must name a table when no code_table_file is set".to_string());
        }

        if let Some(path) = &self.code_table_file {
            if !path.is_file() {
                return Err(format!("code_table_file {:?} does not exist", path));
            }
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be > 0".to_string());
        }

        Ok(())
    }

    /// Load the pinned table file, if one is configured.
    pub fn load_pinned_table(&self) -> IceChartResult<Option<Arc<CodeTable>>> {
        let Some(path) = &self.code_table_file else {
            return Ok(None);
        };
        let table = CodeTable::from_yaml_file(path)?;
        info!(
            table = %table.name(),
            encoding = %table.encoding(),
            revision = %table.revision(),
            "Using pinned code table"
        );
        Ok(Some(Arc::new(table)))
    }

    /// Resolve the configured table, from file if one is pinned.
    pub fn load_table(&self, registry: &CodeTableRegistry) -> IceChartResult<Arc<CodeTable>> {
        match self.load_pinned_table()? {
            Some(table) => Ok(table),
            None => registry.get(&self.code_table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigrid_codes::{BIN_INTERVAL_TABLE, BUILTIN_REGISTRY};

    #[test]
    fn test_default_config() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.code_table, "sigrid");
        assert!(config.code_table_file.is_none());
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ReconcilerConfig::default();
        config.parallel_threshold = 0;
        assert!(config.validate().is_err());

        config = ReconcilerConfig::default();
        config.code_table.clear();
        assert!(config.validate().is_err());

        config = ReconcilerConfig::default();
        config.code_table_file = Some(PathBuf::from("/nonexistent/table.yaml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_source() {
        let config = ReconcilerConfig::for_source(ChartSource::BinaryChart);
        assert_eq!(config.code_table, BIN_INTERVAL_TABLE);
    }

    #[test]
    fn test_load_builtin_table() {
        let config = ReconcilerConfig::for_source(ChartSource::Shapefile);
        let table = config.load_table(&BUILTIN_REGISTRY).unwrap();
        assert_eq!(table.name(), "sigrid");
    }

    #[test]
    fn test_load_pinned_table() {
        let file = test_utils::write_temp_file(".yaml", test_utils::BIN_TABLE_ALT_YAML);
        let config = ReconcilerConfig {
            code_table_file: Some(file.path().to_path_buf()),
            ..ReconcilerConfig::default()
        };
        assert!(config.validate().is_ok());

        let table = config.load_table(&BUILTIN_REGISTRY).unwrap();
        assert_eq!(table.revision(), "alt-open-water");
        assert_eq!(table.canonical(5), Some(2));
    }

    #[test]
    fn test_no_pinned_table_by_default() {
        assert!(ReconcilerConfig::default().load_pinned_table().unwrap().is_none());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("ICECHART_CODE_TABLE", "bin-interval");
        std::env::set_var("ICECHART_PARALLEL_THRESHOLD", "1024");
        let config = ReconcilerConfig::from_env();
        std::env::remove_var("ICECHART_CODE_TABLE");
        std::env::remove_var("ICECHART_PARALLEL_THRESHOLD");

        assert_eq!(config.code_table, "bin-interval");
        assert_eq!(config.parallel_threshold, 1024);
        assert!(config.code_table_file.is_none());
    }
}

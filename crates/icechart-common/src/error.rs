//! Error types for ice-chart decoding and reconciliation.

use crate::grid::GridShape;
use thiserror::Error;

/// Result type alias using IceChartError.
pub type IceChartResult<T> = Result<T, IceChartError>;

/// Primary error type for chart decoding and reconciliation.
#[derive(Debug, Error)]
pub enum IceChartError {
    // === Input Data Errors ===
    #[error("Unexpected code(s) {codes:?} for code table '{table}'")]
    UnexpectedCode { codes: Vec<u8>, table: String },

    #[error("Grid shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: GridShape,
        actual: GridShape,
    },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    // === Code Table Defects ===
    #[error("Code {code} resolves to an inverted interval [{lower}, {upper}]")]
    IntervalInversion { code: u8, lower: f32, upper: f32 },

    #[error("Canonical code {0} matches no resolution rule")]
    UnresolvedCode(u8),

    #[error("Unknown code table: {0}")]
    UnknownTable(String),

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IceChartError {
    /// True for errors caused by the input grids rather than by a code table.
    ///
    /// Batch callers skip the offending pair on data errors; table defects
    /// point at a misconfigured campaign and affect every pair alike.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            IceChartError::UnexpectedCode { .. }
                | IceChartError::ShapeMismatch { .. }
                | IceChartError::InvalidGrid(_)
        )
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            IceChartError::UnexpectedCode { .. } => "unexpected_code",
            IceChartError::ShapeMismatch { .. } => "shape_mismatch",
            IceChartError::InvalidGrid(_) => "invalid_grid",
            IceChartError::IntervalInversion { .. } => "interval_inversion",
            IceChartError::UnresolvedCode(_) => "unresolved_code",
            IceChartError::UnknownTable(_) => "unknown_table",
            IceChartError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<std::io::Error> for IceChartError {
    fn from(err: std::io::Error) -> Self {
        IceChartError::InvalidConfig(err.to_string())
    }
}

impl From<serde_yaml::Error> for IceChartError {
    fn from(err: serde_yaml::Error) -> Self {
        IceChartError::InvalidConfig(format!("YAML error: {}", err))
    }
}

impl From<serde_json::Error> for IceChartError {
    fn from(err: serde_json::Error) -> Self {
        IceChartError::InvalidConfig(format!("JSON error: {}", err))
    }
}

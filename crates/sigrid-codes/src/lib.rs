//! Ice-chart concentration codes.
//!
//! Raw chart codes come in three encodings (EASE percentages, bin intervals
//! and SIGRID two-digit codes). This crate validates a raw grid against its
//! declared encoding, maps it onto canonical SIGRID codes and resolves each
//! canonical code into a concentration interval:
//!
//! ```ignore
//! let table = BUILTIN_REGISTRY.get(ChartSource::from_path(path)?.table_name())?;
//! validate(&raw, &table.domain())?;
//! let intervals = resolve_grid(&canonicalize(&raw, &table)?)?;
//! ```

pub mod interval;
pub mod provenance;
pub mod registry;
pub mod table;
pub mod validator;

pub use interval::{resolve, resolve_grid, CodeCategory, ConcentrationInterval};
pub use provenance::ChartSource;
pub use registry::{canonicalize, CodeTableRegistry, BUILTIN_REGISTRY};
pub use table::{
    ChartEncoding, CodeTable, BIN_INTERVAL_TABLE, EASE_PERCENTAGE_TABLE, SIGRID_TABLE,
};
pub use validator::{unexpected_codes, validate, CodeDomain};

//! Common types shared across the ice-chart validation crates.

pub mod error;
pub mod grid;

pub use error::{IceChartError, IceChartResult};
pub use grid::{GridShape, MaskedGrid};

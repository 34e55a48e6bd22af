//! Reconciliation of ice-chart intervals against satellite concentration
//! fields.
//!
//! A [`ChartDecoder`] runs the full pipeline for one chart:
//!
//! 1. validate raw codes against the chart's code table,
//! 2. canonicalize them to SIGRID codes,
//! 3. resolve each code to a concentration interval,
//! 4. clamp the satellite field into those intervals.
//!
//! The result carries the reconciled grid, the lower and upper bounds used
//! for clamping, and a [`ReconcileSummary`] of how each cell was handled.
//!
//! ```ignore
//! use ice_reconciler::ChartDecoder;
//! use sigrid_codes::ChartSource;
//!
//! let source = ChartSource::from_path("nic_weekly_2005_01_04_tot_v0_nh.bin")?;
//! let codes = source.prepare(width, height, raw_bytes)?;
//! let result = ChartDecoder::for_source(source)?.reconcile(&codes, &satellite)?;
//! ```

pub mod batch;
pub mod config;
pub mod decoder;
pub mod reconcile;
pub mod summary;

pub use batch::{reconcile_batch, BatchReport, ChartPair, PairOutcome};
pub use config::{ReconcilerConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use decoder::ChartDecoder;
pub use reconcile::{reconcile, reconcile_cell, CellOutcome, Clamp, Reconciliation};
pub use summary::ReconcileSummary;

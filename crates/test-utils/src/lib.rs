//! Shared test utilities for the ice-chart validation workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Reference chart fixtures (SIGRID reference case, invalid charts)
//! - Grid generators for codes, masks and satellite fields
//! - Test data path helpers
//! - Tracing setup for tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG` (default `debug`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Macro to skip a test if the required file is not found.
///
/// ```ignore
/// let path = require_test_file!("bin-interval-alt.yaml");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Add it under testdata/ or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that two masked grids agree cell by cell: same mask, and valid
/// values within `epsilon`.
#[macro_export]
macro_rules! assert_grid_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual = &$actual;
        let expected = &$expected;
        assert_eq!(actual.shape(), expected.shape(), "grid shapes differ");
        for (idx, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            let col = idx % actual.width();
            let row = idx / actual.width();
            match (a, e) {
                (Some(a), Some(e)) => {
                    let diff = (f64::from(a) - f64::from(e)).abs();
                    if diff > $epsilon as f64 {
                        panic!(
                            "Mismatch at ({}, {}): expected {}, got {}",
                            col, row, e, a
                        );
                    }
                }
                (None, None) => {}
                (a, e) => panic!(
                    "Mask mismatch at ({}, {}): expected {:?}, got {:?}",
                    col, row, e, a
                ),
            }
        }
    }};
}

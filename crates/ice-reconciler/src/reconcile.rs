//! Reconciliation of chart intervals against a continuous satellite field.
//!
//! For each cell the chart states a concentration interval and the satellite
//! product gives a value. When the value lies inside the interval it is
//! kept; otherwise it is clamped to the nearest bound. The bounds are
//! returned alongside so that the clamping can be audited later.
//!
//! A cell yields no value when either input is masked, when the chart code
//! is undetermined, or when the arithmetic produces NaN. Masked cells are
//! never filled with a default.

use crate::summary::ReconcileSummary;
use icechart_common::{IceChartResult, MaskedGrid};
use rayon::prelude::*;
use sigrid_codes::ConcentrationInterval;

/// Which rule produced a reconciled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clamp {
    /// The test value was already within the interval.
    Inside,
    /// The test value was below the interval.
    Up,
    /// The test value was above the interval.
    Down,
}

/// Result of reconciling one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellOutcome {
    /// Masked code, masked test value, or a NaN along the way.
    Masked,
    /// The chart code is undetermined.
    Undetermined,
    Reconciled {
        value: f32,
        lower: f32,
        upper: f32,
        clamp: Clamp,
    },
}

impl CellOutcome {
    pub fn value(&self) -> Option<f32> {
        match *self {
            CellOutcome::Reconciled { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn lower(&self) -> Option<f32> {
        match *self {
            CellOutcome::Reconciled { lower, .. } => Some(lower),
            _ => None,
        }
    }

    pub fn upper(&self) -> Option<f32> {
        match *self {
            CellOutcome::Reconciled { upper, .. } => Some(upper),
            _ => None,
        }
    }
}

/// Reconcile one cell.
///
/// `interval` is `None` for a masked chart cell, `test_value` is `None` for
/// a masked satellite cell.
pub fn reconcile_cell(
    interval: Option<ConcentrationInterval>,
    test_value: Option<f32>,
) -> CellOutcome {
    let interval = match interval {
        Some(interval) => interval,
        None => return CellOutcome::Masked,
    };
    let (lower, upper) = match interval.bounds() {
        Some(bounds) => bounds,
        None => return CellOutcome::Undetermined,
    };
    let t = match test_value {
        Some(t) if !t.is_nan() => t,
        _ => return CellOutcome::Masked,
    };

    let (value, clamp) = if t < lower {
        (lower, Clamp::Up)
    } else if t > upper {
        (upper, Clamp::Down)
    } else {
        (t, Clamp::Inside)
    };

    if value.is_nan() || lower.is_nan() || upper.is_nan() {
        return CellOutcome::Masked;
    }

    CellOutcome::Reconciled {
        value,
        lower,
        upper,
        clamp,
    }
}

/// Reconciled grid plus the interval bounds it was clamped to.
///
/// All three grids share one mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub reconciled: MaskedGrid<f32>,
    pub lower: MaskedGrid<f32>,
    pub upper: MaskedGrid<f32>,
    pub summary: ReconcileSummary,
}

/// Reconcile a grid of intervals against a test field of the same shape.
///
/// Runs on the rayon pool when `parallel` is set; the result is identical
/// either way.
///
/// # Errors
///
/// Returns [`icechart_common::IceChartError::ShapeMismatch`] if the grids
/// differ in shape.
pub fn reconcile(
    intervals: &MaskedGrid<ConcentrationInterval>,
    test_field: &MaskedGrid<f32>,
    parallel: bool,
) -> IceChartResult<Reconciliation> {
    intervals.ensure_same_shape(test_field)?;

    let outcomes: Vec<CellOutcome> = if parallel {
        intervals
            .cells()
            .par_iter()
            .zip(test_field.cells().par_iter())
            .map(|(&interval, &t)| reconcile_cell(interval, t))
            .collect()
    } else {
        intervals
            .iter()
            .zip(test_field.iter())
            .map(|(interval, t)| reconcile_cell(interval, t))
            .collect()
    };

    let shape = intervals.shape();
    let layer = |f: fn(&CellOutcome) -> Option<f32>| {
        MaskedGrid::from_cells(shape.width, shape.height, outcomes.iter().map(f).collect())
    };

    Ok(Reconciliation {
        reconciled: layer(CellOutcome::value)?,
        lower: layer(CellOutcome::lower)?,
        upper: layer(CellOutcome::upper)?,
        summary: ReconcileSummary::from_outcomes(&outcomes),
    })
}

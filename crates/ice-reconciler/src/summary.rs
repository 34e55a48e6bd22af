//! Per-reconciliation audit counts.

use crate::reconcile::{CellOutcome, Clamp};
use icechart_common::IceChartResult;
use serde::{Deserialize, Serialize};

/// How every cell of one reconciliation was handled.
///
/// Downstream consumers use these counts to audit how much of the chart
/// was decided by the satellite field and how much by clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub total_cells: usize,
    /// Masked in the code grid or the test field.
    pub masked: usize,
    /// Chart code states the concentration is unknown.
    pub undetermined: usize,
    /// Test value already inside the chart interval.
    pub inside: usize,
    /// Test value below the interval, raised to its lower bound.
    pub clamped_up: usize,
    /// Test value above the interval, lowered to its upper bound.
    pub clamped_down: usize,
}

impl ReconcileSummary {
    /// Count a sequence of cell outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a CellOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &CellOutcome) {
        self.total_cells += 1;
        match outcome {
            CellOutcome::Masked => self.masked += 1,
            CellOutcome::Undetermined => self.undetermined += 1,
            CellOutcome::Reconciled { clamp, .. } => match clamp {
                Clamp::Inside => self.inside += 1,
                Clamp::Up => self.clamped_up += 1,
                Clamp::Down => self.clamped_down += 1,
            },
        }
    }

    /// Add the counts of another summary, e.g. to total a batch.
    pub fn merge(&mut self, other: &ReconcileSummary) {
        let ReconcileSummary {
            total_cells,
            masked,
            undetermined,
            inside,
            clamped_up,
            clamped_down,
        } = *other;
        self.total_cells += total_cells;
        self.masked += masked;
        self.undetermined += undetermined;
        self.inside += inside;
        self.clamped_up += clamped_up;
        self.clamped_down += clamped_down;
    }

    /// Cells that produced a value.
    pub fn reconciled(&self) -> usize {
        self.inside + self.clamped_up + self.clamped_down
    }

    pub fn clamped(&self) -> usize {
        self.clamped_up + self.clamped_down
    }

    /// Share of reconciled cells whose value came from clamping, in `[0, 1]`.
    pub fn clamped_fraction(&self) -> f64 {
        match self.reconciled() {
            0 => 0.0,
            n => self.clamped() as f64 / n as f64,
        }
    }

    pub fn to_json(&self) -> IceChartResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciled(clamp: Clamp) -> CellOutcome {
        CellOutcome::Reconciled {
            value: 10.0,
            lower: 10.0,
            upper: 30.0,
            clamp,
        }
    }

    #[test]
    fn test_counts() {
        let outcomes = [
            CellOutcome::Masked,
            CellOutcome::Undetermined,
            CellOutcome::Undetermined,
            reconciled(Clamp::Inside),
            reconciled(Clamp::Up),
            reconciled(Clamp::Down),
            reconciled(Clamp::Down),
        ];
        let summary = ReconcileSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total_cells, 7);
        assert_eq!(summary.masked, 1);
        assert_eq!(summary.undetermined, 2);
        assert_eq!(summary.reconciled(), 4);
        assert_eq!(summary.clamped(), 3);
        assert!((summary.clamped_fraction() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_merge_adds_every_counter() {
        let first = ReconcileSummary::from_outcomes(&[
            CellOutcome::Masked,
            reconciled(Clamp::Up),
        ]);
        let second = ReconcileSummary::from_outcomes(&[
            CellOutcome::Undetermined,
            reconciled(Clamp::Inside),
            reconciled(Clamp::Down),
        ]);

        let mut total = ReconcileSummary::default();
        total.merge(&first);
        total.merge(&second);

        assert_eq!(
            total,
            ReconcileSummary {
                total_cells: 5,
                masked: 1,
                undetermined: 1,
                inside: 1,
                clamped_up: 1,
                clamped_down: 1,
            }
        );
    }

    #[test]
    fn test_empty_fraction() {
        assert_eq!(ReconcileSummary::default().clamped_fraction(), 0.0);
    }

    #[test]
    fn test_json() {
        let summary = ReconcileSummary::from_outcomes(&[CellOutcome::Undetermined]);
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"undetermined\":1"));
        let parsed: ReconcileSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}

//! Batch reconciliation of chart/satellite pairs.
//!
//! Pairs are independent: each is decoded with the table for its own source
//! and a failing pair never stops the others.

use crate::config::ReconcilerConfig;
use crate::decoder::ChartDecoder;
use crate::reconcile::Reconciliation;
use crate::summary::ReconcileSummary;
use chrono::NaiveDate;
use icechart_common::{IceChartError, IceChartResult, MaskedGrid};
use rayon::prelude::*;
use sigrid_codes::{ChartSource, CodeTableRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One chart and the satellite field it is compared against.
#[derive(Debug, Clone)]
pub struct ChartPair {
    /// Identifier used in logs, usually the chart file name.
    pub label: String,
    pub reference_date: NaiveDate,
    pub source: ChartSource,
    pub code_grid: MaskedGrid<u8>,
    pub test_field: MaskedGrid<f32>,
}

/// Result for one pair of a batch.
#[derive(Debug)]
pub struct PairOutcome {
    pub label: String,
    pub reference_date: NaiveDate,
    pub result: IceChartResult<Reconciliation>,
}

impl PairOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Totals over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Cell counts summed over the successful pairs.
    pub cells: ReconcileSummary,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[PairOutcome]) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(reconciliation) => {
                    report.succeeded += 1;
                    report.cells.merge(&reconciliation.summary);
                }
                Err(_) => report.failed += 1,
            }
        }
        report
    }
}

/// One decoder per chart source present in the batch.
///
/// A pinned table replaces the registry table only for sources with the
/// same encoding. Sources whose table is missing from the registry get no
/// decoder; their pairs fail individually.
fn decoders_for(
    pairs: &[ChartPair],
    config: &ReconcilerConfig,
    registry: &CodeTableRegistry,
) -> IceChartResult<HashMap<ChartSource, ChartDecoder>> {
    let pinned = config.load_pinned_table()?;

    let mut decoders = HashMap::new();
    for source in pairs.iter().map(|pair| pair.source) {
        if decoders.contains_key(&source) {
            continue;
        }

        let table = match &pinned {
            Some(table) if table.encoding() == source.encoding() => Arc::clone(table),
            _ => match registry.get(source.table_name()) {
                Ok(table) => table,
                Err(e) => {
                    warn!(source = ?source, error = %e, "No code table for chart source");
                    continue;
                }
            },
        };

        debug!(
            source = ?source,
            table = %table.name(),
            revision = %table.revision(),
            "Selected code table"
        );
        decoders.insert(
            source,
            ChartDecoder::new(table).with_parallel_threshold(config.parallel_threshold),
        );
    }

    Ok(decoders)
}

/// Reconcile every pair on the rayon pool.
///
/// Outcomes are returned in input order. Each pair is decoded with the
/// registry table for its source, or with the table pinned in `config` when
/// that table has the source's encoding. `config` also supplies the
/// parallel threshold.
///
/// # Errors
///
/// Fails before any pair runs if the pinned table file cannot be loaded.
/// Errors of individual pairs are recorded in their [`PairOutcome`].
pub fn reconcile_batch(
    pairs: &[ChartPair],
    config: &ReconcilerConfig,
    registry: &CodeTableRegistry,
) -> IceChartResult<Vec<PairOutcome>> {
    let decoders = decoders_for(pairs, config, registry)?;

    let outcomes: Vec<PairOutcome> = pairs
        .par_iter()
        .map(|pair| {
            let result = decoders
                .get(&pair.source)
                .ok_or_else(|| IceChartError::UnknownTable(pair.source.table_name().to_string()))
                .and_then(|decoder| decoder.reconcile(&pair.code_grid, &pair.test_field));

            if let Err(e) = &result {
                warn!(
                    chart = %pair.label,
                    date = %pair.reference_date,
                    kind = e.kind(),
                    error = %e,
                    "Skipping chart pair"
                );
            }
            PairOutcome {
                label: pair.label.clone(),
                reference_date: pair.reference_date,
                result,
            }
        })
        .collect();

    let report = BatchReport::from_outcomes(&outcomes);
    info!(
        pairs = pairs.len(),
        succeeded = report.succeeded,
        failed = report.failed,
        undetermined = report.cells.undetermined,
        clamped = report.cells.clamped(),
        "Batch reconciliation complete"
    );

    Ok(outcomes)
}

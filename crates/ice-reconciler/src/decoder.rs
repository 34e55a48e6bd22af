//! Chart decoding pipeline: validate → canonicalize → resolve → reconcile.

use crate::config::ReconcilerConfig;
use crate::reconcile::{self, Reconciliation};
use icechart_common::{IceChartResult, MaskedGrid};
use sigrid_codes::{
    canonicalize, resolve_grid, validate, ChartSource, CodeDomain, CodeTable, CodeTableRegistry,
    ConcentrationInterval, BUILTIN_REGISTRY,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Decodes chart grids written in one code table and reconciles them
/// against satellite fields.
///
/// A decoder holds no mutable state; one instance can serve any number of
/// grids from any number of threads.
#[derive(Debug, Clone)]
pub struct ChartDecoder {
    table: Arc<CodeTable>,
    domain: CodeDomain,
    parallel_threshold: usize,
}

impl ChartDecoder {
    /// Create a decoder for a code table with default settings.
    pub fn new(table: Arc<CodeTable>) -> Self {
        let domain = table.domain();
        Self {
            table,
            domain,
            parallel_threshold: crate::config::DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Decoder using the built-in table for a chart source.
    pub fn for_source(source: ChartSource) -> IceChartResult<Self> {
        Self::from_config(&ReconcilerConfig::for_source(source), &BUILTIN_REGISTRY)
    }

    /// Decoder for a configuration, looking built-in names up in `registry`.
    pub fn from_config(config: &ReconcilerConfig, registry: &CodeTableRegistry) -> IceChartResult<Self> {
        let table = config.load_table(registry)?;
        Ok(Self::new(table).with_parallel_threshold(config.parallel_threshold))
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Validate, canonicalize and resolve a raw code grid.
    pub fn decode(&self, code_grid: &MaskedGrid<u8>) -> IceChartResult<MaskedGrid<ConcentrationInterval>> {
        validate(code_grid, &self.domain)?;
        let canonical = canonicalize(code_grid, &self.table)?;
        resolve_grid(&canonical)
    }

    /// Decode `code_grid` and reconcile it against `test_field`.
    ///
    /// Shapes are checked before any decoding work.
    pub fn reconcile(
        &self,
        code_grid: &MaskedGrid<u8>,
        test_field: &MaskedGrid<f32>,
    ) -> IceChartResult<Reconciliation> {
        code_grid.ensure_same_shape(test_field)?;

        let intervals = self.decode(code_grid)?;
        let parallel = intervals.len() >= self.parallel_threshold;
        debug!(
            table = %self.table.name(),
            cells = intervals.len(),
            parallel,
            "Reconciling chart against test field"
        );

        let result = reconcile::reconcile(&intervals, test_field, parallel)?;

        let summary = &result.summary;
        info!(
            table = %self.table.name(),
            revision = %self.table.revision(),
            cells = summary.total_cells,
            masked = summary.masked,
            undetermined = summary.undetermined,
            inside = summary.inside,
            clamped_up = summary.clamped_up,
            clamped_down = summary.clamped_down,
            "Chart reconciled"
        );

        Ok(result)
    }
}

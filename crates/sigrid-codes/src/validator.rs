//! Strict domain validation of raw chart grids.
//!
//! The caller declares which encoding a chart is written in (from the file it
//! came from) and the grid is checked against that encoding's legal codes
//! before anything is decoded. Nothing here guesses an encoding from the
//! values themselves.

use icechart_common::{IceChartError, IceChartResult, MaskedGrid};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A named set of legal raw codes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeDomain {
    name: String,
    codes: BTreeSet<u8>,
}

impl CodeDomain {
    pub fn new(name: impl Into<String>, codes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            name: name.into(),
            codes: codes.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn contains(&self, code: u8) -> bool {
        self.codes.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.codes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Distinct valid values of `grid` that fall outside `domain`, ascending.
///
/// Masked cells are never inspected.
pub fn unexpected_codes(grid: &MaskedGrid<u8>, domain: &CodeDomain) -> Vec<u8> {
    let distinct: BTreeSet<u8> = grid.valid_values().collect();
    distinct
        .into_iter()
        .filter(|code| !domain.contains(*code))
        .collect()
}

/// Check that every valid cell of `grid` belongs to `domain`.
///
/// # Errors
///
/// Returns [`IceChartError::UnexpectedCode`] naming every offending value.
pub fn validate(grid: &MaskedGrid<u8>, domain: &CodeDomain) -> IceChartResult<()> {
    let unexpected = unexpected_codes(grid, domain);

    if !unexpected.is_empty() {
        warn!(
            domain = %domain.name(),
            codes = ?unexpected,
            "Chart contains codes outside the declared domain"
        );
        return Err(IceChartError::UnexpectedCode {
            codes: unexpected,
            table: domain.name().to_string(),
        });
    }

    debug!(
        domain = %domain.name(),
        valid_cells = grid.valid_count(),
        masked_cells = grid.masked_count(),
        "Chart codes validated"
    );
    Ok(())
}

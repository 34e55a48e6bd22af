//! Validity-aware 2-D grids.
//!
//! Every cell of a [`MaskedGrid`] is an `Option`: `None` marks a cell that
//! carries no information, whether it was masked by the data source, flagged
//! by the satellite product, or undetermined on the ice chart. Numeric
//! fill values and NaN sentinels never appear inside the pipeline; they are
//! only produced on export via [`MaskedGrid::filled`].

use crate::error::{IceChartError, IceChartResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions of a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl GridShape {
    /// Create a new grid shape.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if the shape has no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Flat row-major index for a column/row pair.
    pub fn flat_index(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Fail with [`IceChartError::ShapeMismatch`] unless `other` equals `self`.
    pub fn ensure_matches(&self, other: GridShape) -> IceChartResult<()> {
        if *self != other {
            return Err(IceChartError::ShapeMismatch {
                expected: *self,
                actual: other,
            });
        }
        Ok(())
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A row-major grid whose cells are either a value or masked.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid<T> {
    shape: GridShape,
    cells: Vec<Option<T>>,
}

impl<T: Copy> MaskedGrid<T> {
    /// Build a grid from per-cell options.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Option<T>>) -> IceChartResult<Self> {
        let shape = GridShape::new(width, height);
        if cells.len() != shape.len() {
            return Err(IceChartError::InvalidGrid(format!(
                "{} cells supplied for a {} grid",
                cells.len(),
                shape
            )));
        }
        Ok(Self { shape, cells })
    }

    /// Build a grid in which every cell is valid.
    pub fn from_values(width: usize, height: usize, values: Vec<T>) -> IceChartResult<Self> {
        Self::from_cells(width, height, values.into_iter().map(Some).collect())
    }

    /// Build a grid from values and a parallel mask, where `true` marks a
    /// masked cell.
    ///
    /// The value stored under a masked cell is discarded.
    pub fn with_mask(
        width: usize,
        height: usize,
        values: Vec<T>,
        mask: &[bool],
    ) -> IceChartResult<Self> {
        if values.len() != mask.len() {
            return Err(IceChartError::InvalidGrid(format!(
                "mask has {} cells but values have {}",
                mask.len(),
                values.len()
            )));
        }
        let cells = values
            .into_iter()
            .zip(mask)
            .map(|(v, &masked)| if masked { None } else { Some(v) })
            .collect();
        Self::from_cells(width, height, cells)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    /// Total number of cells, masked or not.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at a column/row, `None` when masked or out of bounds.
    pub fn get(&self, col: usize, row: usize) -> Option<T> {
        self.shape
            .flat_index(col, row)
            .and_then(|idx| self.cells[idx])
    }

    /// Value at a flat row-major index.
    pub fn cell(&self, idx: usize) -> Option<T> {
        self.cells.get(idx).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<T>] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.cells.iter().copied()
    }

    /// Iterator over the valid values only.
    pub fn valid_values(&self) -> impl Iterator<Item = T> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_none()
    }

    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn masked_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// Mask layer in the `true = masked` convention.
    pub fn mask(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.is_none()).collect()
    }

    /// Apply `f` to every valid cell; masked cells stay masked.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> MaskedGrid<U> {
        MaskedGrid {
            shape: self.shape,
            cells: self.cells.iter().map(|c| c.map(&f)).collect(),
        }
    }

    /// Fallible [`map`](Self::map); stops at the first error.
    pub fn try_map<U: Copy, E>(
        &self,
        f: impl Fn(T) -> Result<U, E>,
    ) -> Result<MaskedGrid<U>, E> {
        let cells = self
            .cells
            .iter()
            .map(|c| c.map(&f).transpose())
            .collect::<Result<Vec<_>, E>>()?;
        Ok(MaskedGrid {
            shape: self.shape,
            cells,
        })
    }

    /// Additionally mask every valid cell for which `pred` holds.
    pub fn mask_where(mut self, pred: impl Fn(T) -> bool) -> Self {
        for cell in &mut self.cells {
            if matches!(cell, Some(v) if pred(*v)) {
                *cell = None;
            }
        }
        self
    }

    /// Export to a plain vector, writing `fill` into masked cells.
    pub fn filled(&self, fill: T) -> Vec<T> {
        self.cells.iter().map(|c| c.unwrap_or(fill)).collect()
    }

    /// Fail with [`IceChartError::ShapeMismatch`] unless both grids have the
    /// same dimensions.
    pub fn ensure_same_shape<U>(&self, other: &MaskedGrid<U>) -> IceChartResult<()> {
        self.shape.ensure_matches(other.shape)
    }
}

impl MaskedGrid<f32> {
    /// Build a test field from a satellite product, masking every cell whose
    /// status flag is non-zero and every NaN value.
    pub fn from_status_flags(
        width: usize,
        height: usize,
        values: Vec<f32>,
        status_flags: &[u8],
    ) -> IceChartResult<Self> {
        let mask: Vec<bool> = status_flags.iter().map(|&flag| flag != 0).collect();
        Ok(Self::with_mask(width, height, values, &mask)?.mask_nan())
    }

    /// Mask NaN values so they never reach the arithmetic.
    pub fn mask_nan(self) -> Self {
        self.mask_where(f32::is_nan)
    }
}

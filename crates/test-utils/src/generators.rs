//! Grid generators for synthetic chart and satellite data.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use icechart_common::MaskedGrid;

/// Builds a fully valid code grid from fixed-size rows.
pub fn code_grid<const W: usize, const H: usize>(rows: &[[u8; W]; H]) -> MaskedGrid<u8> {
    MaskedGrid::from_values(W, H, crate::fixtures::flatten(rows))
        .expect("fixture rows always match their shape")
}

/// Builds a fully valid test field from fixed-size rows.
pub fn test_field<const W: usize, const H: usize>(rows: &[[f32; W]; H]) -> MaskedGrid<f32> {
    MaskedGrid::from_values(W, H, crate::fixtures::flatten(rows))
        .expect("fixture rows always match their shape")
}

/// Creates a satellite-like concentration field.
///
/// Values rise linearly from 0% in the top-left cell to 100% in the
/// bottom-right cell, so every grid covers the full concentration range.
///
/// # Example
///
/// ```
/// use test_utils::create_concentration_field;
///
/// let field = create_concentration_field(5, 3);
/// assert_eq!(field.len(), 15);
/// assert_eq!(field.cell(0), Some(0.0));
/// assert_eq!(field.cell(14), Some(100.0));
/// ```
pub fn create_concentration_field(width: usize, height: usize) -> MaskedGrid<f32> {
    let last = (width * height).saturating_sub(1).max(1) as f32;
    let values = (0..width * height)
        .map(|idx| idx as f32 / last * 100.0)
        .collect();
    MaskedGrid::from_values(width, height, values).expect("generated values match the shape")
}

/// Creates a code grid filled with a single code.
pub fn create_uniform_code_grid(width: usize, height: usize, code: u8) -> MaskedGrid<u8> {
    MaskedGrid::from_values(width, height, vec![code; width * height])
        .expect("generated values match the shape")
}

/// Creates a code grid cycling through `codes` in row-major order.
pub fn create_cycling_code_grid(width: usize, height: usize, codes: &[u8]) -> MaskedGrid<u8> {
    assert!(!codes.is_empty(), "at least one code is required");
    let values = (0..width * height).map(|idx| codes[idx % codes.len()]).collect();
    MaskedGrid::from_values(width, height, values).expect("generated values match the shape")
}

/// Creates a mask in the `true = masked` convention where every other cell
/// (checkerboard pattern, top-left unmasked) is masked.
pub fn create_checkerboard_mask(width: usize, height: usize) -> Vec<bool> {
    let mut mask = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            mask.push((row + col) % 2 == 1);
        }
    }
    mask
}

/// Returns a copy of `grid` with the given `(col, row)` cells masked.
pub fn mask_cells<T: Copy>(grid: &MaskedGrid<T>, cells: &[(usize, usize)]) -> MaskedGrid<T> {
    let mut all = grid.cells().to_vec();
    for &(col, row) in cells {
        let idx = grid
            .shape()
            .flat_index(col, row)
            .expect("masked cell must lie inside the grid");
        all[idx] = None;
    }
    MaskedGrid::from_cells(grid.width(), grid.height(), all).expect("shape is unchanged")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concentration_field_range() {
        let field = create_concentration_field(10, 10);
        let values: Vec<f32> = field.valid_values().collect();
        assert_eq!(values.len(), 100);
        assert_eq!(values[0], 0.0);
        assert!((values[99] - 100.0).abs() < 1e-4);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_single_cell_field() {
        let field = create_concentration_field(1, 1);
        assert_eq!(field.cell(0), Some(0.0));
    }

    #[test]
    fn test_cycling_codes() {
        let grid = create_cycling_code_grid(3, 2, &[0, 13, 92]);
        assert_eq!(grid.get(0, 1), Some(0));
        assert_eq!(grid.get(2, 1), Some(92));
    }

    #[test]
    fn test_checkerboard_mask() {
        let mask = create_checkerboard_mask(3, 2);
        assert_eq!(mask, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_mask_cells() {
        let grid = create_uniform_code_grid(2, 2, 40);
        let masked = mask_cells(&grid, &[(1, 0), (0, 1)]);
        assert_eq!(masked.cells(), &[Some(40), None, None, Some(40)]);
    }
}

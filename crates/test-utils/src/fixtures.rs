//! Reference chart scenarios shared by the test suites.
//!
//! The SIGRID scenario is the published reference case: a 10×6 canonical
//! grid covering every code family, a co-located satellite field, and the
//! reconciled result each cell must produce.

/// SIGRID reference case, rows top to bottom.
pub mod sigrid_reference {
    pub const WIDTH: usize = 6;
    pub const HEIGHT: usize = 10;

    /// Canonical SIGRID codes.
    pub const CODES: [[u8; WIDTH]; HEIGHT] = [
        [0, 0, 1, 2, 10, 11],
        [12, 13, 14, 15, 16, 17],
        [18, 19, 20, 21, 23, 24],
        [25, 26, 27, 28, 29, 30],
        [31, 34, 35, 36, 37, 38],
        [39, 40, 41, 45, 46, 47],
        [48, 49, 50, 51, 56, 57],
        [58, 59, 60, 61, 67, 68],
        [69, 70, 71, 78, 79, 80],
        [81, 89, 90, 91, 92, 92],
    ];

    /// Satellite concentrations in percent.
    pub const TEST_FIELD: [[f32; WIDTH]; HEIGHT] = [
        [33.0, 85.0, 4.0, 92.0, 77.0, 44.0],
        [76.0, 18.0, 88.0, 18.0, 44.0, 32.0],
        [12.0, 68.0, 34.0, 37.0, 56.0, 4.0],
        [51.0, 61.0, 77.0, 7.0, 95.0, 98.0],
        [57.0, 26.0, 5.0, 17.0, 35.0, 72.0],
        [54.0, 66.0, 68.0, 9.0, 60.0, 45.0],
        [74.0, 24.0, 2.0, 93.0, 98.0, 69.0],
        [7.0, 78.0, 79.0, 77.0, 43.0, 43.0],
        [14.0, 18.0, 28.0, 37.0, 85.0, 8.0],
        [29.0, 19.0, 40.0, 6.0, 36.0, 36.0],
    ];

    /// Reconciled concentrations.
    pub const EXPECTED: [[f32; WIDTH]; HEIGHT] = [
        [0.0, 0.0, 4.0, 10.0, 10.0, 44.0],
        [20.0, 18.0, 40.0, 18.0, 44.0, 32.0],
        [12.0, 68.0, 20.0, 37.0, 30.0, 20.0],
        [50.0, 60.0, 70.0, 20.0, 90.0, 30.0],
        [57.0, 30.0, 30.0, 30.0, 35.0, 72.0],
        [54.0, 40.0, 68.0, 40.0, 60.0, 45.0],
        [74.0, 40.0, 50.0, 93.0, 60.0, 69.0],
        [50.0, 78.0, 60.0, 77.0, 60.0, 60.0],
        [60.0, 70.0, 70.0, 70.0, 85.0, 80.0],
        [80.0, 80.0, 90.0, 90.0, 100.0, 100.0],
    ];
}

/// A SIGRID chart with one illegal code (`65` at row 2, column 1).
pub mod sigrid_invalid {
    pub const WIDTH: usize = 4;
    pub const HEIGHT: usize = 4;

    pub const CODES: [[u8; WIDTH]; HEIGHT] = [
        [13, 24, 91, 91],
        [0, 1, 1, 35],
        [68, 65, 40, 79],
        [68, 92, 91, 81],
    ];

    pub const TEST_FIELD: [[f32; WIDTH]; HEIGHT] = [
        [20.0, 8.0, 100.0, 100.0],
        [86.0, 30.0, 5.0, 50.0],
        [23.0, 5.0, 57.0, 60.0],
        [61.0, 80.0, 10.0, 60.0],
    ];

    /// The illegal code.
    pub const OFFENDING_CODE: u8 = 65;
}

/// Raw values found in weekly binary charts.
pub mod bin_chart {
    /// Every concentration value a binary chart may carry.
    pub const CONCENTRATIONS: [u8; 13] = [0, 5, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 100];

    /// Non-concentration flags: fast ice, undigitized, not covered, land.
    pub const FLAGS: [u8; 4] = [108, 157, 253, 254];
}

/// A code table revision in the YAML layout read by `CodeTable::from_yaml_str`.
pub const BIN_TABLE_ALT_YAML: &str = "\
name: bin-interval
encoding: bin_interval
revision: \"alt-open-water\"
entries:
  0: 0
  5: 2
  10: 2
  20: 13
  30: 24
  40: 35
  50: 46
  60: 57
  70: 68
  80: 79
  90: 81
  95: 91
  100: 92
  99: 255
";

/// Flatten fixed-size rows into row-major order.
pub fn flatten<T: Copy, const W: usize, const H: usize>(rows: &[[T; W]; H]) -> Vec<T> {
    rows.iter().flat_map(|row| row.iter().copied()).collect()
}

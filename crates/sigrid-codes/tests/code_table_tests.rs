//! Integration tests for code tables, validation and interval resolution.

use icechart_common::{IceChartError, MaskedGrid};
use sigrid_codes::{
    canonicalize, resolve, resolve_grid, validate, ChartEncoding, ChartSource, CodeTable,
    CodeTableRegistry, ConcentrationInterval, BUILTIN_REGISTRY,
};
use test_utils::{
    code_grid, flatten, require_test_file, sigrid_invalid, sigrid_reference, temp_test_dir,
};

// ============================================================================
// Domain closure
// ============================================================================

#[test]
fn test_builtin_tables_are_closed() {
    for name in BUILTIN_REGISTRY.names() {
        let table = BUILTIN_REGISTRY.get(name).unwrap();
        for raw in table.legal_codes() {
            let canonical = table.canonical(raw).unwrap();
            assert!(
                resolve(canonical).is_ok(),
                "{}: raw {} -> canonical {} does not resolve",
                name,
                raw,
                canonical
            );
        }
    }
}

#[test]
fn test_illegal_codes_never_canonicalize() {
    for name in BUILTIN_REGISTRY.names() {
        let table = BUILTIN_REGISTRY.get(name).unwrap();
        for raw in 0..=255u8 {
            if !table.is_legal(raw) {
                let grid = MaskedGrid::from_values(1, 1, vec![raw]).unwrap();
                assert!(canonicalize(&grid, &table).is_err(), "{}: {}", name, raw);
            }
        }
    }
}

#[test]
fn test_reference_codes_are_legal_sigrid() {
    let grid = code_grid(&sigrid_reference::CODES);
    let table = BUILTIN_REGISTRY.get("sigrid").unwrap();
    validate(&grid, &table.domain()).unwrap();

    // SIGRID codes are already canonical.
    let canonical = canonicalize(&grid, &table).unwrap();
    assert_eq!(canonical, grid);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_chart_names_offending_code() {
    let grid = code_grid(&sigrid_invalid::CODES);
    let table = CodeTable::sigrid();

    match validate(&grid, &table.domain()) {
        Err(IceChartError::UnexpectedCode { codes, table }) => {
            assert_eq!(codes, vec![sigrid_invalid::OFFENDING_CODE]);
            assert_eq!(table, "sigrid");
        }
        other => panic!("expected UnexpectedCode, got {:?}", other),
    }
}

#[test]
fn test_masking_offending_cell_makes_chart_valid() {
    let values = flatten(&sigrid_invalid::CODES);
    let mask: Vec<bool> = values
        .iter()
        .map(|&v| v == sigrid_invalid::OFFENDING_CODE)
        .collect();
    let grid = MaskedGrid::with_mask(sigrid_invalid::WIDTH, sigrid_invalid::HEIGHT, values, &mask)
        .unwrap();

    assert!(validate(&grid, &CodeTable::sigrid().domain()).is_ok());
}

#[test]
fn test_percentage_codes_rejected_by_bin_table() {
    // 15 and 25 are EASE percentages; a binary chart never carries them.
    let grid = MaskedGrid::from_values(3, 1, vec![10u8, 15, 25]).unwrap();
    let err = validate(&grid, &CodeTable::bin_interval().domain()).unwrap_err();
    assert!(err.is_data_error());
    assert!(err.to_string().contains("15"));
}

// ============================================================================
// Canonicalization per encoding
// ============================================================================

#[test]
fn test_bin_chart_through_provenance() {
    let raw = vec![0u8, 5, 50, 99, 100, 108, 254, 253];
    let source = ChartSource::from_path("nic_weekly_2005_01_04_tot_v0_nh.bin").unwrap();
    let grid = source.prepare(4, 2, raw).unwrap();
    assert_eq!(grid.masked_count(), 3);

    let canonical = BUILTIN_REGISTRY
        .canonicalize(&grid, source.table_name())
        .unwrap();
    assert_eq!(
        canonical.cells(),
        &[Some(0), Some(1), Some(46), Some(255), Some(92), None, None, None]
    );
}

#[test]
fn test_ease_off_decile_codes_bracket() {
    let table = CodeTable::ease_percentage();
    for (pct, lower, upper) in [(15u8, 10.0, 20.0), (55, 50.0, 60.0), (85, 80.0, 90.0)] {
        let canonical = table.canonical(pct).unwrap();
        let interval = resolve(canonical).unwrap();
        assert_eq!(interval.bounds(), Some((lower, upper)), "pct {}", pct);
    }
}

#[test]
fn test_undetermined_codes_resolve_alike() {
    let grid = MaskedGrid::from_values(2, 1, vec![99u8, 255]).unwrap();
    let canonical = canonicalize(&grid, &CodeTable::sigrid()).unwrap();
    let intervals = resolve_grid(&canonical).unwrap();
    assert!(intervals
        .valid_values()
        .all(|i| i == ConcentrationInterval::Undetermined));
}

// ============================================================================
// Pinned table revisions
// ============================================================================

#[test]
fn test_pinned_revision_from_testdata() {
    let path = require_test_file!("bin-interval-alt.yaml");
    let table = CodeTable::from_yaml_file(&path).unwrap();

    assert_eq!(table.name(), "bin-interval");
    assert_eq!(table.encoding(), ChartEncoding::BinInterval);
    assert_eq!(table.revision(), "alt-open-water");

    let interval = resolve(table.canonical(5).unwrap()).unwrap();
    assert_eq!(interval.bounds(), Some((0.0, 10.0)));
}

#[test]
fn test_pinned_revision_replaces_builtin() {
    let path = require_test_file!("bin-interval-alt.yaml");
    let mut registry = CodeTableRegistry::builtin();

    let replaced = registry.register(CodeTable::from_yaml_file(&path).unwrap());
    assert_eq!(replaced.unwrap().revision(), "builtin");
    assert_eq!(registry.get("bin-interval").unwrap().revision(), "alt-open-water");
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_table_with_descending_range_rejected() {
    let path = require_test_file!("broken-range.yaml");
    let err = CodeTable::from_yaml_file(&path).unwrap_err();
    assert!(matches!(err, IceChartError::IntervalInversion { code: 65, .. }));
}

#[test]
fn test_written_table_reloads() {
    let dir = temp_test_dir();
    let path = dir.path().join("sigrid.yaml");

    let table = CodeTable::sigrid().with_entry("extended", 3, 2).unwrap();
    std::fs::write(&path, table.to_yaml_string().unwrap()).unwrap();

    let reloaded = CodeTable::from_yaml_file(&path).unwrap();
    assert_eq!(reloaded, table);
    assert_eq!(reloaded.canonical(3), Some(2));
}

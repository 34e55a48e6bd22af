//! Named code tables and grid canonicalization.
//!
//! [`BUILTIN_REGISTRY`] holds the three built-in tables and is never mutated
//! after first use, so it can be read from any thread without locking.
//! Campaigns that pin their own table revisions build their own
//! [`CodeTableRegistry`].

use crate::table::CodeTable;
use icechart_common::{IceChartError, IceChartResult, MaskedGrid};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Process-wide registry of the built-in tables.
pub static BUILTIN_REGISTRY: Lazy<CodeTableRegistry> = Lazy::new(CodeTableRegistry::builtin);

/// Lookup of code tables by name.
#[derive(Debug, Clone, Default)]
pub struct CodeTableRegistry {
    tables: HashMap<String, Arc<CodeTable>>,
}

impl CodeTableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the EASE, bin-interval and SIGRID tables.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CodeTable::ease_percentage());
        registry.register(CodeTable::bin_interval());
        registry.register(CodeTable::sigrid());
        registry
    }

    /// Add a table under its own name, returning any table it replaces.
    pub fn register(&mut self, table: CodeTable) -> Option<Arc<CodeTable>> {
        self.tables.insert(table.name().to_string(), Arc::new(table))
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> IceChartResult<Arc<CodeTable>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| IceChartError::UnknownTable(name.to_string()))
    }

    /// Registered table names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Canonicalize a raw grid with the named table.
    pub fn canonicalize(
        &self,
        code_grid: &MaskedGrid<u8>,
        table_name: &str,
    ) -> IceChartResult<MaskedGrid<u8>> {
        let table = self.get(table_name)?;
        canonicalize(code_grid, &table)
    }
}

/// Map every valid raw code of `code_grid` to its canonical code.
///
/// Masked cells stay masked. A raw code outside the table is reported as
/// [`IceChartError::UnexpectedCode`]; no canonical code is ever invented.
pub fn canonicalize(code_grid: &MaskedGrid<u8>, table: &CodeTable) -> IceChartResult<MaskedGrid<u8>> {
    let canonical = code_grid.try_map(|raw| table.canonical(raw).ok_or(raw));

    match canonical {
        Ok(grid) => {
            debug!(
                table = %table.name(),
                revision = %table.revision(),
                cells = grid.len(),
                "Canonicalized chart codes"
            );
            Ok(grid)
        }
        Err(_) => Err(IceChartError::UnexpectedCode {
            codes: crate::validator::unexpected_codes(code_grid, &table.domain()),
            table: table.name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{BIN_INTERVAL_TABLE, EASE_PERCENTAGE_TABLE, SIGRID_TABLE};

    #[test]
    fn test_builtin_registry_names() {
        assert_eq!(
            BUILTIN_REGISTRY.names(),
            vec![BIN_INTERVAL_TABLE, EASE_PERCENTAGE_TABLE, SIGRID_TABLE]
        );
    }

    #[test]
    fn test_unknown_table() {
        let err = BUILTIN_REGISTRY.get("nic-2003").unwrap_err();
        assert!(matches!(err, IceChartError::UnknownTable(name) if name == "nic-2003"));
    }

    #[test]
    fn test_canonicalize_bin_grid() {
        let grid = MaskedGrid::from_cells(
            4,
            1,
            vec![Some(20u8), None, Some(99), Some(100)],
        )
        .unwrap();
        let canonical = BUILTIN_REGISTRY
            .canonicalize(&grid, BIN_INTERVAL_TABLE)
            .unwrap();
        assert_eq!(canonical.cells(), &[Some(13), None, Some(255), Some(92)]);
    }

    #[test]
    fn test_canonicalize_never_invents_codes() {
        let grid = MaskedGrid::from_values(3, 1, vec![20u8, 15, 25]).unwrap();
        let err = BUILTIN_REGISTRY
            .canonicalize(&grid, BIN_INTERVAL_TABLE)
            .unwrap_err();
        assert!(matches!(
            err,
            IceChartError::UnexpectedCode { codes, .. } if codes == vec![15, 25]
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CodeTableRegistry::builtin();
        let pinned = CodeTable::bin_interval().with_entry("alt", 5, 2).unwrap();
        let previous = registry.register(pinned).unwrap();
        assert_eq!(previous.revision(), "builtin");
        assert_eq!(registry.get(BIN_INTERVAL_TABLE).unwrap().canonical(5), Some(2));
        assert_eq!(registry.len(), 3);
    }
}

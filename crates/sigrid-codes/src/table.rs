//! Source code tables and their mapping onto canonical SIGRID codes.
//!
//! A [`CodeTable`] lists every raw code that is legal for one chart encoding
//! together with the canonical code it stands for. Tables are plain values:
//! the built-in revisions below can be replaced per validation campaign by a
//! YAML file, see [`CodeTable::from_yaml_file`].

use crate::interval::{self, UNDETERMINED, UNDETERMINED_SIGRID};
use crate::validator::CodeDomain;
use icechart_common::{IceChartError, IceChartResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the built-in EASE percentage table.
pub const EASE_PERCENTAGE_TABLE: &str = "ease-percentage";
/// Name of the built-in bin-interval table.
pub const BIN_INTERVAL_TABLE: &str = "bin-interval";
/// Name of the built-in SIGRID table.
pub const SIGRID_TABLE: &str = "sigrid";

/// Revision tag carried by the built-in tables.
pub const BUILTIN_REVISION: &str = "builtin";

/// Encoding scheme a chart's raw codes are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartEncoding {
    /// Concentration in 5% steps, `99` for undetermined.
    EasePercentage,
    /// Coarse decile bins from the weekly binary charts.
    BinInterval,
    /// Two-digit SIGRID concentration codes.
    Sigrid,
}

impl ChartEncoding {
    /// Name of the built-in table for this encoding.
    pub fn default_table_name(&self) -> &'static str {
        match self {
            ChartEncoding::EasePercentage => EASE_PERCENTAGE_TABLE,
            ChartEncoding::BinInterval => BIN_INTERVAL_TABLE,
            ChartEncoding::Sigrid => SIGRID_TABLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartEncoding::EasePercentage => "ease_percentage",
            ChartEncoding::BinInterval => "bin_interval",
            ChartEncoding::Sigrid => "sigrid",
        }
    }
}

impl fmt::Display for ChartEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One revision of a raw → canonical code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    name: String,
    encoding: ChartEncoding,
    revision: String,
    entries: BTreeMap<u8, u8>,
}

/// On-disk layout of a code table.
///
/// ```yaml
/// name: bin-interval-2010
/// encoding: bin_interval
/// revision: "2010"
/// entries:
///   0: 0
///   5: 2
///   10: 2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CodeTableFile {
    name: String,
    encoding: ChartEncoding,
    #[serde(default)]
    revision: Option<String>,
    entries: BTreeMap<u8, u8>,
}

impl CodeTable {
    /// Build a table and check that it is closed over the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`IceChartError::InvalidConfig`] if the table is empty, or the
    /// resolver's error for the first canonical code that does not resolve.
    pub fn new(
        name: impl Into<String>,
        encoding: ChartEncoding,
        revision: impl Into<String>,
        entries: impl IntoIterator<Item = (u8, u8)>,
    ) -> IceChartResult<Self> {
        let table = Self {
            name: name.into(),
            encoding,
            revision: revision.into(),
            entries: entries.into_iter().collect(),
        };

        if table.entries.is_empty() {
            return Err(IceChartError::InvalidConfig(format!(
                "code table '{}' has no entries",
                table.name
            )));
        }
        table.check_closure()?;

        Ok(table)
    }

    /// Fail unless every canonical code in the table resolves to an interval.
    pub fn check_closure(&self) -> IceChartResult<()> {
        for &canonical in self.entries.values() {
            interval::resolve(canonical)?;
        }
        Ok(())
    }

    /// EASE percentage codes: 5% steps, `99` undetermined.
    ///
    /// Deciles pass through unchanged. The off-decile steps `15` … `85` have
    /// no canonical equivalent; they map onto the decile range that brackets
    /// them (`15 → 12`, `65 → 67`).
    pub fn ease_percentage() -> Self {
        let mut entries: Vec<(u8, u8)> = (0..=90)
            .step_by(10)
            .map(|decile| (decile, decile))
            .collect();
        entries.extend((15..=85).step_by(10).map(|pct: u8| {
            let lower = pct / 10;
            (pct, lower * 10 + lower + 1)
        }));
        entries.extend([(5, 1), (95, 91), (100, 92), (UNDETERMINED_SIGRID, UNDETERMINED)]);

        Self::builtin(EASE_PERCENTAGE_TABLE, ChartEncoding::EasePercentage, entries)
    }

    /// Bin-interval codes from the weekly binary charts.
    pub fn bin_interval() -> Self {
        Self::builtin(
            BIN_INTERVAL_TABLE,
            ChartEncoding::BinInterval,
            [
                (0, 0),
                (5, 1),
                (10, 2),
                (20, 13),
                (30, 24),
                (40, 35),
                (50, 46),
                (60, 57),
                (70, 68),
                (80, 79),
                (90, 81),
                (95, 91),
                (100, 92),
                (UNDETERMINED_SIGRID, UNDETERMINED),
            ],
        )
    }

    /// SIGRID concentration codes, already canonical.
    ///
    /// Legal: `00`, `01`, `02`, exact deciles `10` … `90`, open-ended `x1`
    /// codes `11` … `91`, ascending pairs such as `13` or `79`, `92`, and the
    /// undetermined codes `99` and `255`. Both undetermined codes
    /// canonicalize to `255`.
    pub fn sigrid() -> Self {
        let mut entries = vec![
            (interval::ICE_FREE, interval::ICE_FREE),
            (interval::OPEN_WATER, interval::OPEN_WATER),
            (interval::BERGY_WATER, interval::BERGY_WATER),
            (interval::FULL_COVER, interval::FULL_COVER),
            (UNDETERMINED_SIGRID, UNDETERMINED),
            (UNDETERMINED, UNDETERMINED),
        ];
        for tens in 1..=9u8 {
            entries.push((tens * 10, tens * 10));
            entries.push((tens * 10 + 1, tens * 10 + 1));
            for units in (tens + 1)..=9 {
                entries.push((tens * 10 + units, tens * 10 + units));
            }
        }

        Self::builtin(SIGRID_TABLE, ChartEncoding::Sigrid, entries)
    }

    /// Built-in tables are closure-checked by the test suite.
    fn builtin(
        name: &str,
        encoding: ChartEncoding,
        entries: impl IntoIterator<Item = (u8, u8)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            encoding,
            revision: BUILTIN_REVISION.to_string(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a table from YAML text.
    pub fn from_yaml_str(yaml: &str) -> IceChartResult<Self> {
        let file: CodeTableFile = serde_yaml::from_str(yaml)?;
        Self::new(
            file.name,
            file.encoding,
            file.revision.unwrap_or_default(),
            file.entries,
        )
    }

    /// Load a table from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> IceChartResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            IceChartError::InvalidConfig(format!("Cannot read {:?}: {}", path, e))
        })?;
        let table = Self::from_yaml_str(&contents)?;

        debug!(
            table = %table.name,
            revision = %table.revision,
            entries = table.len(),
            path = ?path,
            "Loaded code table"
        );

        Ok(table)
    }

    /// Serialize the table in the layout read by [`from_yaml_str`](Self::from_yaml_str).
    pub fn to_yaml_string(&self) -> IceChartResult<String> {
        let file = CodeTableFile {
            name: self.name.clone(),
            encoding: self.encoding,
            revision: Some(self.revision.clone()),
            entries: self.entries.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Derive a new revision that overrides or adds one entry.
    ///
    /// ```ignore
    /// let pinned = CodeTable::bin_interval().with_entry("2010", 5, 2)?;
    /// ```
    pub fn with_entry(&self, revision: impl Into<String>, raw: u8, canonical: u8) -> IceChartResult<Self> {
        let mut entries = self.entries.clone();
        entries.insert(raw, canonical);
        Self::new(self.name.clone(), self.encoding, revision, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoding(&self) -> ChartEncoding {
        self.encoding
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Canonical code for a raw code, `None` if the raw code is not legal.
    #[inline]
    pub fn canonical(&self, raw: u8) -> Option<u8> {
        self.entries.get(&raw).copied()
    }

    #[inline]
    pub fn is_legal(&self, raw: u8) -> bool {
        self.entries.contains_key(&raw)
    }

    /// Legal raw codes in ascending order.
    pub fn legal_codes(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }

    /// The legal raw codes as a validation domain.
    pub fn domain(&self) -> CodeDomain {
        CodeDomain::new(self.name.clone(), self.legal_codes())
    }

    /// Number of legal raw codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

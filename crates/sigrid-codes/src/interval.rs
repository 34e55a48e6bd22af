//! Canonical SIGRID code → concentration interval resolution.
//!
//! A canonical code is a two-digit SIGRID code. Its tens and units digits
//! each name a concentration decile, with a handful of literal codes for
//! open water, full cover and "undetermined". Resolution is a single ordered
//! classification; every code lands in exactly one [`CodeCategory`] or is
//! rejected.

use icechart_common::{IceChartError, IceChartResult, MaskedGrid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Ice-free water.
pub const ICE_FREE: u8 = 0;
/// Open water, less than one tenth of ice.
pub const OPEN_WATER: u8 = 1;
/// Bergy water.
pub const BERGY_WATER: u8 = 2;
/// Ten tenths of ice, full cover.
pub const FULL_COVER: u8 = 92;
/// Undetermined or unknown, as written on SIGRID charts.
pub const UNDETERMINED_SIGRID: u8 = 99;
/// Undetermined; the sentinel every code table canonicalizes into.
pub const UNDETERMINED: u8 = 255;

/// Concentration range a coded chart cell is known to represent, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConcentrationInterval {
    /// `lower <= upper`, both within `[0, 100]`.
    Defined { lower: f32, upper: f32 },
    /// The chart states that the concentration is unknown.
    Undetermined,
}

impl ConcentrationInterval {
    /// The interval bounds, or `None` if undetermined.
    pub fn bounds(&self) -> Option<(f32, f32)> {
        match *self {
            ConcentrationInterval::Defined { lower, upper } => Some((lower, upper)),
            ConcentrationInterval::Undetermined => None,
        }
    }

    pub fn lower(&self) -> Option<f32> {
        self.bounds().map(|(lower, _)| lower)
    }

    pub fn upper(&self) -> Option<f32> {
        self.bounds().map(|(_, upper)| upper)
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, ConcentrationInterval::Undetermined)
    }

    /// True when the interval is a single value.
    pub fn is_exact(&self) -> bool {
        matches!(self.bounds(), Some((lower, upper)) if lower == upper)
    }
}

/// Mutually exclusive categories of canonical codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeCategory {
    /// `99` or `255`.
    Undetermined,
    /// `00`.
    IceFree,
    /// `01` and `02`; open water and bergy water share one interval.
    OpenWater,
    /// `92`.
    FullCover,
    /// `x1` codes (`11`, `21`, … `91`): this tier or higher.
    OpenEnded { lower: u8 },
    /// `10`, `20`, … `90`.
    ExactDecile(u8),
    /// Two distinct non-zero digits such as `13` or `46`.
    ///
    /// Carries the digits as written; a descending pair like `65` is
    /// classified here and rejected by [`resolve`] as an inversion.
    Range { lower: u8, upper: u8 },
}

impl CodeCategory {
    /// Classify a canonical code, or `None` if no rule applies.
    pub fn classify(code: u8) -> Option<Self> {
        let tens = 10 * (code / 10);
        let units = 10 * (code % 10);

        match code {
            UNDETERMINED | UNDETERMINED_SIGRID => Some(CodeCategory::Undetermined),
            ICE_FREE => Some(CodeCategory::IceFree),
            OPEN_WATER | BERGY_WATER => Some(CodeCategory::OpenWater),
            FULL_COVER => Some(CodeCategory::FullCover),
            // Only two-digit codes carry decile semantics.
            100..=u8::MAX => None,
            _ if tens == 0 => None,
            _ if units == 10 => Some(CodeCategory::OpenEnded { lower: tens }),
            _ if units == 0 => Some(CodeCategory::ExactDecile(code)),
            _ if tens != units => Some(CodeCategory::Range {
                lower: tens,
                upper: units,
            }),
            _ => None,
        }
    }

    /// The interval this category denotes, without the ordering check.
    pub fn interval(&self) -> ConcentrationInterval {
        let defined = |lower: u8, upper: u8| ConcentrationInterval::Defined {
            lower: f32::from(lower),
            upper: f32::from(upper),
        };

        match *self {
            CodeCategory::Undetermined => ConcentrationInterval::Undetermined,
            CodeCategory::IceFree => defined(0, 0),
            CodeCategory::OpenWater => defined(0, 10),
            CodeCategory::FullCover => defined(100, 100),
            CodeCategory::OpenEnded { lower } => defined(lower, 100),
            CodeCategory::ExactDecile(decile) => defined(decile, decile),
            CodeCategory::Range { lower, upper } => defined(lower, upper),
        }
    }
}

/// Resolve one canonical code into its concentration interval.
///
/// # Errors
///
/// - [`IceChartError::UnresolvedCode`] if the code matches no rule.
/// - [`IceChartError::IntervalInversion`] if the code's digits describe a
///   descending range.
pub fn resolve(code: u8) -> IceChartResult<ConcentrationInterval> {
    let category = CodeCategory::classify(code).ok_or(IceChartError::UnresolvedCode(code))?;
    let interval = category.interval();

    if let Some((lower, upper)) = interval.bounds() {
        if lower > upper {
            error!(code, lower, upper, "Code resolves to an inverted interval");
            return Err(IceChartError::IntervalInversion { code, lower, upper });
        }
    }

    Ok(interval)
}

/// Resolve every valid cell of a canonical grid.
///
/// Each distinct code is resolved once. Masked cells stay masked; an
/// undetermined code becomes [`ConcentrationInterval::Undetermined`] so that
/// callers can count it separately from missing data.
pub fn resolve_grid(canonical: &MaskedGrid<u8>) -> IceChartResult<MaskedGrid<ConcentrationInterval>> {
    let distinct: BTreeSet<u8> = canonical.valid_values().collect();

    let mut lookup = [None; 256];
    for &code in &distinct {
        lookup[usize::from(code)] = Some(resolve(code)?);
    }

    debug!(
        distinct_codes = distinct.len(),
        cells = canonical.len(),
        "Resolved canonical codes"
    );

    canonical.try_map(|code| {
        lookup[usize::from(code)].ok_or(IceChartError::UnresolvedCode(code))
    })
}

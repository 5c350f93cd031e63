//! Canonical short strings for KPI values.
//!
//! Thresholds and decimal counts are fixed: at or above one million values
//! are shown in `M`, at or above one thousand in `k`, and below that at the
//! unit's own precision.

/// Rendered in place of a value that is absent or not finite.
pub const NO_DATA: &str = "N/A";

const MEGA: f64 = 1_000_000.0;
const KILO: f64 = 1_000.0;

/// Semantic unit of a displayed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Pounds sterling
    Currency,
    /// Litres
    Volume,
    Percentage,
    /// Pence per litre
    Rate,
    Count,
}

impl Unit {
    /// Decimals for the `M`, `k` and unscaled tiers.
    const fn decimals(self) -> (usize, usize, usize) {
        match self {
            Self::Currency => (2, 1, 2),
            Self::Volume => (2, 0, 0),
            Self::Percentage => (2, 1, 1),
            Self::Rate => (2, 1, 2),
            Self::Count => (2, 1, 0),
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Currency => "£",
            _ => "",
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Volume => " L",
            Self::Percentage => "%",
            Self::Rate => " p",
            Self::Currency | Self::Count => "",
        }
    }
}

/// Formats `value` in `unit`, e.g. `£1.23M`, `430k L`, `12.5%`, `6.02 p`.
pub fn format_value(value: f64, unit: Unit) -> String {
    if !value.is_finite() {
        return NO_DATA.to_string();
    }

    let magnitude = value.abs();
    let (mega, kilo, base) = unit.decimals();
    let tiers = [(MEGA, "M", mega), (KILO, "k", kilo), (1.0, "", base)];

    let mut tier = tiers
        .iter()
        .position(|(threshold, ..)| magnitude >= *threshold)
        .unwrap_or(tiers.len() - 1);
    // Rounding may carry into the next tier: 999.96 at one decimal is 1000.0
    if tier > 0 && rounded(magnitude / tiers[tier].0, tiers[tier].2) >= KILO {
        tier -= 1;
    }

    let (divisor, multiplier, decimals) = tiers[tier];
    let scaled = magnitude / divisor;
    let digits = format!("{scaled:.decimals$}");
    // No "-0.00" for tiny negatives
    let sign = if value < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{digits}{multiplier}{}",
        unit.prefix(),
        unit.suffix()
    )
}

fn rounded(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Formats an optional value, rendering absence as [`NO_DATA`].
pub fn format_optional(value: Option<f64>, unit: Unit) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format_value(v, unit))
}

/// Recovers the number and unit behind a formatted string.
///
/// Strips currency and unit decoration and thousands separators, and
/// expands `M` and `k`/`K`. Exact (up to float representation) for strings
/// produced by [`format_value`]. Returns `None` for [`NO_DATA`] and anything
/// that is not a number.
pub fn reconstruct(formatted: &str) -> Option<(f64, Unit)> {
    let mut rest = formatted.trim();
    let negative = rest.starts_with('-');
    if negative {
        rest = &rest[1..];
    }
    let mut unit = Unit::Count;

    if let Some(stripped) = rest.strip_prefix('£') {
        unit = Unit::Currency;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix('%') {
        unit = Unit::Percentage;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix('L') {
        unit = Unit::Volume;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix('p') {
        unit = Unit::Rate;
        rest = stripped;
    }
    let rest = rest.trim_end();

    let (digits, multiplier) = match rest.chars().last()? {
        'M' => (&rest[..rest.len() - 1], MEGA),
        'k' | 'K' => (&rest[..rest.len() - 1], KILO),
        _ => (rest, 1.0),
    };

    let cleaned: String = digits.chars().filter(|c| *c != ',' && *c != ' ').collect();
    let number: f64 = cleaned.parse().ok()?;
    if !number.is_finite() {
        return None;
    }

    let value = number * multiplier;
    Some((if negative { -value } else { value }, unit))
}

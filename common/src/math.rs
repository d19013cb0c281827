//! Exact lovelace / ADA arithmetic

use bigdecimal::{BigDecimal, Signed, ToPrimitive};

use crate::Lovelace;

pub const LOVELACE_PER_ADA: u64 = 1_000_000;

const ADA_DECIMALS: u32 = 6;

/// Largest ADA amount whose lovelace value fits in a `u64`
pub fn max_ada() -> BigDecimal {
    lovelace_to_ada(Lovelace::MAX)
}

/// Convert an ADA amount to whole lovelace, truncating any sub-lovelace
/// fraction. Amounts that are not strictly positive give zero; amounts past
/// [`max_ada`] saturate to `Lovelace::MAX`.
pub fn ada_to_lovelace(ada: &BigDecimal) -> Lovelace {
    if !ada.is_positive() {
        return 0;
    }
    // Bound checks first so huge exponents are never expanded
    if *ada >= max_ada() {
        return Lovelace::MAX;
    }
    if *ada < lovelace_to_ada(1) {
        return 0;
    }
    (ada * BigDecimal::from(LOVELACE_PER_ADA))
        .with_scale(0)
        .to_u64()
        .unwrap_or(Lovelace::MAX)
}

/// Exact ADA value of a lovelace quantity
pub fn lovelace_to_ada(lovelace: Lovelace) -> BigDecimal {
    BigDecimal::new(lovelace.into(), ADA_DECIMALS as i64)
}

/// Lossy ADA value for display and layout maths
pub fn lovelace_to_ada_f64(lovelace: Lovelace) -> f64 {
    lovelace as f64 / LOVELACE_PER_ADA as f64
}

/// Render a (possibly negative) lovelace quantity as ADA with `decimals`
/// fraction digits, rounding half away from zero.
pub fn format_ada(lovelace: i128, decimals: u32) -> String {
    let decimals = decimals.min(ADA_DECIMALS);
    let divisor = 10i128.pow(ADA_DECIMALS - decimals);
    let magnitude = lovelace.unsigned_abs() as i128;
    let rounded = (magnitude + divisor / 2) / divisor;

    let sign = if lovelace < 0 && rounded != 0 { "-" } else { "" };
    if decimals == 0 {
        return format!("{sign}{rounded}");
    }
    let scale = 10i128.pow(decimals);
    format!(
        "{sign}{}.{:0width$}",
        rounded / scale,
        rounded % scale,
        width = decimals as usize
    )
}

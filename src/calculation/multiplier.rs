//! Decimal multiplier helpers shared by the adjustment stages.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Multiplies a whole-won amount by `multiplier`, truncating toward zero.
///
/// Negative amounts are clamped to zero first; results that do not fit in
/// an `i64` saturate.
pub fn apply_multiplier(amount: i64, multiplier: Decimal) -> i64 {
    let product = (Decimal::from(amount.max(0)) * multiplier).trunc();
    product
        .to_i64()
        .unwrap_or(if product.is_sign_negative() { 0 } else { i64::MAX })
        .max(0)
}

/// Formats the distance of `multiplier` from 1 as a whole percentage.
///
/// `0.9` and `1.1` both give `"10"`; `0.5` gives `"50"`.
pub fn percent_from_one(multiplier: Decimal) -> String {
    ((multiplier - Decimal::ONE).abs() * Decimal::ONE_HUNDRED)
        .normalize()
        .to_string()
}

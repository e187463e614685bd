//! Decimal rounding for published prices and scores.

/// Decimal places used for every published price.
pub const PRICE_DECIMALS: i32 = 8;

/// Round half away from zero to `decimals` places.
pub fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round_price(value: f64) -> f64 {
    round_dp(value, PRICE_DECIMALS)
}

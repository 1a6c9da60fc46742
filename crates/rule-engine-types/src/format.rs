//! Text forms of numbers and dates

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// External date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest magnitude printed through the integer path without loss
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Decimal places kept before trailing zeros are dropped
const OUTPUT_SCALE: u32 = 12;

/// Render a number the way rule effects expect it.
///
/// Integral values have no decimal point (`3`, not `3.0`). Other values are
/// rounded to 12 decimal places and printed without trailing zeros, which hides
/// binary floating point noise: `2.6 % 2` renders as `0.6`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        return format!("{}", value as i64);
    }
    match Decimal::from_f64(value) {
        Some(decimal) => decimal.round_dp(OUTPUT_SCALE).normalize().to_string(),
        None => value.to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

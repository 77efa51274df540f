//! Safe numeric parsing for untrusted cells
//!
//! Nothing here fails or produces NaN; unusable input is 0.

use crate::services::inference::predicates::normalize_number;

/// Parse a cell as a number, 0.0 when it is not one
pub fn parse_number(cell: &str) -> f64 {
    normalize_number(cell)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a cell as a non-negative count, rounding fractions
pub fn parse_count(cell: &str) -> u64 {
    let value = parse_number(cell);
    if value > 0.0 { value.round() as u64 } else { 0 }
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0
pub fn rate(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Percentage change from `previous` to `current`, 0 without a baseline
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

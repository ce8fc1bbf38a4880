//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Round a f64 to the nearest integer (half away from zero), returning 0.0
/// for NaN values.
#[must_use]
pub fn round_to_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.round() }
}

/// Round a f64 to one decimal place (half away from zero), returning 0.0 for
/// non-finite values.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    }
}

/// Mean of an integer sum over a count, 0.0 when the count is zero.
#[must_use]
pub fn mean(sum: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let divisor = cast::<usize, f64>(count).unwrap_or(1.0);
    i64_to_f64(sum) / divisor
}

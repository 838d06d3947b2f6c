//! Fixed-precision rounding used for distances and money.

/// Rounds `value` to `places` decimal places, half away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

#[must_use]
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// Converts a provider distance in meters to kilometers at 2dp.
#[must_use]
pub fn meters_to_km(meters: f64) -> f64 {
    round2(meters / 1000.0)
}

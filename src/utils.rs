//! Utility functions for rounding, percentages and duration text.

/// Round a value to a fixed number of decimal places
///
/// Non-finite values are returned unchanged.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Convert a fraction `part / whole` into a rounded percentage.
///
/// Returns `fallback` when `whole` is zero. The result is clamped to `0..=100`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // session durations are far below 2^52 ms
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100 first
pub fn percentage(part: u64, whole: u64, fallback: u32) -> u32 {
    if whole == 0 {
        return fallback;
    }
    let pct = (part as f64 / whole as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Format a millisecond duration as `"1h 2m 3s"`, `"2m 3s"` or `"3s"`
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

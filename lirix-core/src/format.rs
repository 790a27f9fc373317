//! Display formatting for timestamps and measurements.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

/// `Friday, October 16 2015 @ 12:53:20PM (UTC)`
const FULL_TIMESTAMP: &str = "%A, %B %-d %Y @ %I:%M:%S%p (%Z)";
/// `06:00:00am (UTC)`
const CLOCK_TIME: &str = "%I:%M:%S%P (%Z)";
/// `Fri 12:53pm`
const SHORT_TIMESTAMP: &str = "%a %-I:%M%P";

const KELVIN_OFFSET: f64 = 273.15;

fn at(tz: &Tz, unix_seconds: i64) -> Option<DateTime<Tz>> {
    tz.timestamp_opt(unix_seconds, 0).single()
}

pub fn full_timestamp(tz: &Tz, unix_seconds: i64) -> Option<String> {
    at(tz, unix_seconds).map(|t| t.format(FULL_TIMESTAMP).to_string())
}

pub fn clock_time(tz: &Tz, unix_seconds: i64) -> Option<String> {
    at(tz, unix_seconds).map(|t| t.format(CLOCK_TIME).to_string())
}

pub fn short_timestamp(tz: &Tz, unix_seconds: i64) -> Option<String> {
    at(tz, unix_seconds).map(|t| t.format(SHORT_TIMESTAMP).to_string())
}

/// Kelvin to Celsius with two decimals.
///
/// The difference is narrowed to `f32` before rendering so that values such
/// as `300 - 273.15 = 26.850000000000023` print as `26.85`.
pub fn celsius_from_kelvin(kelvin: f64) -> String {
    format!("{:.2}", (kelvin - KELVIN_OFFSET) as f32)
}

/// Whole-number percentage. Exact halves round to even (`2.5` -> `2`).
pub fn whole_percent(value: f64) -> String {
    format!("{:.0}", value as f32)
}

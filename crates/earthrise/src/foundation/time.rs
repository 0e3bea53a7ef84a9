//! Time management utilities
//!
//! [`TimeInstant`] is the absolute time every ephemeris computation is a pure
//! function of. [`Stopwatch`] measures render durations in the redraw loop.

use chrono::{DateTime, TimeZone, Utc};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Seconds in one day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian day of the Unix epoch (1970-01-01T00:00:00Z)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian day of the J2000.0 epoch (2000-01-01T12:00:00Z)
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Absolute instant as fractional seconds since the Unix epoch (UTC)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct TimeInstant(f64);

impl TimeInstant {
    /// The J2000.0 epoch
    pub const J2000: Self = Self(946_728_000.0);

    /// Create an instant from Unix seconds
    pub const fn from_unix_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64());
        Self(seconds)
    }

    /// Convert from a UTC timestamp
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let whole = datetime.timestamp() as f64;
        let frac = f64::from(datetime.timestamp_subsec_nanos()) * 1e-9;
        Self(whole + frac)
    }

    /// Convert to a UTC timestamp, or `None` when out of chrono's range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let whole = self.0.floor();
        let nanos = ((self.0 - whole) * 1e9).round().min(999_999_999.0) as u32;
        Utc.timestamp_opt(whole as i64, nanos).single()
    }

    /// Unix seconds
    pub const fn seconds(self) -> f64 {
        self.0
    }

    /// This instant shifted by `seconds`
    pub fn offset(self, seconds: f64) -> Self {
        Self(self.0 + seconds)
    }

    /// Julian day: `2440587.5 + t / 86400`
    pub fn julian_day(self) -> f64 {
        UNIX_EPOCH_JD + self.0 / SECONDS_PER_DAY
    }

    /// Days elapsed since J2000.0 (negative before it)
    pub fn days_since_j2000(self) -> f64 {
        self.julian_day() - J2000_JD
    }

    /// Julian centuries elapsed since J2000.0
    pub fn julian_centuries(self) -> f64 {
        self.days_since_j2000() / DAYS_PER_JULIAN_CENTURY
    }
}

impl std::fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub const fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub const fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_j2000_julian_day() {
        assert_relative_eq!(TimeInstant::J2000.julian_day(), J2000_JD);
        assert_relative_eq!(TimeInstant::J2000.days_since_j2000(), 0.0);
        assert_relative_eq!(TimeInstant::J2000.julian_centuries(), 0.0);
    }

    #[test]
    fn test_unix_epoch_julian_day() {
        assert_relative_eq!(TimeInstant::from_unix_seconds(0.0).julian_day(), UNIX_EPOCH_JD);
    }

    #[test]
    fn test_one_day_later() {
        let t = TimeInstant::J2000.offset(SECONDS_PER_DAY);
        assert_relative_eq!(t.days_since_j2000(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let t = TimeInstant::from_datetime(dt);
        assert_eq!(t, TimeInstant::J2000);
        assert_eq!(t.to_datetime(), Some(dt));
    }

    #[test]
    fn test_fractional_seconds_survive_conversion() {
        let t = TimeInstant::from_unix_seconds(1_700_000_000.25);
        let back = TimeInstant::from_datetime(t.to_datetime().unwrap());
        assert_relative_eq!(back.seconds(), t.seconds(), epsilon = 1e-6);
    }

    #[test]
    fn test_stopwatch_accumulates() {
        let mut stopwatch = Stopwatch::start_new();
        assert!(stopwatch.is_running());
        stopwatch.stop();
        assert!(!stopwatch.is_running());
        let first = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), first);
    }
}

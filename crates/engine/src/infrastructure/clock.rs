//! Clock implementations.

use chrono::{DateTime, NaiveDate, Utc};

use crate::infrastructure::ports::ClockPort;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Fixed clock for testing calendar boundaries.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl FixedClock {
    /// Pin the clock to an RFC 3339 instant.
    pub fn at(instant: &str) -> Self {
        Self(
            DateTime::parse_from_rfc3339(instant)
                .expect("fixed clock instant must be RFC 3339")
                .into(),
        )
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_date() {
        let clock = FixedClock::at("2024-03-01T09:30:00Z");
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(clock.now().timestamp(), 1709285400);
    }
}

// ⏰ Clock
// Personal Year depends on "now"; the engine asks a Clock instead of Utc::now()

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant (tests, replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on Jan 1st of `year` (falls back to the epoch for unrepresentable years)
    pub fn at_year(year: i32) -> Self {
        use chrono::TimeZone;
        FixedClock(
            Utc.with_ymd_and_hms(year, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_fixed_clock_year() {
        assert_eq!(FixedClock::at_year(2026).now().year(), 2026);
        assert_eq!(FixedClock::at_year(2027).now().year(), 2027);
    }

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemClock.now().year() >= 2024);
    }
}

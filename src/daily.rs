//! Countdown to the daily leaderboard reset

use std::fmt;

/// Milliseconds in a day
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Time left until 23:59:59.999 local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCountdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DailyCountdown {
    /// Build from milliseconds elapsed since local midnight
    pub fn until_end_of_day(ms_since_midnight: u64) -> Self {
        let end_of_day = DAY_MS - 1;
        let diff = end_of_day.saturating_sub(ms_since_midnight);
        Self {
            hours: diff / (60 * 60 * 1000),
            minutes: (diff % (60 * 60 * 1000)) / (60 * 1000),
            seconds: (diff % (60 * 1000)) / 1000,
        }
    }

    /// Current countdown from the browser clock
    #[cfg(target_arch = "wasm32")]
    pub fn now() -> Self {
        let date = js_sys::Date::new_0();
        let ms = date.get_hours() as u64 * 3_600_000
            + date.get_minutes() as u64 * 60_000
            + date.get_seconds() as u64 * 1000
            + date.get_milliseconds() as u64;
        Self::until_end_of_day(ms)
    }
}

impl fmt::Display for DailyCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

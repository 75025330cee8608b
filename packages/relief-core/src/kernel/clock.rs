use chrono::{DateTime, Datelike, Local, Utc, Weekday};

use super::BaseClock;

/// Wall-clock time. "Today" follows the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> Weekday {
        Local::now().weekday()
    }
}

//! RTC time source abstraction consumed by [`crate::gb::rtc`].

use chrono::{Datelike, TimeZone, Timelike, Utc};

/// A host-supplied clock. `sample` lets stateful sources (e.g. one backed by
/// a save file's stored offset) advance internal bookkeeping immediately
/// before a latch; `unix_time` returns the time to latch from.
pub trait ClockSource {
    fn sample(&mut self);
    fn unix_time(&self) -> i64;
}

/// Falls back to the host's wall clock when no [`ClockSource`] is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClockSource;

impl ClockSource for SystemClockSource {
    fn sample(&mut self) {}

    fn unix_time(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Broken-down local time fields needed by the RTC latch, derived from a
/// unix timestamp interpreted in UTC (the hardware has no timezone concept).
pub(crate) struct BrokenDownTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_of_year: u16,
}

pub(crate) fn break_down_unix_time(unix_time: i64) -> BrokenDownTime {
    let dt = Utc.timestamp_opt(unix_time, 0).single().unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());

    BrokenDownTime {
        seconds: dt.second() as u8,
        minutes: dt.minute() as u8,
        hours: dt.hour() as u8,
        day_of_year: (dt.ordinal0()) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_breakdown() {
        let broken = break_down_unix_time(0);

        assert_eq!(broken.seconds, 0);
        assert_eq!(broken.minutes, 0);
        assert_eq!(broken.hours, 0);
        // January 1st is ordinal day 1, ordinal0 is 0.
        assert_eq!(broken.day_of_year, 0);
    }
}

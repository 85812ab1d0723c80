//! Time-of-day gating for long-running batches.

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};

use crate::types::TimeWindow;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Decides whether batch processing may run right now.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindowGate {
    window: Option<TimeWindow>,
}

impl TimeWindowGate {
    /// Create a gate for an optional window. `None` is always open.
    pub fn new(window: Option<TimeWindow>) -> Self {
        Self { window }
    }

    /// Returns the configured window.
    pub fn window(&self) -> Option<&TimeWindow> {
        self.window.as_ref()
    }

    /// Returns true if processing may run at `now`.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        is_open(self.window.as_ref(), now)
    }
}

/// Returns true if processing may run at `now`.
///
/// No window, or a Saturday or Sunday, is always open. Otherwise the hour
/// of `now` must fall inside the window.
pub fn is_open(window: Option<&TimeWindow>, now: NaiveDateTime) -> bool {
    let Some(window) = window else {
        return true;
    };

    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return true;
    }

    window.contains_hour(now.hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, WindowError};
    use chrono::NaiveDate;

    // 2018-02-01 is a Thursday.
    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 2, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Parse the window first, so a bad window fails on any date.
    fn open_str(window: &str, now: NaiveDateTime) -> crate::Result<bool> {
        let window = TimeWindow::new(window)?;
        Ok(is_open(Some(&window), now))
    }

    fn open(window: &str, day: u32, hour: u32) -> bool {
        open_str(window, at(day, hour)).unwrap()
    }

    #[test]
    fn no_window_is_always_open() {
        for hour in 0..24 {
            assert!(is_open(None, at(1, hour)));
        }
        assert!(TimeWindowGate::default().is_open(at(1, 12)));
    }

    #[test]
    fn inside_window() {
        assert!(open("19-06", 1, 4));
        assert!(open("01-23", 1, 1));
        assert!(open("23-00", 1, 23));
    }

    #[test]
    fn outside_window() {
        assert!(!open("23-00", 1, 0));
        assert!(!open("19-06", 1, 6));
        assert!(!open("19-06", 1, 10));
        assert!(!open("04-06", 1, 10));
        assert!(!open("01-23", 1, 0));
    }

    #[test]
    fn weekends_are_always_open() {
        assert!(open("11-12", 3, 1));
        assert!(open("11-12", 4, 1));
        assert!(!open("11-12", 5, 1));
    }

    #[test]
    fn bad_windows_fail_on_any_date() {
        for day in [1, 3] {
            let err = open_str("99-14", at(day, 4)).unwrap_err();
            assert!(matches!(err, Error::Window(WindowError::InvalidRange { .. })));

            let err = open_str("1-23", at(day, 4)).unwrap_err();
            assert!(matches!(err, Error::Window(WindowError::Malformed { .. })));
        }
    }

    #[test]
    fn gate_uses_its_window() {
        let gate = TimeWindowGate::new(Some(TimeWindow::new("19-06").unwrap()));
        assert!(gate.is_open(at(1, 20)));
        assert!(!gate.is_open(at(1, 12)));
    }
}

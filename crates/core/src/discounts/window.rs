//! Active Windows

use jiff::civil::{Date, DateTime, Time, time};

/// Start time used when a start date has no time.
pub const DEFAULT_START_TIME: Time = time(0, 0, 0, 0);

/// End time used when an end date has no time.
pub const DEFAULT_END_TIME: Time = time(23, 59, 0, 0);

/// Where an instant falls relative to a discount's active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    /// Before the start
    NotYetActive,

    /// Within the window, bounds included
    Active,

    /// After the end
    Expired,
}

/// When a discount is active, in store-local wall clock time.
///
/// A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveWindow {
    /// Lower bound, inclusive
    pub starts_at: Option<DateTime>,

    /// Upper bound, inclusive
    pub ends_at: Option<DateTime>,
}

impl ActiveWindow {
    /// A window with no bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a window from the date and time fields a discount is configured with.
    ///
    /// `end` is only consulted when the discount has an end date set.
    pub fn from_parts(
        start_date: Option<Date>,
        start_time: Option<Time>,
        end: Option<(Date, Option<Time>)>,
    ) -> Self {
        Self {
            starts_at: start_date
                .map(|date| date.to_datetime(start_time.unwrap_or(DEFAULT_START_TIME))),
            ends_at: end
                .map(|(date, end_time)| date.to_datetime(end_time.unwrap_or(DEFAULT_END_TIME))),
        }
    }

    /// Classify `now` against the window.
    pub fn status(&self, now: DateTime) -> WindowStatus {
        if self.starts_at.is_some_and(|start| now < start) {
            WindowStatus::NotYetActive
        } else if self.ends_at.is_some_and(|end| now > end) {
            WindowStatus::Expired
        } else {
            WindowStatus::Active
        }
    }
}

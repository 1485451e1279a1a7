//! Daily eligibility window.
//!
//! The draw resets once a day at a fixed local wall-clock time (10:00 by
//! default). A player has "played" in the current window when their last
//! play is at or after the most recent boundary. Eligibility is never
//! stored; it is always recomputed from `last_played_at` and the clock.

use chrono::{FixedOffset, Local, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Hour of day at which a new window opens unless configured otherwise.
pub const DEFAULT_RESET_HOUR: u32 = 10;

/// Length of one eligibility window, in hours.
pub const WINDOW_HOURS: i64 = 24;

/// Time zone in which the boundary wall-clock time is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowZone {
    /// The host's local time zone.
    Local,
    /// A fixed UTC offset, independent of the host.
    Fixed(FixedOffset),
}

/// Computes window boundaries and answers the "played this window?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    reset_at: NaiveTime,
    zone: WindowZone,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            reset_at: NaiveTime::from_hms_opt(DEFAULT_RESET_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            zone: WindowZone::Local,
        }
    }
}

impl WindowPolicy {
    pub fn new(reset_at: NaiveTime, zone: WindowZone) -> Self {
        Self { reset_at, zone }
    }

    /// Wall-clock time at which each window opens.
    pub fn reset_at(&self) -> NaiveTime {
        self.reset_at
    }

    pub fn zone(&self) -> WindowZone {
        self.zone
    }

    /// Start of the window that contains `now`.
    ///
    /// Today's boundary if `now` has reached it, otherwise the boundary 24
    /// hours earlier. The boundary instant itself opens the new window.
    pub fn window_start(&self, now: Timestamp) -> Timestamp {
        let boundary_today = self.boundary_on_day_of(now);
        if now >= boundary_today {
            boundary_today
        } else {
            boundary_today - TimeDelta::hours(WINDOW_HOURS)
        }
    }

    /// Start of the window after the one containing `now`.
    pub fn next_window_start(&self, now: Timestamp) -> Timestamp {
        self.window_start(now) + TimeDelta::hours(WINDOW_HOURS)
    }

    /// Whether a play at `last_played_at` already consumed the window that
    /// contains `now`. An absent timestamp never counts as played.
    pub fn is_within_current_window(&self, last_played_at: Option<Timestamp>, now: Timestamp) -> bool {
        last_played_at.is_some_and(|played| played >= self.window_start(now))
    }

    fn boundary_on_day_of(&self, now: Timestamp) -> Timestamp {
        match self.zone {
            WindowZone::Local => {
                let day = now.with_timezone(&Local).date_naive();
                resolve_local(&Local, day.and_time(self.reset_at))
            }
            WindowZone::Fixed(offset) => {
                let day = now.with_timezone(&offset).date_naive();
                resolve_local(&offset, day.and_time(self.reset_at))
            }
        }
    }
}

/// Map a local wall-clock time to a UTC instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are pushed past the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Timestamp {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) => at.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// Parse a `HH:MM` boundary time.
pub fn parse_reset_time(raw: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| CoreError::Validation(format!("invalid reset time '{raw}': {e}")))
}

/// Parse a `+HH:MM` / `-HH:MM` UTC offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, CoreError> {
    raw.trim()
        .parse::<FixedOffset>()
        .map_err(|e| CoreError::Validation(format!("invalid UTC offset '{raw}': {e}")))
}

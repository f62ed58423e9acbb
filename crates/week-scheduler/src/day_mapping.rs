//! Day mapping: the order of weekdays as the user sees them.
//!
//! Weekday indices follow the `0 = Sunday .. 6 = Saturday` convention
//! throughout the crate. A [`DayMapping`] lists all seven of them starting
//! at the configured first day of week, so `mapping[rank]` is the weekday
//! shown in column `rank` and [`DayMapping::rank_of`] goes the other way.

use chrono::Weekday;
use serde::Serialize;

use crate::error::{Result, SchedulerError};

/// Number of days in a week.
pub const DAYS_IN_WEEK: usize = 7;

/// Ordered permutation of the weekday indices `0..=6`, starting at the
/// first day of week and ending at the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayMapping([u8; DAYS_IN_WEEK]);

/// Build the day mapping for a week that starts on `start_day` and ends on
/// `end_day`.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfiguration`] if either index is
/// outside `0..=6`, or if `end_day` is not the day right before
/// `start_day` (mod 7).
///
/// # Examples
///
/// ```
/// use week_scheduler::day_mapping::build_day_mapping;
///
/// let mapping = build_day_mapping(1, 0).unwrap();
/// assert_eq!(mapping.as_slice(), &[1, 2, 3, 4, 5, 6, 0]);
/// ```
pub fn build_day_mapping(start_day: i32, end_day: i32) -> Result<DayMapping> {
    let start = check_day_index("startDay", start_day)?;
    let end = check_day_index("endDay", end_day)?;

    if end != (start + 6) % 7 {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "invalid day indices {start_day}..{end_day}: the last day of week must be the day before the first"
        )));
    }

    let mut mapping = [0u8; DAYS_IN_WEEK];
    let mut day = start;
    for slot in mapping.iter_mut() {
        *slot = day;
        day = (day + 1) % 7;
    }
    debug_assert_eq!(mapping[DAYS_IN_WEEK - 1], end);

    Ok(DayMapping(mapping))
}

fn check_day_index(name: &str, index: i32) -> Result<u8> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 7)
        .ok_or_else(|| {
            SchedulerError::InvalidConfiguration(format!(
                "invalid {name} index {index}, must be between 0 and 6"
            ))
        })
}

impl DayMapping {
    pub fn first_day(&self) -> u8 {
        self.0[0]
    }

    pub fn last_day(&self) -> u8 {
        self.0[DAYS_IN_WEEK - 1]
    }

    /// Rank of `weekday` counted from the first day of week, or `None` if
    /// `weekday` is not a valid index.
    pub fn rank_of(&self, weekday: u8) -> Option<usize> {
        self.0.iter().position(|d| *d == weekday)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl Default for DayMapping {
    /// Monday-first week, the widget's default convention.
    fn default() -> Self {
        DayMapping([1, 2, 3, 4, 5, 6, 0])
    }
}

/// Weekday index (`0 = Sunday`) of a chrono [`Weekday`].
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

// ── Tests ───────────────────────────────────────────────────────────────────

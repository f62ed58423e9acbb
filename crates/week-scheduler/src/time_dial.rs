//! Hour and minute dials.

use serde::Serialize;

use crate::error::{Result, SchedulerError};

/// One entry of an hour or minute dial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOption {
    pub value: u32,
    /// Two-digit, zero-padded label (e.g. `"05"`).
    pub label: String,
}

impl TimeOption {
    fn new(value: u32) -> Self {
        Self {
            value,
            label: format!("{value:02}"),
        }
    }
}

/// Enumerate the minutes `0, precision, 2 * precision, ...` below 60.
///
/// A precision of 60 or more yields the single value 0.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfiguration`] if `precision <= 0`.
///
/// # Examples
///
/// ```
/// use week_scheduler::time_dial::enumerate_minutes;
///
/// let minutes: Vec<u32> = enumerate_minutes(15).unwrap().iter().map(|m| m.value).collect();
/// assert_eq!(minutes, vec![0, 15, 30, 45]);
/// ```
pub fn enumerate_minutes(precision: i32) -> Result<Vec<TimeOption>> {
    validate_minutes_precision(precision)?;
    Ok((0..60u32)
        .step_by(precision as usize)
        .map(TimeOption::new)
        .collect())
}

/// The hour dial: 1 through 23, then midnight.
pub fn enumerate_hours() -> Vec<TimeOption> {
    (1..24u32).chain(std::iter::once(0)).map(TimeOption::new).collect()
}

/// Check that the minute dial precision is positive.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfiguration`] if `precision <= 0`.
pub fn validate_minutes_precision(precision: i32) -> Result<()> {
    if precision <= 0 {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "minutesPrecision must be a positive number of minutes, got {precision}"
        )));
    }
    Ok(())
}

/// Whether `minute` is one of the steps of a dial with the given precision.
pub fn is_minute_step(minute: u32, precision: i32) -> bool {
    precision > 0 && minute < 60 && minute % precision as u32 == 0
}

// ── Tests ───────────────────────────────────────────────────────────────────

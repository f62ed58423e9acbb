//! Week resolution under a configurable first/last day of week.
//!
//! All datetimes are naive local wall-clock values: the widget never
//! converts between timezones, it only does calendar arithmetic on what
//! the host hands it.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::day_mapping::weekday_index;
use crate::error::{Result, SchedulerError};

/// The first and last calendar day of one week.
///
/// `start` is at 00:00:00 and `end` at 23:59:59, so a range compares equal
/// only with another range for exactly the same week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekRange {
    /// Whether `datetime` falls inside this week (both ends inclusive).
    pub fn contains(&self, datetime: NaiveDateTime) -> bool {
        self.start <= datetime && datetime <= self.end
    }

    /// Stable key for this week, e.g. `"2014-09-08/2014-09-14"`.
    pub fn value(&self) -> String {
        format!(
            "{}/{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Human label such as `"8 September 2014 to 14 September 2014"`.
    ///
    /// `month_names` must hold 12 entries; the option validator guarantees
    /// this for configured localizations.
    pub fn label(&self, month_names: &[String], to: &str) -> String {
        let month = |dt: &NaiveDateTime| {
            month_names
                .get(dt.month0() as usize)
                .map(String::as_str)
                .unwrap_or_default()
        };
        format!(
            "{} {} {} {} {} {} {}",
            self.start.day(),
            month(&self.start),
            self.start.year(),
            to,
            self.end.day(),
            month(&self.end),
            self.end.year()
        )
    }
}

/// Upper bound on the number of weeks [`weeks_between`] will enumerate,
/// roughly a century.
pub const MAX_WEEKS: i64 = 5_300;

/// Return the week that contains `datetime`.
///
/// The time of day is dropped first; the search then walks backward to
/// `first_day_of_week` and forward to `last_day_of_week`. Any datetime in
/// the same week yields an identical range.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidArgument`] if a day index is outside
/// `0..=6`, if `last_day_of_week` is not the day before
/// `first_day_of_week`, or if the week would fall outside chrono's
/// supported range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use week_scheduler::week::week_of;
///
/// let thursday = NaiveDate::from_ymd_opt(2014, 9, 11).unwrap().and_hms_opt(15, 30, 0).unwrap();
/// let week = week_of(thursday, 1, 0).unwrap();
/// assert_eq!(week.start.to_string(), "2014-09-08 00:00:00");
/// assert_eq!(week.end.to_string(), "2014-09-14 23:59:59");
/// ```
pub fn week_of(
    datetime: NaiveDateTime,
    first_day_of_week: u8,
    last_day_of_week: u8,
) -> Result<WeekRange> {
    if first_day_of_week > 6 || last_day_of_week > 6 {
        return Err(SchedulerError::InvalidArgument(format!(
            "day of week indices must be between 0 and 6, got {first_day_of_week} and {last_day_of_week}"
        )));
    }
    if last_day_of_week != (first_day_of_week + 6) % 7 {
        return Err(SchedulerError::InvalidArgument(format!(
            "last day of week {last_day_of_week} must be the day before the first day {first_day_of_week}"
        )));
    }

    let day = datetime.date();
    let first = walk_until(day, first_day_of_week, |d| d.pred_opt())?;
    let last = walk_until(day, last_day_of_week, |d| d.succ_opt())?;
    let end = last.and_hms_opt(23, 59, 59).ok_or_else(|| {
        SchedulerError::InvalidArgument(format!("cannot build end of day for {last}"))
    })?;

    Ok(WeekRange {
        start: first.and_time(NaiveTime::MIN),
        end,
    })
}

/// Step from `from` until its weekday index equals `target`. At most six
/// steps are ever taken.
fn walk_until(
    from: NaiveDate,
    target: u8,
    step: impl Fn(NaiveDate) -> Option<NaiveDate>,
) -> Result<NaiveDate> {
    let mut day = from;
    while weekday_index(day.weekday()) != target {
        day = step(day).ok_or_else(|| {
            SchedulerError::InvalidArgument(format!("date {from} is too close to the calendar limits"))
        })?;
    }
    Ok(day)
}

/// Every week from the one containing `start` through the one containing
/// `end`, inclusive.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidArgument`] if `start` is after `end`,
/// if the range spans more than [`MAX_WEEKS`] weeks, or for the same
/// reasons as [`week_of`].
pub fn weeks_between(
    start: NaiveDate,
    end: NaiveDate,
    first_day_of_week: u8,
    last_day_of_week: u8,
) -> Result<Vec<WeekRange>> {
    if start > end {
        return Err(SchedulerError::InvalidArgument(format!(
            "start date {start} is after end date {end}"
        )));
    }
    if (end - start).num_days() / 7 + 1 > MAX_WEEKS {
        return Err(SchedulerError::InvalidArgument(format!(
            "{start} to {end} spans more than {MAX_WEEKS} weeks"
        )));
    }

    let last_week = week_of(end.and_time(NaiveTime::MIN), first_day_of_week, last_day_of_week)?;
    let mut week = week_of(start.and_time(NaiveTime::MIN), first_day_of_week, last_day_of_week)?;
    let mut weeks = vec![week];

    while week != last_week {
        let next_start = week
            .start
            .checked_add_signed(Duration::days(7))
            .ok_or_else(|| SchedulerError::InvalidArgument("week range overflow".to_string()))?;
        week = week_of(next_start, first_day_of_week, last_day_of_week)?;
        weeks.push(week);
    }

    Ok(weeks)
}

// ── Tests ───────────────────────────────────────────────────────────────────

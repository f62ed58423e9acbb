//! Widget options, localization strings, and their validation.
//!
//! Options deserialize from the same camelCase keys the widget has always
//! accepted, e.g.
//!
//! ```json
//! { "startDate": "2014-06-04", "endDate": "2014-06-25",
//!   "firstDayOfWeek": 1, "lastDayOfWeek": 0, "minutesPrecision": 15 }
//! ```
//!
//! The selectable date bounds have no default: the library never reads the
//! system clock, so the host decides what "now" means.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day_mapping::{build_day_mapping, DayMapping, DAYS_IN_WEEK};
use crate::error::{Result, SchedulerError};
use crate::time_dial::validate_minutes_precision;

/// Label strings shown by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Localization {
    pub title: String,
    pub week: String,
    pub days: String,
    pub time: String,
    pub hour: String,
    pub minute: String,
    pub confirm: String,
    pub cancel: String,
    /// Joins the two ends of a week label ("2 June 2014 to 8 June 2014").
    pub to: String,
    /// Seven names, starting with the first day of week.
    pub day_names: Vec<String>,
    pub month_names: Vec<String>,
}

impl Default for Localization {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            title: "Schedule item".to_string(),
            week: "Week".to_string(),
            days: "Days".to_string(),
            time: "Time".to_string(),
            hour: "Hour".to_string(),
            minute: "Minute".to_string(),
            confirm: "Add".to_string(),
            cancel: "Cancel".to_string(),
            to: "to".to_string(),
            day_names: owned(&["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]),
            month_names: owned(&[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
        }
    }
}

fn default_minutes_precision() -> i32 {
    15
}

fn default_first_day_of_week() -> i32 {
    1
}

fn default_last_day_of_week() -> i32 {
    0
}

/// Widget configuration. Immutable once the widget is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerOptions {
    #[serde(default)]
    pub localization: Localization,
    /// Step of the minute dial.
    #[serde(default = "default_minutes_precision")]
    pub minutes_precision: i32,
    /// A day in the first selectable week.
    pub start_date: NaiveDate,
    /// A day in the last selectable week.
    pub end_date: NaiveDate,
    /// `0 = Sunday .. 6 = Saturday`.
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: i32,
    #[serde(default = "default_last_day_of_week")]
    pub last_day_of_week: i32,
    #[serde(default)]
    pub hide_on_start: bool,
    #[serde(default)]
    pub single_day_select: bool,
}

impl SchedulerOptions {
    /// Options with every default except the selectable date bounds.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            localization: Localization::default(),
            minutes_precision: default_minutes_precision(),
            start_date,
            end_date,
            first_day_of_week: default_first_day_of_week(),
            last_day_of_week: default_last_day_of_week(),
            hide_on_start: false,
            single_day_select: false,
        }
    }

    /// Parse options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfiguration`] if the JSON is
    /// malformed or a field has the wrong type. The values themselves are
    /// checked by [`SchedulerOptions::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SchedulerError::InvalidConfiguration(format!("cannot parse options: {e}")))
    }

    /// Check every option and build the day mapping they describe.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfiguration`] for the first
    /// problem found: month name count, minutes precision, day name count,
    /// reversed date bounds, then the first/last day of week.
    pub fn validate(&self) -> Result<DayMapping> {
        validate_month_names(&self.localization.month_names)?;
        validate_minutes_precision(self.minutes_precision)?;
        validate_day_names(&self.localization.day_names)?;

        if self.start_date > self.end_date {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "startDate {} is after endDate {}",
                self.start_date, self.end_date
            )));
        }

        build_day_mapping(self.first_day_of_week, self.last_day_of_week)
    }
}

/// # Errors
///
/// Returns [`SchedulerError::InvalidConfiguration`] unless exactly 12 names
/// are given.
pub fn validate_month_names(month_names: &[String]) -> Result<()> {
    if month_names.len() != 12 {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "exactly 12 months are needed in localization.monthNames, got {}",
            month_names.len()
        )));
    }
    Ok(())
}

/// # Errors
///
/// Returns [`SchedulerError::InvalidConfiguration`] unless exactly 7 names
/// are given.
pub fn validate_day_names(day_names: &[String]) -> Result<()> {
    if day_names.len() != DAYS_IN_WEEK {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "exactly 7 days are needed in localization.dayNames, got {}",
            day_names.len()
        )));
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn june_2014() -> SchedulerOptions {
        SchedulerOptions::new(
            NaiveDate::from_ymd_opt(2014, 6, 4).unwrap(),
            NaiveDate::from_ymd_opt(2014, 6, 25).unwrap(),
        )
    }

    #[test]
    fn test_defaults_validate() {
        let mapping = june_2014().validate().unwrap();
        assert_eq!(mapping, DayMapping::default());
    }

    #[test]
    fn test_eleven_months_rejected() {
        let mut options = june_2014();
        options.localization.month_names.pop();
        let err = options.validate().unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("got 11"), "got: {err}");
    }

    #[test]
    fn test_zero_precision_rejected() {
        let mut options = june_2014();
        options.minutes_precision = 0;
        assert!(matches!(
            options.validate(),
            Err(SchedulerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_six_day_names_rejected() {
        let mut options = june_2014();
        options.localization.day_names.truncate(6);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let mut options = june_2014();
        std::mem::swap(&mut options.start_date, &mut options.end_date);
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("after endDate"), "got: {err}");
    }

    #[test]
    fn test_bad_day_mapping_rejected() {
        let mut options = june_2014();
        options.first_day_of_week = 2;
        options.last_day_of_week = 5;
        assert!(matches!(
            options.validate(),
            Err(SchedulerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_month_names_checked_first() {
        let mut options = june_2014();
        options.localization.month_names.clear();
        options.minutes_precision = -1;
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("monthNames"), "got: {err}");
    }

    // ── JSON tests ──────────────────────────────────────────────────────

    #[test]
    fn test_from_json_with_defaults() {
        let options =
            SchedulerOptions::from_json(r#"{"startDate": "2014-06-04", "endDate": "2014-06-25"}"#)
                .unwrap();
        assert_eq!(options, june_2014());
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let options = SchedulerOptions::from_json(
            r#"{
                "startDate": "2014-11-10",
                "endDate": "2014-11-11",
                "minutesPrecision": 5,
                "firstDayOfWeek": 0,
                "lastDayOfWeek": 6,
                "hideOnStart": true,
                "singleDaySelect": true,
                "localization": { "confirm": "Aggiungi", "to": "a" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.minutes_precision, 5);
        assert_eq!(options.first_day_of_week, 0);
        assert!(options.hide_on_start);
        assert!(options.single_day_select);
        assert_eq!(options.localization.confirm, "Aggiungi");
        // unspecified labels keep their defaults
        assert_eq!(options.localization.cancel, "Cancel");
        assert_eq!(options.localization.month_names.len(), 12);
    }

    #[test]
    fn test_from_json_non_numeric_precision() {
        let err = SchedulerOptions::from_json(
            r#"{"startDate": "2014-06-04", "endDate": "2014-06-25", "minutesPrecision": "fifteen"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_from_json_missing_dates() {
        assert!(SchedulerOptions::from_json("{}").is_err());
    }
}

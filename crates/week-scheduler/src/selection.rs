//! Selection model: converting between an abstract weekly selection and
//! concrete dates.
//!
//! A [`Selection`] is a week, a set of weekday indices (`0 = Sunday`), and
//! a time of day. [`selection_to_dates`] places each selected weekday inside
//! the week; [`dates_to_selection`] goes the other way and refuses date sets
//! that do not share one week, hour and minute.
//!
//! Generated date lists are always in calendar order, i.e. sorted by the
//! day's rank from the first day of week, whatever order the days were
//! chosen in.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::day_mapping::{weekday_index, DayMapping, DAYS_IN_WEEK};
use crate::error::{Result, SchedulerError};
use crate::week::{week_of, WeekRange};

/// The user's abstract choice: which week, which days, what time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub week: WeekRange,
    /// Weekday indices, `0 = Sunday .. 6 = Saturday`.
    pub days: BTreeSet<u8>,
    pub hour: u32,
    pub minute: u32,
}

/// State of one day control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    Checked,
    Indeterminate,
    #[default]
    Unchecked,
}

impl DayState {
    /// Anything but `Unchecked`.
    pub fn is_active(self) -> bool {
        self != DayState::Unchecked
    }
}

/// Whether several days may be picked (checkboxes) or only one (radio
/// buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    #[default]
    Multiple,
    Single,
}

/// A concrete date paired with the state of the day it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedDay {
    pub date: NaiveDateTime,
    pub state: DayState,
}

// ── selection → dates ───────────────────────────────────────────────────────

/// Convert a selection into one datetime per selected day, at the selected
/// hour and minute with seconds zeroed.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidArgument`] if the hour or minute is out
/// of range, or if a day index is not part of `mapping`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use week_scheduler::day_mapping::DayMapping;
/// use week_scheduler::selection::{selection_to_dates, Selection};
/// use week_scheduler::week::week_of;
///
/// let monday = NaiveDate::from_ymd_opt(2014, 2, 3).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let selection = Selection {
///     week: week_of(monday, 1, 0).unwrap(),
///     days: BTreeSet::from([0, 4]),
///     hour: 21,
///     minute: 25,
/// };
/// let dates = selection_to_dates(&selection, &DayMapping::default()).unwrap();
/// assert_eq!(dates[0].to_string(), "2014-02-06 21:25:00");
/// assert_eq!(dates[1].to_string(), "2014-02-09 21:25:00");
/// ```
pub fn selection_to_dates(selection: &Selection, mapping: &DayMapping) -> Result<Vec<NaiveDateTime>> {
    let time = time_of_day(selection.hour, selection.minute)?;
    let days: Vec<(u8, DayState)> = selection
        .days
        .iter()
        .map(|d| (*d, DayState::Checked))
        .collect();

    Ok(place_days(&selection.week, &days, time, mapping)?
        .into_iter()
        .map(|d| d.date)
        .collect())
}

/// Like [`selection_to_dates`], for a list of days that each carry a state.
/// `Unchecked` days are skipped.
///
/// # Errors
///
/// Same as [`selection_to_dates`].
pub fn states_to_dated_days(
    week: &WeekRange,
    days: &[(u8, DayState)],
    hour: u32,
    minute: u32,
    mapping: &DayMapping,
) -> Result<Vec<DatedDay>> {
    let time = time_of_day(hour, minute)?;
    let active: Vec<(u8, DayState)> = days.iter().copied().filter(|(_, s)| s.is_active()).collect();
    place_days(week, &active, time, mapping)
}

fn time_of_day(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        SchedulerError::InvalidArgument(format!("invalid time of day {hour}:{minute:02}"))
    })
}

fn place_days(
    week: &WeekRange,
    days: &[(u8, DayState)],
    time: NaiveTime,
    mapping: &DayMapping,
) -> Result<Vec<DatedDay>> {
    let mut ranked = days
        .iter()
        .map(|(day, state)| {
            mapping
                .rank_of(*day)
                .map(|rank| (rank, *state))
                .ok_or_else(|| {
                    SchedulerError::InvalidArgument(format!(
                        "day index {day} is not part of the day mapping {:?}",
                        mapping.as_slice()
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.dedup_by_key(|(rank, _)| *rank);

    let week_start = week.start.date();
    ranked
        .into_iter()
        .map(|(rank, state)| {
            let date = week_start
                .checked_add_signed(Duration::days(rank as i64))
                .ok_or_else(|| SchedulerError::InvalidArgument("date overflow".to_string()))?;
            Ok(DatedDay {
                date: date.and_time(time),
                state,
            })
        })
        .collect()
}

// ── dates → selection ───────────────────────────────────────────────────────

/// Rebuild a selection from concrete dates.
///
/// The days of the result are the distinct weekdays of the dates.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidArgument`] for an empty list, and
/// [`SchedulerError::InconsistentSelection`] if the dates do not all fall in
/// the same week, at the same hour and minute.
pub fn dates_to_selection(dates: &[NaiveDateTime], mapping: &DayMapping) -> Result<Selection> {
    let (week, hour, minute) = shared_week_and_time(dates.iter().copied(), mapping)?;
    Ok(Selection {
        week,
        days: dates.iter().map(|d| weekday_index(d.weekday())).collect(),
        hour,
        minute,
    })
}

/// Like [`dates_to_selection`], keeping each day's state.
///
/// The returned states follow the input order; a weekday that appears more
/// than once keeps its last state.
///
/// # Errors
///
/// Same as [`dates_to_selection`].
pub fn dated_days_to_selection(
    dated: &[DatedDay],
    mapping: &DayMapping,
) -> Result<(Selection, Vec<(u8, DayState)>)> {
    let dates: Vec<NaiveDateTime> = dated.iter().map(|d| d.date).collect();
    let mut selection = dates_to_selection(&dates, mapping)?;

    let mut states: Vec<(u8, DayState)> = Vec::with_capacity(dated.len());
    for d in dated {
        let day = weekday_index(d.date.weekday());
        match states.iter_mut().find(|(existing, _)| *existing == day) {
            Some(entry) => entry.1 = d.state,
            None => states.push((day, d.state)),
        }
    }
    selection.days = states
        .iter()
        .filter(|(_, s)| s.is_active())
        .map(|(d, _)| *d)
        .collect();

    Ok((selection, states))
}

fn shared_week_and_time(
    dates: impl Iterator<Item = NaiveDateTime>,
    mapping: &DayMapping,
) -> Result<(WeekRange, u32, u32)> {
    let mut shared: Option<(WeekRange, u32, u32)> = None;

    for date in dates {
        let week = week_of(date, mapping.first_day(), mapping.last_day())?;
        let (hour, minute) = (date.hour(), date.minute());

        match shared {
            None => shared = Some((week, hour, minute)),
            Some((w, h, m)) => {
                if w != week {
                    return Err(SchedulerError::InconsistentSelection(format!(
                        "not all the dates fall in the same week: {} and {}",
                        w.value(),
                        week.value()
                    )));
                }
                if m != minute {
                    return Err(SchedulerError::InconsistentSelection(format!(
                        "not all the dates are set to the same minute: {m} and {minute}"
                    )));
                }
                if h != hour {
                    return Err(SchedulerError::InconsistentSelection(format!(
                        "not all the dates are set to the same hour: {h} and {hour}"
                    )));
                }
            }
        }
    }

    shared.ok_or_else(|| SchedulerError::InvalidArgument("no dates given".to_string()))
}

// ── Day controls ────────────────────────────────────────────────────────────

/// State of the seven day controls plus the single/multiple mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySelector {
    /// Indexed by weekday index.
    states: [DayState; DAYS_IN_WEEK],
    mode: DayMode,
}

impl DaySelector {
    pub fn new(mode: DayMode) -> Self {
        Self {
            states: [DayState::Unchecked; DAYS_IN_WEEK],
            mode,
        }
    }

    pub fn mode(&self) -> DayMode {
        self.mode
    }

    pub fn state(&self, day: u8) -> DayState {
        self.states
            .get(day as usize)
            .copied()
            .unwrap_or(DayState::Unchecked)
    }

    /// Days that are checked or indeterminate.
    pub fn active_days(&self) -> BTreeSet<u8> {
        (0..DAYS_IN_WEEK as u8)
            .filter(|d| self.state(*d).is_active())
            .collect()
    }

    /// `(day, state)` for every active day, in the order of `mapping`.
    pub fn active_states(&self, mapping: &DayMapping) -> Vec<(u8, DayState)> {
        mapping
            .iter()
            .map(|d| (d, self.state(d)))
            .filter(|(_, s)| s.is_active())
            .collect()
    }

    /// Check exactly `days`, uncheck the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] for a day outside `0..=6`
    /// or for more than one day in single mode.
    pub fn set_days(&mut self, days: &[u8]) -> Result<()> {
        let states: Vec<(u8, DayState)> = days.iter().map(|d| (*d, DayState::Checked)).collect();
        self.set_states(&states)
    }

    /// Apply explicit per-day states; days not listed become `Unchecked`.
    ///
    /// # Errors
    ///
    /// Same as [`DaySelector::set_days`].
    pub fn set_states(&mut self, states: &[(u8, DayState)]) -> Result<()> {
        let mut next = [DayState::Unchecked; DAYS_IN_WEEK];
        for (day, state) in states {
            let slot = next.get_mut(*day as usize).ok_or_else(|| {
                SchedulerError::InvalidArgument(format!(
                    "invalid day index {day}, must be between 0 and 6"
                ))
            })?;
            *slot = *state;
        }

        let active = next.iter().filter(|s| s.is_active()).count();
        if self.mode == DayMode::Single && active > 1 {
            return Err(SchedulerError::InvalidArgument(format!(
                "cannot select {active} days while single day selection is on"
            )));
        }

        self.states = next;
        Ok(())
    }

    /// Switch between single and multiple day selection.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] when switching to single
    /// mode while more than one day is selected.
    pub fn set_mode(&mut self, mode: DayMode) -> Result<()> {
        let active = self.states.iter().filter(|s| s.is_active()).count();
        if mode == DayMode::Single && active > 1 {
            return Err(SchedulerError::InvalidArgument(format!(
                "cannot switch to single day selection while {active} days are selected"
            )));
        }
        self.mode = mode;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_mapping::build_day_mapping;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn feb_2014_week() -> WeekRange {
        // Mon 3 Feb 2014 .. Sun 9 Feb 2014
        week_of(at(2014, 2, 3, 0, 0), 1, 0).unwrap()
    }

    // ── selection_to_dates tests ────────────────────────────────────────

    #[test]
    fn test_dates_from_selection_look_right() {
        let selection = Selection {
            week: feb_2014_week(),
            days: BTreeSet::from([1, 4, 0]),
            hour: 21,
            minute: 25,
        };
        let dates = selection_to_dates(&selection, &DayMapping::default()).unwrap();
        assert_eq!(
            dates,
            vec![
                at(2014, 2, 3, 21, 25),
                at(2014, 2, 6, 21, 25),
                at(2014, 2, 9, 21, 25),
            ]
        );
    }

    #[test]
    fn test_dates_are_calendar_ordered_from_first_day() {
        // Thursday-first week: Thu 6 .. Wed 12 Feb 2014
        let mapping = build_day_mapping(4, 3).unwrap();
        let week = week_of(at(2014, 2, 8, 0, 0), 4, 3).unwrap();
        let selection = Selection {
            week,
            days: BTreeSet::from([0, 3, 4]),
            hour: 8,
            minute: 0,
        };
        let dates = selection_to_dates(&selection, &mapping).unwrap();
        // Thu, Sun, Wed
        assert_eq!(
            dates,
            vec![at(2014, 2, 6, 8, 0), at(2014, 2, 9, 8, 0), at(2014, 2, 12, 8, 0)]
        );
    }

    #[test]
    fn test_dates_zero_seconds() {
        let selection = Selection {
            week: feb_2014_week(),
            days: BTreeSet::from([2]),
            hour: 0,
            minute: 45,
        };
        let dates = selection_to_dates(&selection, &DayMapping::default()).unwrap();
        assert_eq!(dates[0].second(), 0);
        assert_eq!(dates[0].to_string(), "2014-02-04 00:45:00");
    }

    #[test]
    fn test_dates_empty_days() {
        let selection = Selection {
            week: feb_2014_week(),
            days: BTreeSet::new(),
            hour: 10,
            minute: 0,
        };
        assert!(selection_to_dates(&selection, &DayMapping::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_dates_unmapped_day_rejected() {
        let selection = Selection {
            week: feb_2014_week(),
            days: BTreeSet::from([9]),
            hour: 10,
            minute: 0,
        };
        let err = selection_to_dates(&selection, &DayMapping::default()).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidArgument(_)));
    }

    #[test]
    fn test_dates_bad_hour_rejected() {
        let selection = Selection {
            week: feb_2014_week(),
            days: BTreeSet::from([1]),
            hour: 24,
            minute: 0,
        };
        let err = selection_to_dates(&selection, &DayMapping::default()).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidArgument(_)));
    }

    #[test]
    fn test_states_pass_through() {
        let days = [
            (1, DayState::Checked),
            (4, DayState::Checked),
            (0, DayState::Indeterminate),
            (3, DayState::Unchecked),
        ];
        let dated =
            states_to_dated_days(&feb_2014_week(), &days, 21, 25, &DayMapping::default()).unwrap();
        assert_eq!(dated.len(), 3);
        assert_eq!(dated[2].date, at(2014, 2, 9, 21, 25));
        assert_eq!(dated[2].state, DayState::Indeterminate);
        assert_eq!(dated[0].state, DayState::Checked);
    }

    // ── dates_to_selection tests ────────────────────────────────────────

    #[test]
    fn test_selection_from_dates() {
        let dates = [at(2014, 11, 10, 9, 30), at(2014, 11, 16, 9, 30)];
        let selection = dates_to_selection(&dates, &DayMapping::default()).unwrap();
        assert_eq!(selection.week.value(), "2014-11-10/2014-11-16");
        assert_eq!(selection.days, BTreeSet::from([0, 1]));
        assert_eq!((selection.hour, selection.minute), (9, 30));
    }

    #[test]
    fn test_selection_duplicate_weekdays_collapse() {
        let dates = [at(2014, 11, 11, 9, 30), at(2014, 11, 11, 9, 30)];
        let selection = dates_to_selection(&dates, &DayMapping::default()).unwrap();
        assert_eq!(selection.days, BTreeSet::from([2]));
    }

    #[test]
    fn test_selection_spanning_two_weeks_rejected() {
        let dates = [at(2014, 11, 10, 9, 30), at(2014, 11, 17, 9, 30)];
        let err = dates_to_selection(&dates, &DayMapping::default()).unwrap_err();
        assert!(matches!(err, SchedulerError::InconsistentSelection(_)));
        assert!(err.to_string().contains("same week"), "got: {err}");
    }

    #[test]
    fn test_selection_different_hours_rejected() {
        let dates = [at(2014, 11, 10, 9, 30), at(2014, 11, 11, 10, 30)];
        let err = dates_to_selection(&dates, &DayMapping::default()).unwrap_err();
        assert!(err.to_string().contains("same hour"), "got: {err}");
    }

    #[test]
    fn test_selection_different_minutes_rejected() {
        let dates = [at(2014, 11, 10, 9, 30), at(2014, 11, 11, 9, 45)];
        let err = dates_to_selection(&dates, &DayMapping::default()).unwrap_err();
        assert!(err.to_string().contains("same minute"), "got: {err}");
    }

    #[test]
    fn test_selection_week_depends_on_mapping() {
        // Sun 16 Nov 2014 closes a Monday-first week but opens a Sunday-first one
        let dates = [at(2014, 11, 15, 9, 0), at(2014, 11, 16, 9, 0)];
        assert!(dates_to_selection(&dates, &DayMapping::default()).is_ok());
        let sunday_first = build_day_mapping(0, 6).unwrap();
        assert!(dates_to_selection(&dates, &sunday_first).is_err());
    }

    #[test]
    fn test_selection_empty_rejected() {
        let err = dates_to_selection(&[], &DayMapping::default()).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidArgument(_)));
    }

    #[test]
    fn test_dated_days_keep_states() {
        let dated = [
            DatedDay { date: at(2014, 11, 10, 1, 0), state: DayState::Checked },
            DatedDay { date: at(2014, 11, 11, 1, 0), state: DayState::Indeterminate },
            DatedDay { date: at(2014, 11, 16, 1, 0), state: DayState::Checked },
        ];
        let (selection, states) = dated_days_to_selection(&dated, &DayMapping::default()).unwrap();
        assert_eq!(selection.days, BTreeSet::from([0, 1, 2]));
        assert_eq!(
            states,
            vec![
                (1, DayState::Checked),
                (2, DayState::Indeterminate),
                (0, DayState::Checked),
            ]
        );
    }

    // ── DaySelector tests ───────────────────────────────────────────────

    #[test]
    fn test_set_days_replaces_previous() {
        let mut selector = DaySelector::default();
        selector.set_days(&[1, 2, 5]).unwrap();
        selector.set_days(&[3]).unwrap();
        assert_eq!(selector.active_days(), BTreeSet::from([3]));
        assert_eq!(selector.state(1), DayState::Unchecked);
    }

    #[test]
    fn test_set_days_rejects_bad_index() {
        let mut selector = DaySelector::default();
        selector.set_days(&[2]).unwrap();
        let err = selector.set_days(&[1, 7]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidArgument(_)));
        // unchanged on error
        assert_eq!(selector.active_days(), BTreeSet::from([2]));
    }

    #[test]
    fn test_single_mode_rejects_multiple_days() {
        let mut selector = DaySelector::new(DayMode::Single);
        assert!(selector.set_days(&[2, 3, 4]).is_err());
        selector.set_days(&[2]).unwrap();
        assert_eq!(selector.active_days(), BTreeSet::from([2]));
    }

    #[test]
    fn test_switch_to_single_guarded() {
        let mut selector = DaySelector::default();
        selector.set_days(&[1, 2, 5]).unwrap();
        assert!(selector.set_mode(DayMode::Single).is_err());
        assert_eq!(selector.mode(), DayMode::Multiple);

        selector.set_days(&[]).unwrap();
        selector.set_mode(DayMode::Single).unwrap();
        assert_eq!(selector.mode(), DayMode::Single);

        selector.set_mode(DayMode::Multiple).unwrap();
        assert_eq!(selector.mode(), DayMode::Multiple);
    }

    #[test]
    fn test_indeterminate_counts_as_selected_in_single_mode() {
        let mut selector = DaySelector::new(DayMode::Single);
        let err = selector
            .set_states(&[(1, DayState::Checked), (2, DayState::Indeterminate)])
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidArgument(_)));
        selector
            .set_states(&[(1, DayState::Checked), (2, DayState::Unchecked)])
            .unwrap();
    }

    #[test]
    fn test_active_states_follow_mapping() {
        let mut selector = DaySelector::default();
        selector
            .set_states(&[(0, DayState::Checked), (1, DayState::Indeterminate)])
            .unwrap();
        assert_eq!(
            selector.active_states(&DayMapping::default()),
            vec![(1, DayState::Indeterminate), (0, DayState::Checked)]
        );
    }
}

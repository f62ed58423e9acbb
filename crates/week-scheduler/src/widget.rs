//! The week scheduler widget.
//!
//! [`WeekScheduler`] owns the control state (selected week, day inputs,
//! hour and minute), the visibility state machine, and its own day mapping.
//! Each instance is independent, so widgets with different week
//! conventions can live side by side.

use std::fmt;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::controls::{
    Button, DayControl, Dial, SchedulerEvent, WeekOption, WidgetDescriptor,
};
use crate::day_mapping::DayMapping;
use crate::error::{Result, SchedulerError};
use crate::options::SchedulerOptions;
use crate::selection::{
    dated_days_to_selection, dates_to_selection, selection_to_dates, states_to_dated_days,
    DatedDay, DayMode, DaySelector, DayState, Selection,
};
use crate::time_dial::{enumerate_hours, enumerate_minutes, TimeOption};
use crate::visibility::{LifecycleHooks, Transition, Visibility, VisibilityMachine};
use crate::week::{week_of, weeks_between};

type Listener = Box<dyn FnMut(SchedulerEvent)>;

pub struct WeekScheduler {
    options: SchedulerOptions,
    mapping: DayMapping,
    weeks: Vec<WeekOption>,
    selected_week: usize,
    days: DaySelector,
    hours: Vec<TimeOption>,
    hour: u32,
    minutes: Vec<TimeOption>,
    minute: u32,
    visibility: VisibilityMachine,
    listeners: Vec<Listener>,
}

impl fmt::Debug for WeekScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekScheduler")
            .field("mapping", &self.mapping)
            .field("selected_week", &self.selected_week)
            .field("days", &self.days)
            .field("hour", &self.hour)
            .field("minute", &self.minute)
            .field("visibility", &self.visibility.state())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl WeekScheduler {
    /// Build a widget without lifecycle hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfiguration`] if the options do not
    /// validate.
    pub fn new(options: SchedulerOptions) -> Result<Self> {
        Self::with_hooks(options, LifecycleHooks::default())
    }

    /// Build a widget. No hook fires during construction, even when
    /// `hide_on_start` is set.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfiguration`] if the options do not
    /// validate.
    pub fn with_hooks(options: SchedulerOptions, hooks: LifecycleHooks) -> Result<Self> {
        let mapping = options.validate()?;

        let weeks: Vec<WeekOption> = weeks_between(
            options.start_date,
            options.end_date,
            mapping.first_day(),
            mapping.last_day(),
        )
        .map_err(|e| SchedulerError::InvalidConfiguration(e.to_string()))?
        .into_iter()
        .map(|week| WeekOption::new(week, &options.localization))
        .collect();

        let hours = enumerate_hours();
        let minutes = enumerate_minutes(options.minutes_precision)?;
        let hour = hours.first().map_or(0, |h| h.value);
        let minute = minutes.first().map_or(0, |m| m.value);

        let mode = if options.single_day_select {
            DayMode::Single
        } else {
            DayMode::Multiple
        };

        let mut visibility = VisibilityMachine::new(Visibility::Shown, hooks);
        if options.hide_on_start {
            visibility.hide(false);
        }

        debug!(
            weeks = weeks.len(),
            mapping = ?mapping.as_slice(),
            hidden = options.hide_on_start,
            "week scheduler initialized"
        );

        Ok(Self {
            options,
            mapping,
            weeks,
            selected_week: 0,
            days: DaySelector::new(mode),
            hours,
            hour,
            minutes,
            minute,
            visibility,
            listeners: Vec::new(),
        })
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn day_mapping(&self) -> &DayMapping {
        &self.mapping
    }

    pub fn week_options(&self) -> &[WeekOption] {
        &self.weeks
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// The current selection; `days` holds every checked or indeterminate
    /// day.
    pub fn selection(&self) -> Selection {
        Selection {
            week: self.weeks[self.selected_week].week,
            days: self.days.active_days(),
            hour: self.hour,
            minute: self.minute,
        }
    }

    /// Select the week, days, hour and minute of `selection`. Nothing
    /// changes unless every part is valid.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] if the week is not
    /// selectable, the hour or minute is not on the dials, or the days are
    /// rejected by the day inputs.
    pub fn set_selection(&mut self, selection: &Selection) -> Result<()> {
        let days: Vec<(u8, DayState)> = selection
            .days
            .iter()
            .map(|d| (*d, DayState::Checked))
            .collect();
        self.apply(selection.week.start, &days, selection.hour, selection.minute)
    }

    /// One date per selected day, in calendar order.
    ///
    /// # Errors
    ///
    /// Propagates [`selection_to_dates`] errors.
    pub fn selected_dates(&self) -> Result<Vec<NaiveDateTime>> {
        selection_to_dates(&self.selection(), &self.mapping)
    }

    /// Select the week, days and time shared by `dates`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InconsistentSelection`] if the dates do not
    /// share a week, hour and minute, and [`SchedulerError::InvalidArgument`]
    /// for an empty list or anything [`WeekScheduler::set_selection`]
    /// rejects.
    pub fn set_dates(&mut self, dates: &[NaiveDateTime]) -> Result<()> {
        let selection = dates_to_selection(dates, &self.mapping)?;
        self.set_selection(&selection)
    }

    /// Like [`WeekScheduler::selected_dates`], with each day's state.
    ///
    /// # Errors
    ///
    /// Propagates [`states_to_dated_days`] errors.
    pub fn selected_dates_with_state(&self) -> Result<Vec<DatedDay>> {
        states_to_dated_days(
            &self.weeks[self.selected_week].week,
            &self.days.active_states(&self.mapping),
            self.hour,
            self.minute,
            &self.mapping,
        )
    }

    /// Like [`WeekScheduler::set_dates`], also setting each day's state.
    ///
    /// # Errors
    ///
    /// Same as [`WeekScheduler::set_dates`].
    pub fn set_dates_with_state(&mut self, dated: &[DatedDay]) -> Result<()> {
        let (selection, states) = dated_days_to_selection(dated, &self.mapping)?;
        self.apply(selection.week.start, &states, selection.hour, selection.minute)
    }

    fn apply(
        &mut self,
        week_date: NaiveDateTime,
        states: &[(u8, DayState)],
        hour: u32,
        minute: u32,
    ) -> Result<()> {
        let week = self.week_index(week_date)?;
        self.check_hour(hour)?;
        self.check_minute(minute)?;
        let mut days = self.days.clone();
        days.set_states(states)?;

        self.selected_week = week;
        self.days = days;
        self.hour = hour;
        self.minute = minute;
        Ok(())
    }

    // ── Individual controls ─────────────────────────────────────────────

    /// Select the week containing `date`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] if that week is outside
    /// the selectable range.
    pub fn set_week(&mut self, date: NaiveDateTime) -> Result<()> {
        self.selected_week = self.week_index(date)?;
        Ok(())
    }

    /// Check exactly `days`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] for a bad day index, or
    /// for several days while single day selection is on.
    pub fn set_days(&mut self, days: &[u8]) -> Result<()> {
        self.days.set_days(days)
    }

    /// Set explicit per-day states; unlisted days are unchecked.
    ///
    /// # Errors
    ///
    /// Same as [`WeekScheduler::set_days`].
    pub fn set_day_states(&mut self, states: &[(u8, DayState)]) -> Result<()> {
        self.days.set_states(states)
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] if `hour > 23`.
    pub fn set_hour(&mut self, hour: u32) -> Result<()> {
        self.check_hour(hour)?;
        self.hour = hour;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] if `minute` is not one of
    /// the minute dial's steps.
    pub fn set_minute(&mut self, minute: u32) -> Result<()> {
        self.check_minute(minute)?;
        self.minute = minute;
        Ok(())
    }

    /// Switch between radio buttons (`true`) and checkboxes (`false`).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidArgument`] when turning single day
    /// selection on while more than one day is selected.
    pub fn set_single_day_select(&mut self, single: bool) -> Result<()> {
        let mode = if single { DayMode::Single } else { DayMode::Multiple };
        self.days.set_mode(mode)
    }

    pub fn day_mode(&self) -> DayMode {
        self.days.mode()
    }

    fn week_index(&self, date: NaiveDateTime) -> Result<usize> {
        let week = week_of(date, self.mapping.first_day(), self.mapping.last_day())?;
        self.weeks
            .iter()
            .position(|option| option.week == week)
            .ok_or_else(|| {
                SchedulerError::InvalidArgument(format!(
                    "week {} is outside the selectable range",
                    week.value()
                ))
            })
    }

    fn check_hour(&self, hour: u32) -> Result<()> {
        if self.hours.iter().any(|h| h.value == hour) {
            Ok(())
        } else {
            Err(SchedulerError::InvalidArgument(format!(
                "the hour {hour} is not valid, must be between 0 and 23"
            )))
        }
    }

    fn check_minute(&self, minute: u32) -> Result<()> {
        if self.minutes.iter().any(|m| m.value == minute) {
            return Ok(());
        }
        let valid: Vec<String> = self.minutes.iter().map(|m| m.value.to_string()).collect();
        Err(SchedulerError::InvalidArgument(format!(
            "the minute {minute} is not valid and should be one of {}",
            valid.join(",")
        )))
    }

    // ── Visibility ──────────────────────────────────────────────────────

    pub fn show(&mut self) -> Transition {
        self.visibility.show()
    }

    pub fn hide(&mut self, trigger_hooks: bool) -> Transition {
        self.visibility.hide(trigger_hooks)
    }

    pub fn is_shown(&self) -> bool {
        self.visibility.is_shown()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Register a listener for confirm/cancel notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(SchedulerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Press a button, notifying every listener before returning.
    pub fn activate(&mut self, button: Button) {
        let event = SchedulerEvent::from(button);
        trace!(event = event.name(), listeners = self.listeners.len(), "notifying");
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    /// Describe every control with its label and current value.
    pub fn describe(&self) -> WidgetDescriptor {
        let loc = &self.options.localization;
        let days = self
            .mapping
            .iter()
            .zip(loc.day_names.iter())
            .map(|(day, name)| DayControl {
                day,
                name: name.clone(),
                state: self.days.state(day),
            })
            .collect();

        WidgetDescriptor {
            title: loc.title.clone(),
            visibility: self.visibility.state(),
            week_label: loc.week.clone(),
            weeks: self.weeks.clone(),
            selected_week: self.weeks[self.selected_week].value.clone(),
            days_label: loc.days.clone(),
            day_input: self.days.mode().into(),
            days,
            time_label: loc.time.clone(),
            hour: Dial {
                label: loc.hour.clone(),
                options: self.hours.clone(),
                selected: self.hour,
            },
            minute: Dial {
                label: loc.minute.clone(),
                options: self.minutes.clone(),
                selected: self.minute,
            },
            confirm: loc.confirm.clone(),
            cancel: loc.cancel.clone(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

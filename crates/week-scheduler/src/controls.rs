//! Descriptors of the widget's form controls.
//!
//! These are what a host renders: the week dropdown, the seven day inputs,
//! the hour and minute dials, and the confirm/cancel buttons, each with its
//! localized label and current value. They serialize to JSON so a host in
//! another runtime can draw them.

use serde::Serialize;

use crate::options::Localization;
use crate::selection::{DayMode, DayState};
use crate::time_dial::TimeOption;
use crate::visibility::Visibility;
use crate::week::WeekRange;

/// One entry of the week dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekOption {
    pub week: WeekRange,
    pub value: String,
    pub label: String,
}

impl WeekOption {
    pub fn new(week: WeekRange, localization: &Localization) -> Self {
        Self {
            value: week.value(),
            label: week.label(&localization.month_names, &localization.to),
            week,
        }
    }
}

/// How the day inputs are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayInput {
    Checkbox,
    Radio,
}

impl From<DayMode> for DayInput {
    fn from(mode: DayMode) -> Self {
        match mode {
            DayMode::Multiple => DayInput::Checkbox,
            DayMode::Single => DayInput::Radio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayControl {
    /// Weekday index, `0 = Sunday`.
    pub day: u8,
    pub name: String,
    pub state: DayState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dial {
    pub label: String,
    pub options: Vec<TimeOption>,
    pub selected: u32,
}

/// The buttons that raise notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Confirm,
    Cancel,
}

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerEvent {
    Confirm,
    Cancel,
}

impl SchedulerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SchedulerEvent::Confirm => "confirm",
            SchedulerEvent::Cancel => "cancel",
        }
    }
}

impl From<Button> for SchedulerEvent {
    fn from(button: Button) -> Self {
        match button {
            Button::Confirm => SchedulerEvent::Confirm,
            Button::Cancel => SchedulerEvent::Cancel,
        }
    }
}

/// Everything a host needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDescriptor {
    pub title: String,
    pub visibility: Visibility,
    pub week_label: String,
    pub weeks: Vec<WeekOption>,
    /// `value` of the selected week option.
    pub selected_week: String,
    pub days_label: String,
    pub day_input: DayInput,
    /// In display order, from the first day of week.
    pub days: Vec<DayControl>,
    pub time_label: String,
    pub hour: Dial,
    pub minute: Dial,
    pub confirm: String,
    pub cancel: String,
}

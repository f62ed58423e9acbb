//! # week-scheduler
//!
//! A widget model for picking a recurring weekly time slot: one week out of
//! a selectable range, a subset of its days, and an hour and minute.
//!
//! The crate holds the parts of the widget that have actual logic in them:
//! week arithmetic under any first day of week, conversion between a
//! selection and concrete dates, option validation, and the show/hide
//! lifecycle. Drawing the controls is left to the host, which gets a
//! serializable [`WidgetDescriptor`] to render.
//!
//! ## Modules
//!
//! - [`day_mapping`] — ordered weekdays starting at the first day of week
//! - [`week`] — the week containing a date, and the weeks between two dates
//! - [`selection`] — selection ↔ dates, tri-state days, single-day mode
//! - [`time_dial`] — hour and minute dial enumeration
//! - [`visibility`] — show/hide state machine with lifecycle hooks
//! - [`options`] — configuration, localization, validation
//! - [`controls`] — control descriptors and notifications
//! - [`widget`] — the [`WeekScheduler`] itself
//! - [`error`] — Error types

pub mod controls;
pub mod day_mapping;
pub mod error;
pub mod options;
pub mod selection;
pub mod time_dial;
pub mod visibility;
pub mod week;
pub mod widget;

pub use controls::{Button, DayInput, SchedulerEvent, WeekOption, WidgetDescriptor};
pub use day_mapping::{build_day_mapping, DayMapping};
pub use error::SchedulerError;
pub use options::{Localization, SchedulerOptions};
pub use selection::{
    dates_to_selection, selection_to_dates, DatedDay, DayMode, DayState, Selection,
};
pub use time_dial::{enumerate_hours, enumerate_minutes, TimeOption};
pub use visibility::{LifecycleHooks, Transition, Visibility};
pub use week::{week_of, weeks_between, WeekRange};
pub use widget::WeekScheduler;

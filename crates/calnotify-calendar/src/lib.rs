//! Google Calendar event notifications.
//!
//! Reminder validation and merge rules, the Calendar API transport, and the
//! four notification operations built on top of them.

pub mod client;
pub mod error;
pub mod identifiers;
pub mod notifications;
pub mod policy;
pub mod types;

pub use client::{CalendarClient, CalendarTransport};
pub use error::{CalendarError, ReminderError};
pub use identifiers::{parse_calendar_ref, parse_event_ref, resolve_calendar, EventRef};
pub use notifications::{
    clear_notifications, is_default_notifications, notifications, set_notifications,
};
pub use policy::{NotificationChange, NotificationMode, MAX_OVERRIDES, MAX_REMINDER_MINUTES};
pub use types::{
    ApiEvent, CalendarDefaults, CalendarListEntry, Reminder, ReminderMethod, ReminderRequest,
    ReminderSet,
};

//! Calendar API types and data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl ReminderMethod {
    pub const ALL: [ReminderMethod; 2] = [ReminderMethod::Popup, ReminderMethod::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Email => "email",
            ReminderMethod::Popup => "popup",
        }
    }

    /// Exact, case-sensitive match on the API name.
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(ReminderMethod::Email),
            "popup" => Some(ReminderMethod::Popup),
            _ => None,
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated notification rule: delivery method plus lead time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    /// Minutes before the event start, 0..=40320.
    pub minutes: u32,
}

impl Reminder {
    pub fn new(method: ReminderMethod, minutes: u32) -> Self {
        Self { method, minutes }
    }

    pub fn popup(minutes: u32) -> Self {
        Self::new(ReminderMethod::Popup, minutes)
    }

    pub fn email(minutes: u32) -> Self {
        Self::new(ReminderMethod::Email, minutes)
    }
}

/// Reminder configuration stored on an event.
///
/// With `use_default` set the backend ignores `overrides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSet {
    pub use_default: bool,
    #[serde(default)]
    pub overrides: Vec<Reminder>,
}

impl Default for ReminderSet {
    /// What an event without a `reminders` field means: inherit the calendar defaults.
    fn default() -> Self {
        Self {
            use_default: true,
            overrides: Vec::new(),
        }
    }
}

/// Default reminders owned by a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDefaults {
    #[serde(default)]
    pub default_reminders: Vec<Reminder>,
}

/// An unvalidated `(method, minutes)` pair as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub method: String,
    pub minutes: i64,
}

impl ReminderRequest {
    pub fn new(method: impl Into<String>, minutes: i64) -> Self {
        Self {
            method: method.into(),
            minutes,
        }
    }
}

// API Response Types

/// Google Calendar API event response (only the fields this crate reads).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    #[serde(default)]
    pub reminders: ReminderSet,
}

/// Google Calendar API calendarList entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: Option<String>,
    pub summary: Option<String>,
    #[serde(flatten)]
    pub defaults: CalendarDefaults,
}

/// PATCH body replacing an event's reminders.
#[derive(Debug, Serialize)]
pub(crate) struct ReminderPatch<'a> {
    pub reminders: &'a ReminderSet,
}

//! Reminder validation and merge rules.
//!
//! Everything here is pure: the functions decide what to send to the
//! Calendar API and what to hand back to the caller, but never talk to the
//! network themselves.

use crate::error::ReminderError;
use crate::types::{CalendarDefaults, Reminder, ReminderMethod, ReminderRequest, ReminderSet};

/// Most overrides the Calendar API accepts on one event.
pub const MAX_OVERRIDES: usize = 5;

/// Longest lead time the Calendar API accepts (four weeks).
pub const MAX_REMINDER_MINUTES: i64 = 40_320;

/// The reminders that actually fire for an event.
pub fn resolve_effective_reminders<'a>(
    event: &'a ReminderSet,
    calendar: &'a CalendarDefaults,
) -> &'a [Reminder] {
    if event.use_default {
        &calendar.default_reminders
    } else {
        &event.overrides
    }
}

pub fn is_using_defaults(event: &ReminderSet) -> bool {
    event.use_default
}

/// Validate requested overrides, keeping their order.
///
/// The count is checked first, then each pair in order (minutes before
/// method); the first violation is returned.
pub fn validate_overrides(pairs: &[ReminderRequest]) -> Result<Vec<Reminder>, ReminderError> {
    if pairs.len() > MAX_OVERRIDES {
        return Err(ReminderError::TooManyReminders { count: pairs.len() });
    }

    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            if !(0..=MAX_REMINDER_MINUTES).contains(&pair.minutes) {
                return Err(ReminderError::InvalidMinutes {
                    index,
                    minutes: pair.minutes,
                });
            }
            let method = ReminderMethod::from_api_name(&pair.method).ok_or_else(|| {
                ReminderError::InvalidMethod {
                    index,
                    method: pair.method.clone(),
                }
            })?;
            // In range per the check above
            Ok(Reminder::new(method, pair.minutes as u32))
        })
        .collect()
}

/// Payload for clearing all overrides.
///
/// `restore_default = false` leaves the event with no reminders at all,
/// which is not the same as inheriting the calendar defaults.
pub fn build_clear_payload(restore_default: bool) -> ReminderSet {
    ReminderSet {
        use_default: restore_default,
        overrides: Vec::new(),
    }
}

/// Payload installing `reminders` as the event's only reminders.
pub fn build_override_payload(reminders: Vec<Reminder>) -> ReminderSet {
    ReminderSet {
        use_default: false,
        overrides: reminders,
    }
}

/// Notification mode of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationMode {
    UsingDefaults,
    UsingOverrides(Vec<Reminder>),
}

impl From<&ReminderSet> for NotificationMode {
    fn from(set: &ReminderSet) -> Self {
        if set.use_default {
            NotificationMode::UsingDefaults
        } else {
            NotificationMode::UsingOverrides(set.overrides.clone())
        }
    }
}

impl From<NotificationMode> for ReminderSet {
    fn from(mode: NotificationMode) -> Self {
        match mode {
            NotificationMode::UsingDefaults => build_clear_payload(true),
            NotificationMode::UsingOverrides(list) => build_override_payload(list),
        }
    }
}

/// A mutation of an event's notification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationChange {
    Set(Vec<Reminder>),
    Clear { restore_default: bool },
}

impl NotificationChange {
    /// Full replacement to PATCH onto the event.
    pub fn payload(&self) -> ReminderSet {
        match self {
            NotificationChange::Set(list) => build_override_payload(list.clone()),
            NotificationChange::Clear { restore_default } => build_clear_payload(*restore_default),
        }
    }

    /// Mode the event is in once the change is applied. Independent of the
    /// previous mode since every change is a full replacement.
    pub fn resulting_mode(&self) -> NotificationMode {
        NotificationMode::from(&self.payload())
    }
}

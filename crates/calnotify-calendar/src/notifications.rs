//! The four notification operations.
//!
//! Each takes the transport explicitly, issues at most two sequential
//! requests, and logs a failed request once before returning the error.

use tracing::instrument;

use crate::client::CalendarTransport;
use crate::error::CalendarError;
use crate::policy::{self, NotificationChange};
use crate::types::{ApiEvent, CalendarDefaults, Reminder, ReminderRequest};

/// Whether the event inherits its calendar's default reminders.
#[instrument(skip(transport), level = "debug")]
pub async fn is_default_notifications<T: CalendarTransport>(
    transport: &T,
    calendar_id: &str,
    event_id: &str,
) -> Result<bool, CalendarError> {
    let event = logged(
        "is_default_notifications",
        transport.fetch_event(calendar_id, event_id).await,
    )?;
    Ok(policy::is_using_defaults(&event.reminders))
}

/// The reminders that fire for the event, following the calendar defaults
/// when the event uses them.
#[instrument(skip(transport), level = "debug")]
pub async fn notifications<T: CalendarTransport>(
    transport: &T,
    calendar_id: &str,
    event_id: &str,
) -> Result<Vec<Reminder>, CalendarError> {
    let event = logged(
        "notifications",
        transport.fetch_event(calendar_id, event_id).await,
    )?;

    let defaults = if policy::is_using_defaults(&event.reminders) {
        logged(
            "notifications",
            transport.fetch_calendar_entry(calendar_id).await,
        )?
        .defaults
    } else {
        CalendarDefaults::default()
    };

    Ok(policy::resolve_effective_reminders(&event.reminders, &defaults).to_vec())
}

/// Replace the event's reminders with `pairs`. Returns the event link.
///
/// Nothing is sent when validation fails.
#[instrument(skip(transport, pairs), fields(count = pairs.len()), level = "debug")]
pub async fn set_notifications<T: CalendarTransport>(
    transport: &T,
    calendar_id: &str,
    event_id: &str,
    pairs: &[ReminderRequest],
) -> Result<String, CalendarError> {
    let reminders = policy::validate_overrides(pairs).inspect_err(|e| {
        tracing::debug!(index = ?e.index(), "Rejected notifications: {}", e);
    })?;
    let change = NotificationChange::Set(reminders);

    let event = logged(
        "set_notifications",
        transport
            .patch_event_reminders(calendar_id, event_id, &change.payload())
            .await,
    )?;
    html_link(event)
}

/// Remove all overrides, optionally falling back to the calendar defaults.
/// Returns the event link.
#[instrument(skip(transport), level = "debug")]
pub async fn clear_notifications<T: CalendarTransport>(
    transport: &T,
    calendar_id: &str,
    event_id: &str,
    restore_default: bool,
) -> Result<String, CalendarError> {
    let change = NotificationChange::Clear { restore_default };

    let event = logged(
        "clear_notifications",
        transport
            .patch_event_reminders(calendar_id, event_id, &change.payload())
            .await,
    )?;
    html_link(event)
}

fn html_link(event: ApiEvent) -> Result<String, CalendarError> {
    event
        .html_link
        .ok_or_else(|| CalendarError::InvalidResponse("event has no htmlLink".to_string()))
}

fn logged<T>(operation: &str, result: Result<T, CalendarError>) -> Result<T, CalendarError> {
    if let Err(e) = &result {
        match e.user_visible_message() {
            Some(message) => tracing::warn!(operation, status = e.status(), "{}", message),
            None => tracing::error!(operation, error = %e, "Calendar request failed"),
        }
    }
    result
}

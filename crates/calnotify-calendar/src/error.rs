//! Calendar-specific error types.

use thiserror::Error;

use crate::policy::MAX_REMINDER_MINUTES;

/// Rejected reminder overrides. Raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Exceeds the allowed maximum number of notifications.")]
    TooManyReminders { count: usize },

    #[error("minutes must be between 0 and {}.", MAX_REMINDER_MINUTES)]
    InvalidMinutes { index: usize, minutes: i64 },

    #[error("method must be either \"email\" or \"popup\".")]
    InvalidMethod { index: usize, method: String },
}

impl ReminderError {
    /// Position of the offending reminder, when the error concerns a single one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::TooManyReminders { .. } => None,
            Self::InvalidMinutes { index, .. } | Self::InvalidMethod { index, .. } => Some(*index),
        }
    }
}

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error(transparent)]
    Validation(#[from] ReminderError),

    #[error("Invalid event reference: {0}")]
    InvalidEventRef(String),

    #[error("Invalid calendar reference: {0}")]
    InvalidCalendarRef(String),

    /// The API rejected the request and explained why.
    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API rejected the request without a usable message.
    #[error("Calendar API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CalendarError {
    /// The message to show the user verbatim, if this error carries one.
    ///
    /// `None` means the failure is opaque and should be reported generically.
    pub fn user_visible_message(&self) -> Option<String> {
        match self {
            Self::Validation(e) => Some(e.to_string()),
            Self::Api { message, .. } => Some(message.clone()),
            Self::InvalidEventRef(input) => Some(format!("Not a valid event URL or ID: {}", input)),
            Self::InvalidCalendarRef(input) => {
                Some(format!("Not a valid calendar URL or ID: {}", input))
            }
            Self::Http { .. } | Self::InvalidResponse(_) | Self::Network(_) => None,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        if let Some(msg) = self.user_visible_message() {
            return msg;
        }
        match self {
            Self::Http { status, .. } if *status >= 500 => {
                "Google Calendar is having trouble. Please try again later.".to_string()
            }
            Self::Http { .. } => "The Calendar request failed.".to_string(),
            Self::InvalidResponse(_) => "Unexpected response from Google Calendar.".to_string(),
            _ => "Network error. Check your connection.".to_string(),
        }
    }

    /// HTTP status returned by the API, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

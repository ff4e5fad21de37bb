use calnotify_calendar::CalendarError;
use calnotify_core::{AppError, NetworkError, ReqwestErrorExt};

/// `CalendarError` and `AppError` both live in other crates, so this is a
/// function rather than a `From` impl.
pub fn calendar_error_to_app(e: CalendarError) -> AppError {
    if let Some(message) = e.user_visible_message() {
        return AppError::UserVisible(message);
    }
    match e {
        CalendarError::Http { status, body } => AppError::Network(NetworkError::ServerError {
            status,
            message: body,
        }),
        CalendarError::InvalidResponse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
        CalendarError::Network(e) => AppError::Network(e.into_network_error()),
        other => AppError::Service(other.to_string()),
    }
}

//! Maps calendar and formula errors to `calnotify_core::AppError` for
//! consistent messages in the command-line host.

mod calendar;
mod formula;

pub use calendar::calendar_error_to_app;

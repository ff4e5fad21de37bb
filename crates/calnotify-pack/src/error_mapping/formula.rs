use calnotify_core::AppError;

use super::calendar_error_to_app;
use crate::error::FormulaError;

impl From<FormulaError> for AppError {
    fn from(e: FormulaError) -> Self {
        match e {
            FormulaError::Calendar(e) => calendar_error_to_app(e),
            other => AppError::UserVisible(other.to_string()),
        }
    }
}

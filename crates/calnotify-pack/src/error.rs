use calnotify_calendar::CalendarError;
use thiserror::Error;

use crate::schema::ParameterType;

#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Missing required parameter \"{0}\".")]
    MissingParameter(String),

    #[error("Parameter \"{name}\" expects a {expected:?}, got {got}.")]
    InvalidParameter {
        name: String,
        expected: ParameterType,
        got: String,
    },

    #[error("Parameter \"{name}\" must be a whole number, got {value}.")]
    FractionalNumber { name: String, value: f64 },

    #[error("Each notification needs both a method and minutes.")]
    IncompleteVarargs,

    #[error("{formula} takes at most {max} arguments, got {got}.")]
    TooManyArguments {
        formula: String,
        max: usize,
        got: usize,
    },

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl FormulaError {
    /// The message to show the user verbatim, or `None` for opaque failures.
    pub fn user_visible_message(&self) -> Option<String> {
        match self {
            Self::Calendar(e) => e.user_visible_message(),
            other => Some(other.to_string()),
        }
    }

    /// Message for display, generic when the failure is opaque.
    ///
    /// Opaque failures were already logged by the operation that raised them.
    pub fn user_message(&self) -> String {
        match self {
            Self::Calendar(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

//! Formula declarations.
//!
//! The host reads these to render parameter hints, check argument counts and
//! know which network domain and OAuth scopes the pack needs.

use serde::Serialize;
use serde_json::{json, Value};

use calnotify_auth::CALENDAR_SCOPES;
use calnotify_calendar::ReminderMethod;

pub const NETWORK_DOMAIN: &str = "googleapis.com";
pub const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub const IS_DEFAULT_NOTIFICATIONS: &str = "IsDefaultNotifications";
pub const NOTIFICATIONS: &str = "Notifications";
pub const SET_NOTIFICATIONS: &str = "SetNotifications";
pub const CLEAR_NOTIFICATIONS: &str = "ClearNotifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub autocomplete: Vec<Value>,
}

impl ParamDef {
    fn required(name: &'static str, param_type: ParameterType, description: &'static str) -> Self {
        Self {
            name,
            description,
            param_type,
            optional: false,
            default: None,
            autocomplete: Vec::new(),
        }
    }

    fn optional(mut self, default: Value) -> Self {
        self.optional = true;
        self.default = Some(default);
        self
    }

    fn suggest(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.autocomplete = values.into_iter().collect();
        self
    }
}

/// Queries only read; actions modify the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormulaKind {
    Query,
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "properties")]
pub enum ResultType {
    Boolean,
    String,
    /// Array of objects with the listed properties.
    ObjectArray(Vec<(&'static str, ParameterType)>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaDef {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FormulaKind,
    pub parameters: Vec<ParamDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vararg_parameters: Vec<ParamDef>,
    pub result: ResultType,
}

impl FormulaDef {
    /// Upper bound on positional arguments, `None` when varargs are accepted.
    pub fn max_args(&self) -> Option<usize> {
        if self.vararg_parameters.is_empty() {
            Some(self.parameters.len())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDef {
    pub authorization_url: &'static str,
    pub token_url: &'static str,
    pub scopes: Vec<&'static str>,
    pub extra_params: Vec<(&'static str, &'static str)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackDefinition {
    pub network_domains: Vec<&'static str>,
    pub authentication: AuthDef,
    pub formulas: Vec<FormulaDef>,
}

impl PackDefinition {
    pub fn formula(&self, name: &str) -> Option<&FormulaDef> {
        self.formulas.iter().find(|f| f.name == name)
    }
}

fn event_param() -> ParamDef {
    ParamDef::required("event", ParameterType::String, "The URL or ID of an event.")
}

fn calendar_param() -> ParamDef {
    ParamDef::required(
        "calendar",
        ParameterType::String,
        "The URL, ID, or name of the calendar to use.",
    )
    .optional(json!("primary"))
}

fn shared_params() -> Vec<ParamDef> {
    vec![event_param(), calendar_param()]
}

/// The full pack declaration.
pub fn pack() -> PackDefinition {
    PackDefinition {
        network_domains: vec![NETWORK_DOMAIN],
        authentication: AuthDef {
            authorization_url: AUTHORIZATION_URL,
            token_url: TOKEN_URL,
            scopes: CALENDAR_SCOPES.to_vec(),
            extra_params: vec![("access_type", "offline"), ("prompt", "consent")],
        },
        formulas: vec![
            FormulaDef {
                name: IS_DEFAULT_NOTIFICATIONS,
                description: "Returns whether the notifications set on the given Google Calendar event are the default notification(s) of the calendar.",
                kind: FormulaKind::Query,
                parameters: shared_params(),
                vararg_parameters: Vec::new(),
                result: ResultType::Boolean,
            },
            FormulaDef {
                name: NOTIFICATIONS,
                description: "Returns the notifications set on the given Google Calendar event.",
                kind: FormulaKind::Query,
                parameters: shared_params(),
                vararg_parameters: Vec::new(),
                result: ResultType::ObjectArray(vec![
                    ("method", ParameterType::String),
                    ("minutes", ParameterType::Number),
                ]),
            },
            FormulaDef {
                name: SET_NOTIFICATIONS,
                description: "Set one or more notifications on the given Google Calendar event. The maximum number of notifications is 5.",
                kind: FormulaKind::Action,
                parameters: shared_params(),
                vararg_parameters: vec![
                    ParamDef::required(
                        "method",
                        ParameterType::String,
                        "The method used by this notification. Possible values are: \"email\" and \"popup\".",
                    )
                    .optional(json!("popup"))
                    .suggest(ReminderMethod::ALL.map(|m| json!(m.as_str()))),
                    ParamDef::required(
                        "minutes",
                        ParameterType::Number,
                        "Number of minutes before the start of the event when the reminder should trigger. Valid values are between 0 and 40320 (4 weeks in minutes).",
                    )
                    .suggest([5, 10, 15, 30, 60, 120].map(|m| json!(m))),
                ],
                result: ResultType::String,
            },
            FormulaDef {
                name: CLEAR_NOTIFICATIONS,
                description: "Delete all notifications set on the given Google Calendar event.",
                kind: FormulaKind::Action,
                parameters: vec![
                    event_param(),
                    calendar_param(),
                    ParamDef::required(
                        "restoreDefault",
                        ParameterType::Boolean,
                        "Whether to restore the default notification(s) of the calendar on the event. Default is `False()`.",
                    )
                    .optional(json!(false)),
                ],
                vararg_parameters: Vec::new(),
                result: ResultType::String,
            },
        ],
    }
}

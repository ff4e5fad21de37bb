//! Coercion of raw host arguments into typed parameter values.
//!
//! `null` and missing arguments are treated alike: optional parameters fall
//! back to their declared default, required ones are reported missing.

use serde_json::Value;

use crate::error::FormulaError;
use crate::schema::ParamDef;

fn missing(param: &ParamDef) -> FormulaError {
    FormulaError::MissingParameter(param.name.to_string())
}

fn mismatch(param: &ParamDef, value: &Value) -> FormulaError {
    FormulaError::InvalidParameter {
        name: param.name.to_string(),
        expected: param.param_type,
        got: describe(value),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// The argument, or `None` when absent or `null`.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// The argument, or the declared default when absent.
fn or_default<'a>(param: &'a ParamDef, value: Option<&'a Value>) -> Option<&'a Value> {
    present(value).or(param.default.as_ref())
}

/// Coerce a string parameter without applying its default.
///
/// Numbers are accepted and rendered as text, since hosts that parse
/// arguments as JSON turn numeric IDs into numbers.
pub fn optional_string(
    param: &ParamDef,
    value: Option<&Value>,
) -> Result<Option<String>, FormulaError> {
    match present(value) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(mismatch(param, other)),
    }
}

pub fn string(param: &ParamDef, value: Option<&Value>) -> Result<String, FormulaError> {
    optional_string(param, or_default(param, value))?.ok_or_else(|| missing(param))
}

/// Coerce a whole-number parameter. Fractional values are rejected.
pub fn integer(param: &ParamDef, value: Option<&Value>) -> Result<i64, FormulaError> {
    let value = or_default(param, value).ok_or_else(|| missing(param))?;
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => whole(param, value, n.as_f64()),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => Ok(i),
                Err(_) => whole(param, value, trimmed.parse::<f64>().ok()),
            }
        }
        other => Err(mismatch(param, other)),
    }
}

fn whole(param: &ParamDef, raw: &Value, number: Option<f64>) -> Result<i64, FormulaError> {
    match number {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Some(f) if f.is_finite() => Err(FormulaError::FractionalNumber {
            name: param.name.to_string(),
            value: f,
        }),
        _ => Err(mismatch(param, raw)),
    }
}

pub fn boolean(param: &ParamDef, value: Option<&Value>) -> Result<bool, FormulaError> {
    let value = or_default(param, value).ok_or_else(|| missing(param))?;
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(mismatch(param, value)),
        },
        other => Err(mismatch(param, other)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::schema::{pack, CLEAR_NOTIFICATIONS, SET_NOTIFICATIONS};
    use serde_json::json;

    fn param(formula: &str, name: &str) -> ParamDef {
        let pack = pack();
        let def = pack.formula(formula).unwrap();
        def.parameters
            .iter()
            .chain(def.vararg_parameters.iter())
            .find(|p| p.name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_required_string() {
        let event = param(SET_NOTIFICATIONS, "event");
        assert_eq!(string(&event, Some(&json!("abc"))).unwrap(), "abc");
        assert_eq!(string(&event, Some(&json!(12345))).unwrap(), "12345");
        assert!(matches!(
            string(&event, None),
            Err(FormulaError::MissingParameter(name)) if name == "event"
        ));
        assert!(matches!(
            string(&event, Some(&Value::Null)),
            Err(FormulaError::MissingParameter(_))
        ));
        assert!(matches!(
            string(&event, Some(&json!(true))),
            Err(FormulaError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_optional_string_ignores_default() {
        let calendar = param(SET_NOTIFICATIONS, "calendar");
        assert_eq!(optional_string(&calendar, None).unwrap(), None);
        assert_eq!(optional_string(&calendar, Some(&Value::Null)).unwrap(), None);
        assert_eq!(string(&calendar, None).unwrap(), "primary");
    }

    #[test]
    fn test_method_default() {
        let method = param(SET_NOTIFICATIONS, "method");
        assert_eq!(string(&method, Some(&Value::Null)).unwrap(), "popup");
        assert_eq!(string(&method, Some(&json!("email"))).unwrap(), "email");
    }

    #[test]
    fn test_integer_coercion() {
        let minutes = param(SET_NOTIFICATIONS, "minutes");
        assert_eq!(integer(&minutes, Some(&json!(10))).unwrap(), 10);
        assert_eq!(integer(&minutes, Some(&json!(10.0))).unwrap(), 10);
        assert_eq!(integer(&minutes, Some(&json!(" 30 "))).unwrap(), 30);
        assert_eq!(integer(&minutes, Some(&json!(-1))).unwrap(), -1);
        assert!(matches!(
            integer(&minutes, Some(&json!(10.5))),
            Err(FormulaError::FractionalNumber { value, .. }) if value == 10.5
        ));
        assert!(matches!(
            integer(&minutes, Some(&json!("2.5"))),
            Err(FormulaError::FractionalNumber { .. })
        ));
        assert!(matches!(
            integer(&minutes, Some(&json!("soon"))),
            Err(FormulaError::InvalidParameter { .. })
        ));
        assert!(matches!(
            integer(&minutes, None),
            Err(FormulaError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_boolean_coercion() {
        let restore = param(CLEAR_NOTIFICATIONS, "restoreDefault");
        assert!(boolean(&restore, Some(&json!(true))).unwrap());
        assert!(boolean(&restore, Some(&json!("TRUE"))).unwrap());
        assert!(!boolean(&restore, Some(&json!("false"))).unwrap());
        assert!(!boolean(&restore, None).unwrap());
        assert!(matches!(
            boolean(&restore, Some(&json!(1))),
            Err(FormulaError::InvalidParameter { .. })
        ));
    }
}

use serde_json::Value;

pub const USAGE: &str = "\
Usage:
  calnotify auth                     Sign in with Google and store the token
  calnotify logout                   Delete the stored token
  calnotify status                   Show whether a usable token is stored
  calnotify formulas                 List formulas and their parameters
  calnotify <Formula> [args...]      Run a formula, e.g.
      calnotify Notifications <event> [calendar]
      calnotify SetNotifications <event> <calendar> popup 10 email 60
      calnotify ClearNotifications <event> <calendar> true

Arguments are passed as text and converted per parameter type; a bare
`null` leaves an optional argument at its default.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Auth,
    Logout,
    Status,
    Formulas,
    Help,
    Invoke { formula: String, args: Vec<Value> },
}

pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return Ok(Command::Help);
    };

    let command = match first.as_str() {
        "auth" => Command::Auth,
        "logout" => Command::Logout,
        "status" => Command::Status,
        "formulas" => Command::Formulas,
        "help" | "--help" | "-h" => Command::Help,
        flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
        formula => {
            return Ok(Command::Invoke {
                formula: formula.to_string(),
                args: args.map(|a| parse_value(&a)).collect(),
            })
        }
    };

    match args.next() {
        Some(extra) => Err(format!("Unexpected argument: {}", extra)),
        None => Ok(command),
    }
}

/// Arguments stay text so IDs such as `1e5` reach the formula unchanged.
/// Only a bare `null` is special.
pub fn parse_value(raw: &str) -> Value {
    match raw {
        "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_subcommands() {
        assert_eq!(parse_args(args(&["auth"])), Ok(Command::Auth));
        assert_eq!(parse_args(args(&["logout"])), Ok(Command::Logout));
        assert_eq!(parse_args(args(&["status"])), Ok(Command::Status));
        assert_eq!(parse_args(args(&["formulas"])), Ok(Command::Formulas));
        assert_eq!(parse_args(args(&[])), Ok(Command::Help));
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
    }

    #[test]
    fn test_subcommands_take_no_arguments() {
        assert!(parse_args(args(&["auth", "now"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_formula_invocation() {
        let command = parse_args(args(&[
            "SetNotifications",
            "evt123",
            "primary",
            "popup",
            "10",
            "email",
            "60",
        ]))
        .unwrap();

        assert_eq!(
            command,
            Command::Invoke {
                formula: "SetNotifications".to_string(),
                args: vec![
                    json!("evt123"),
                    json!("primary"),
                    json!("popup"),
                    json!("10"),
                    json!("email"),
                    json!("60"),
                ],
            }
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), json!("true"));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("7.5"), json!("7.5"));
        assert_eq!(
            parse_value("https://www.google.com/calendar/event?eid=abc"),
            json!("https://www.google.com/calendar/event?eid=abc")
        );
        assert_eq!(parse_value(""), json!(""));
    }

    #[test]
    fn test_event_ids_that_look_numeric_are_kept() {
        assert_eq!(parse_value("1e5"), json!("1e5"));
        assert_eq!(parse_value("12e45"), json!("12e45"));
        assert_eq!(
            parse_value("1234567890123456789012345"),
            json!("1234567890123456789012345")
        );

        let command = parse_args(args(&["Notifications", "1e5", "null"])).unwrap();
        assert_eq!(
            command,
            Command::Invoke {
                formula: "Notifications".to_string(),
                args: vec![json!("1e5"), Value::Null],
            }
        );
    }
}

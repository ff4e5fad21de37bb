//! Formula dispatch.

use serde_json::{json, Value};
use tracing::instrument;

use calnotify_calendar::{
    clear_notifications, is_default_notifications, notifications, parse_event_ref,
    resolve_calendar, set_notifications, CalendarTransport, ReminderRequest,
};

use crate::coerce;
use crate::error::FormulaError;
use crate::schema::{
    pack, FormulaDef, CLEAR_NOTIFICATIONS, IS_DEFAULT_NOTIFICATIONS, NOTIFICATIONS,
    SET_NOTIFICATIONS,
};

/// Settings the host supplies alongside the arguments.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    /// Calendar used when neither the arguments nor the event link name one.
    pub default_calendar: String,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            default_calendar: "primary".to_string(),
        }
    }
}

/// Run the formula `name` with raw host arguments and render its result.
///
/// Arguments are positional in declaration order; `SetNotifications` takes
/// any number of trailing `(method, minutes)` pairs.
#[instrument(skip(transport, args, options), fields(arg_count = args.len()))]
pub async fn invoke<T: CalendarTransport>(
    transport: &T,
    name: &str,
    args: &[Value],
    options: &InvokeOptions,
) -> Result<Value, FormulaError> {
    let pack = pack();
    let def = pack
        .formula(name)
        .ok_or_else(|| FormulaError::UnknownFormula(name.to_string()))?;

    if let Some(max) = def.max_args() {
        if args.len() > max {
            return Err(FormulaError::TooManyArguments {
                formula: def.name.to_string(),
                max,
                got: args.len(),
            });
        }
    }

    let event = coerce::string(&def.parameters[0], args.first())?;
    let calendar_arg = coerce::optional_string(&def.parameters[1], args.get(1))?;

    let event_ref = parse_event_ref(&event)?;
    let calendar = resolve_calendar(
        &event_ref,
        calendar_arg.as_deref(),
        &options.default_calendar,
    )?;
    let event_id = event_ref.event_id.as_str();

    tracing::debug!(formula = def.name, calendar = %calendar, event = event_id, "Invoking formula");

    match def.name {
        IS_DEFAULT_NOTIFICATIONS => {
            let using_defaults = is_default_notifications(transport, &calendar, event_id).await?;
            Ok(json!(using_defaults))
        }
        NOTIFICATIONS => {
            let reminders = notifications(transport, &calendar, event_id).await?;
            Ok(Value::Array(
                reminders
                    .iter()
                    .map(|r| json!({ "method": r.method.as_str(), "minutes": r.minutes }))
                    .collect(),
            ))
        }
        SET_NOTIFICATIONS => {
            let pairs = reminder_pairs(def, args.get(2..).unwrap_or_default())?;
            let link = set_notifications(transport, &calendar, event_id, &pairs).await?;
            Ok(json!(link))
        }
        CLEAR_NOTIFICATIONS => {
            let restore_default = coerce::boolean(&def.parameters[2], args.get(2))?;
            let link = clear_notifications(transport, &calendar, event_id, restore_default).await?;
            Ok(json!(link))
        }
        other => Err(FormulaError::UnknownFormula(other.to_string())),
    }
}

/// Group trailing arguments into `(method, minutes)` pairs, in order.
fn reminder_pairs(def: &FormulaDef, rest: &[Value]) -> Result<Vec<ReminderRequest>, FormulaError> {
    if !rest.len().is_multiple_of(2) {
        return Err(FormulaError::IncompleteVarargs);
    }
    let (method_param, minutes_param) = match def.vararg_parameters.as_slice() {
        [method, minutes] => (method, minutes),
        _ => return Err(FormulaError::IncompleteVarargs),
    };

    rest.chunks(2)
        .map(|pair| {
            let method = coerce::string(method_param, pair.first())?;
            let minutes = coerce::integer(minutes_param, pair.get(1))?;
            Ok(ReminderRequest::new(method, minutes))
        })
        .collect()
}

//! Turning user input (IDs or Google Calendar URLs) into API identifiers.
//!
//! Event links look like `https://www.google.com/calendar/event?eid=<b64>`
//! where the payload is `"<event id> <calendar id>"`. Calendar links carry
//! either a plain `src=<id>` or a base64 `cid=<b64>`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use url::Url;

use crate::error::CalendarError;

const PRIMARY: &str = "primary";

/// An event identified by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub event_id: String,
    /// Calendar embedded in an event link, if any.
    pub calendar_id: Option<String>,
}

/// Parse an event URL or ID.
pub fn parse_event_ref(input: &str) -> Result<EventRef, CalendarError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CalendarError::InvalidEventRef(input.to_string()));
    }

    let Some(url) = parse_http_url(trimmed) else {
        return Ok(EventRef {
            event_id: trimmed.to_string(),
            calendar_id: None,
        });
    };

    let decoded = query_param(&url, "eid")
        .and_then(|eid| decode_b64(&eid))
        .ok_or_else(|| CalendarError::InvalidEventRef(input.to_string()))?;

    let mut parts = decoded.split_whitespace();
    let event_id = parts
        .next()
        .ok_or_else(|| CalendarError::InvalidEventRef(input.to_string()))?;
    let calendar_id = parts.next().map(expand_calendar_suffix);

    Ok(EventRef {
        event_id: event_id.to_string(),
        calendar_id,
    })
}

/// Parse a calendar URL or ID. Empty input means the user's primary calendar.
pub fn parse_calendar_ref(input: &str) -> Result<String, CalendarError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(PRIMARY.to_string());
    }

    let Some(url) = parse_http_url(trimmed) else {
        return Ok(trimmed.to_string());
    };

    if let Some(src) = query_param(&url, "src") {
        return Ok(src);
    }
    if let Some(cid) = query_param(&url, "cid") {
        // cid is usually base64 but older links carry the raw ID
        return Ok(decode_b64(&cid).unwrap_or(cid));
    }

    Err(CalendarError::InvalidCalendarRef(input.to_string()))
}

/// Pick the calendar for an operation.
///
/// An explicit calendar argument wins; otherwise the calendar embedded in
/// the event link; otherwise `fallback`.
pub fn resolve_calendar(
    event: &EventRef,
    calendar_arg: Option<&str>,
    fallback: &str,
) -> Result<String, CalendarError> {
    match calendar_arg {
        Some(arg) => parse_calendar_ref(arg),
        None => match &event.calendar_id {
            Some(id) => Ok(id.clone()),
            None => parse_calendar_ref(fallback),
        },
    }
}

fn parse_http_url(input: &str) -> Option<Url> {
    Url::parse(input)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Decode base64 in either alphabet, padded or not.
fn decode_b64(input: &str) -> Option<String> {
    let normalized: String = input
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            // query decoding turns an unescaped '+' into a space
            ' ' => '-',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    String::from_utf8(bytes).ok()
}

/// Event links abbreviate `@gmail.com` as `@m`.
fn expand_calendar_suffix(id: &str) -> String {
    match id.strip_suffix("@m") {
        Some(user) => format!("{}@gmail.com", user),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn event_link(payload: &str) -> String {
        format!(
            "https://www.google.com/calendar/event?eid={}",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_plain_event_id() {
        let event = parse_event_ref("  abc123def  ").unwrap();
        assert_eq!(event.event_id, "abc123def");
        assert_eq!(event.calendar_id, None);
    }

    #[test]
    fn test_event_link_with_gmail_calendar() {
        let event = parse_event_ref(&event_link("4kq0ebn3v1 someone@m")).unwrap();
        assert_eq!(event.event_id, "4kq0ebn3v1");
        assert_eq!(event.calendar_id.as_deref(), Some("someone@gmail.com"));
    }

    #[test]
    fn test_event_link_padded_standard_alphabet() {
        let eid = STANDARD.encode("evt_1 team@group.calendar.google.com");
        let link = format!(
            "https://calendar.google.com/calendar/event?eid={}&ctz=UTC",
            urlencode(&eid)
        );

        let event = parse_event_ref(&link).unwrap();

        assert_eq!(event.event_id, "evt_1");
        assert_eq!(
            event.calendar_id.as_deref(),
            Some("team@group.calendar.google.com")
        );
    }

    #[test]
    fn test_event_link_without_eid() {
        let result = parse_event_ref("https://calendar.google.com/calendar/r");
        assert!(matches!(result, Err(CalendarError::InvalidEventRef(_))));
    }

    #[test]
    fn test_empty_event() {
        assert!(matches!(
            parse_event_ref("   "),
            Err(CalendarError::InvalidEventRef(_))
        ));
    }

    #[test]
    fn test_calendar_refs() {
        assert_eq!(parse_calendar_ref("primary").unwrap(), "primary");
        assert_eq!(parse_calendar_ref("").unwrap(), "primary");
        assert_eq!(
            parse_calendar_ref("team@group.calendar.google.com").unwrap(),
            "team@group.calendar.google.com"
        );
        assert_eq!(
            parse_calendar_ref(
                "https://calendar.google.com/calendar/embed?src=team%40group.calendar.google.com&ctz=UTC"
            )
            .unwrap(),
            "team@group.calendar.google.com"
        );
        let cid = URL_SAFE_NO_PAD.encode("someone@gmail.com");
        assert_eq!(
            parse_calendar_ref(&format!("https://calendar.google.com/calendar/u/0?cid={}", cid))
                .unwrap(),
            "someone@gmail.com"
        );
        assert!(matches!(
            parse_calendar_ref("https://calendar.google.com/calendar/r"),
            Err(CalendarError::InvalidCalendarRef(_))
        ));
    }

    #[test]
    fn test_resolve_calendar_precedence() {
        let event = EventRef {
            event_id: "e".into(),
            calendar_id: Some("embedded@gmail.com".into()),
        };
        assert_eq!(
            resolve_calendar(&event, Some("work@example.com"), "primary").unwrap(),
            "work@example.com"
        );
        assert_eq!(
            resolve_calendar(&event, None, "primary").unwrap(),
            "embedded@gmail.com"
        );

        let bare = EventRef {
            event_id: "e".into(),
            calendar_id: None,
        };
        assert_eq!(resolve_calendar(&bare, None, "primary").unwrap(), "primary");
    }

    fn urlencode(s: &str) -> String {
        s.replace('+', "%2B").replace('/', "%2F").replace('=', "%3D")
    }
}

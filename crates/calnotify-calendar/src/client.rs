//! Google Calendar API client.

use std::time::Duration;

use tracing::instrument;

use crate::error::CalendarError;
use crate::types::{ApiEvent, CalendarListEntry, ReminderPatch, ReminderSet};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The three Calendar API calls the notification operations need.
///
/// Implemented by [`CalendarClient`]; tests substitute in-memory doubles.
#[allow(async_fn_in_trait)]
pub trait CalendarTransport {
    async fn fetch_event(&self, calendar_id: &str, event_id: &str)
        -> Result<ApiEvent, CalendarError>;

    async fn fetch_calendar_entry(&self, calendar_id: &str)
        -> Result<CalendarListEntry, CalendarError>;

    /// Replace the event's reminders wholesale.
    async fn patch_event_reminders(
        &self,
        calendar_id: &str,
        event_id: &str,
        reminders: &ReminderSet,
    ) -> Result<ApiEvent, CalendarError>;
}

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Use a different API root (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Rebuild the HTTP client with a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, CalendarError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id),
        )
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| CalendarError::InvalidResponse(format!("JSON parse error: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        match api_error_message(&body) {
            Some(message) => Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            }),
            None => Err(CalendarError::Http {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

impl CalendarTransport for CalendarClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<ApiEvent, CalendarError> {
        let response = self
            .client
            .get(self.event_url(calendar_id, event_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_calendar_entry(
        &self,
        calendar_id: &str,
    ) -> Result<CalendarListEntry, CalendarError> {
        let url = format!(
            "{}/users/me/calendarList/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    #[instrument(skip(self, reminders), fields(use_default = reminders.use_default, overrides = reminders.overrides.len()), level = "info")]
    async fn patch_event_reminders(
        &self,
        calendar_id: &str,
        event_id: &str,
        reminders: &ReminderSet,
    ) -> Result<ApiEvent, CalendarError> {
        let response = self
            .client
            .patch(self.event_url(calendar_id, event_id))
            .bearer_auth(&self.access_token)
            .json(&ReminderPatch { reminders })
            .send()
            .await?;

        self.handle_response(response).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Google wraps errors as `{"error": {"code": .., "message": ..}}`; a bare
/// top-level `message` is accepted too.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::Reminder;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> CalendarClient {
        CalendarClient::new("test_token").with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn test_fetch_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/event123"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "event123",
                "summary": "Team Sync",
                "reminders": {
                    "useDefault": false,
                    "overrides": [{"method": "popup", "minutes": 15}]
                }
            })))
            .mount(&mock_server)
            .await;

        let event = client(&mock_server)
            .fetch_event("primary", "event123")
            .await
            .unwrap();

        assert_eq!(event.summary.as_deref(), Some("Team Sync"));
        assert_eq!(event.reminders.overrides, vec![Reminder::popup(15)]);
    }

    #[tokio::test]
    async fn test_fetch_calendar_entry_encodes_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList/team%40group.calendar.google.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "team@group.calendar.google.com",
                "defaultReminders": [{"method": "email", "minutes": 60}]
            })))
            .mount(&mock_server)
            .await;

        let entry = client(&mock_server)
            .fetch_calendar_entry("team@group.calendar.google.com")
            .await
            .unwrap();

        assert_eq!(entry.defaults.default_reminders, vec![Reminder::email(60)]);
    }

    #[tokio::test]
    async fn test_patch_sends_full_reminder_set() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/calendars/primary/events/event123"))
            .and(body_json(serde_json::json!({
                "reminders": {"useDefault": true, "overrides": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "event123",
                "htmlLink": "https://www.google.com/calendar/event?eid=xyz",
                "reminders": {"useDefault": true}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let set = ReminderSet {
            use_default: true,
            overrides: vec![],
        };
        let event = client(&mock_server)
            .patch_event_reminders("primary", "event123", &set)
            .await
            .unwrap();

        assert_eq!(
            event.html_link.as_deref(),
            Some("https://www.google.com/calendar/event?eid=xyz")
        );
    }

    #[tokio::test]
    async fn test_structured_error_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "Not Found", "errors": []}
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).fetch_event("primary", "missing").await;

        match result {
            Err(CalendarError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_opaque_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList/primary"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).fetch_calendar_entry("primary").await;

        assert!(matches!(
            result,
            Err(CalendarError::Http { status: 500, ref body }) if body == "upstream exploded"
        ));
    }

    #[tokio::test]
    async fn test_unparseable_success_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/e1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).fetch_event("primary", "e1").await;

        assert!(matches!(result, Err(CalendarError::InvalidResponse(_))));
    }

    #[test]
    fn test_api_error_message_shapes() {
        assert_eq!(
            api_error_message(r#"{"error": {"message": "Forbidden"}}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(
            api_error_message(r#"{"message": "Bad things"}"#).as_deref(),
            Some("Bad things")
        );
        assert_eq!(api_error_message(r#"{"error": "invalid_grant"}"#), None);
        assert_eq!(api_error_message(r#"{"error": {"message": "  "}}"#), None);
        assert_eq!(api_error_message("<html></html>"), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = CalendarClient::new("t").with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
        assert_eq!(
            client.event_url("team@example.com", "evt1"),
            "http://localhost:1234/calendars/team%40example.com/events/evt1"
        );
    }
}

//! Remote sync client: one HTTP write per edit attempt.
//!
//! Servers answer edits in two dialects (`{"status": "success"}` and
//! `{"success": true}`); [`interpret`] folds both into a single
//! `Result<SuccessPayload, SyncFailure>` so the controller never sees them.

use contracts::domain::a001_memorial::edit::STATUS_SUCCESS;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Shown when a failure carries no server message
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Non-empty CSRF token; every [`EditRequest`] carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded`
    Form(String),
    Json(String),
}

impl RequestBody {
    pub fn form<T: Serialize>(value: &T) -> Result<Self, String> {
        serde_qs::to_string(value)
            .map(RequestBody::Form)
            .map_err(|e| format!("Failed to encode form: {}", e))
    }

    pub fn json<T: Serialize>(value: &T) -> Result<Self, String> {
        serde_json::to_string(value)
            .map(RequestBody::Json)
            .map_err(|e| format!("Failed to serialize request: {}", e))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
            RequestBody::Json(_) => "application/json",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestBody::Form(body) | RequestBody::Json(body) => body,
        }
    }
}

/// Built per submission, dropped after the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Same-origin path
    pub endpoint: String,
    pub body: RequestBody,
    pub csrf_token: CsrfToken,
}

/// Status and body as received, before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncFailure {
    /// No response: connection error or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status
    #[error("HTTP {status}")]
    Transport { status: u16, message: Option<String> },

    /// 2xx status but the body rejects the edit
    #[error("Rejected: {0}")]
    Domain(String),
}

impl SyncFailure {
    /// Best message for the user: the server's text if it sent one
    pub fn user_message(&self) -> String {
        match self {
            SyncFailure::Transport {
                message: Some(message),
                ..
            } => message.clone(),
            SyncFailure::Domain(message) if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Success body, kept as JSON; field-specific code picks what it needs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuccessPayload(pub Value);

impl SuccessPayload {
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// Carries a request over the wire; the browser implementation lives in
/// [`super::transport`], tests script their own.
#[allow(async_fn_in_trait)]
pub trait SyncTransport {
    async fn post(&self, request: &EditRequest) -> Result<RawResponse, SyncFailure>;
}

#[derive(Debug, Clone, Default)]
pub struct RemoteSyncClient<T> {
    transport: T,
}

impl<T: SyncTransport> RemoteSyncClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Single attempt, no retries
    pub async fn send(&self, request: &EditRequest) -> Result<SuccessPayload, SyncFailure> {
        let raw = self.transport.post(request).await?;
        interpret(raw)
    }
}

pub fn interpret(raw: RawResponse) -> Result<SuccessPayload, SyncFailure> {
    let body = serde_json::from_str::<Value>(&raw.body).ok();

    if !(200..300).contains(&raw.status) {
        return Err(SyncFailure::Transport {
            status: raw.status,
            message: body.as_ref().and_then(server_message),
        });
    }

    let Some(body) = body else {
        return Err(SyncFailure::Domain(String::new()));
    };

    match domain_success(&body) {
        Some(false) => Err(SyncFailure::Domain(
            server_message(&body).unwrap_or_default(),
        )),
        Some(true) | None => Ok(SuccessPayload(body)),
    }
}

fn domain_success(body: &Value) -> Option<bool> {
    if let Some(status) = body.get("status") {
        return Some(status.as_str() == Some(STATUS_SUCCESS));
    }
    body.get("success").map(|flag| flag.as_bool() == Some(true))
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn status_dialect_success() {
        let payload = interpret(raw(200, r#"{"status":"success","new_name":"Jane Doe"}"#)).unwrap();
        assert_eq!(payload.str_field("new_name"), Some("Jane Doe"));
    }

    #[test]
    fn success_flag_dialect() {
        let payload = interpret(raw(200, r#"{"success":true,"biography":"Hi"}"#)).unwrap();
        assert_eq!(payload.str_field("biography"), Some("Hi"));

        let failure = interpret(raw(200, r#"{"success":false,"error":"Too long"}"#)).unwrap_err();
        assert_eq!(failure, SyncFailure::Domain("Too long".into()));
    }

    #[test]
    fn ok_status_with_error_body_is_domain_failure() {
        let failure =
            interpret(raw(200, r#"{"status":"error","message":"Not allowed"}"#)).unwrap_err();
        assert_eq!(failure, SyncFailure::Domain("Not allowed".into()));
        assert_eq!(failure.user_message(), "Not allowed");
    }

    #[test]
    fn body_without_discriminator_is_success() {
        assert!(interpret(raw(204, "{}")).is_ok());
    }

    #[test]
    fn non_json_success_body_is_rejected() {
        let failure = interpret(raw(200, "<html>login</html>")).unwrap_err();
        assert_eq!(failure.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn non_2xx_keeps_server_message() {
        let failure = interpret(raw(
            400,
            r#"{"status":"error","message":"Invalid date format. Use YYYY-MM-DD."}"#,
        ))
        .unwrap_err();
        assert_eq!(
            failure,
            SyncFailure::Transport {
                status: 400,
                message: Some("Invalid date format. Use YYYY-MM-DD.".into()),
            }
        );

        let failure = interpret(raw(502, "Bad Gateway")).unwrap_err();
        assert_eq!(failure.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn network_failure_uses_generic_message() {
        let failure = SyncFailure::Network("connection refused".into());
        assert_eq!(failure.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn csrf_token_must_not_be_blank() {
        assert!(CsrfToken::new("  ").is_none());
        assert_eq!(CsrfToken::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn form_body_is_url_encoded() {
        #[derive(Serialize)]
        struct Form {
            banner_type: &'static str,
            banner_value: &'static str,
        }
        let body = RequestBody::form(&Form {
            banner_type: "color",
            banner_value: "red",
        })
        .unwrap();
        assert_eq!(body.as_str(), "banner_type=color&banner_value=red");
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
    }
}

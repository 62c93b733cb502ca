use std::future::Future;
use std::time::Duration;

use contracts::shared::csrf::CSRF_HEADER;
use futures_util::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;

use super::sync_client::{EditRequest, RawResponse, SyncFailure, SyncTransport};
use crate::shared::api_utils::api_url;

/// Upper bound on how long an edit may stay pending
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(15);

/// `fetch`-based transport for the browser
#[derive(Debug, Clone, Copy)]
pub struct BrowserTransport {
    timeout: Duration,
}

impl BrowserTransport {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for BrowserTransport {
    fn default() -> Self {
        Self::with_timeout(SYNC_TIMEOUT)
    }
}

impl SyncTransport for BrowserTransport {
    async fn post(&self, request: &EditRequest) -> Result<RawResponse, SyncFailure> {
        let http_request = Request::post(&api_url(&request.endpoint))
            .header(CSRF_HEADER, request.csrf_token.as_str())
            .header("Content-Type", request.body.content_type())
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .body(request.body.as_str())
            .map_err(|e| SyncFailure::Network(format!("Failed to build request: {}", e)))?;

        let millis = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
        let exchange = async move {
            let response = http_request
                .send()
                .await
                .map_err(|e| SyncFailure::Network(format!("Failed to send request: {}", e)))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| SyncFailure::Network(format!("Failed to read response: {}", e)))?;
            Ok::<_, SyncFailure>(RawResponse { status, body })
        };

        race_timeout(exchange, TimeoutFuture::new(millis), self.timeout).await
    }
}

/// Resolves to the exchange's result, or to `Network` if `timer` fires first
pub async fn race_timeout<F, T>(
    exchange: F,
    timer: T,
    timeout: Duration,
) -> Result<RawResponse, SyncFailure>
where
    F: Future<Output = Result<RawResponse, SyncFailure>>,
    T: Future<Output = ()>,
{
    match select(Box::pin(exchange), Box::pin(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(SyncFailure::Network(format!(
            "No response within {} s",
            timeout.as_secs()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::optimistic_edit::controller::tests::{ok, request};
    use crate::shared::optimistic_edit::controller::{EditController, EditError, EditableField};
    use contracts::domain::a001_memorial::edit::FieldId;
    use std::cell::RefCell;
    use std::future::{pending, ready};

    /// Never answers; the timer always wins
    struct SilentServer;

    impl SyncTransport for SilentServer {
        async fn post(&self, _request: &EditRequest) -> Result<RawResponse, SyncFailure> {
            race_timeout(pending(), ready(()), SYNC_TIMEOUT).await
        }
    }

    #[tokio::test]
    async fn timer_firing_first_is_a_network_failure() {
        let result = race_timeout(pending(), ready(()), SYNC_TIMEOUT).await;
        assert_eq!(
            result,
            Err(SyncFailure::Network("No response within 15 s".into()))
        );
    }

    #[tokio::test]
    async fn answer_before_timer_is_passed_through() {
        let answer = ready(ok(r#"{"status":"success"}"#));
        let result = race_timeout(answer, pending(), SYNC_TIMEOUT).await;
        assert_eq!(result.unwrap().status, 200);

        let refused = race_timeout(
            ready(Err(SyncFailure::Network("Failed to send request: refused".into()))),
            pending(),
            SYNC_TIMEOUT,
        )
        .await;
        assert!(matches!(refused, Err(SyncFailure::Network(_))));
    }

    #[tokio::test]
    async fn timed_out_edit_is_rolled_back() {
        let controller = EditController::new(SilentServer);
        let slot = RefCell::new(EditableField::new(FieldId::Quote, "old".to_string()));

        let err = controller
            .submit(&slot, "typed".to_string(), request(), |_, typed| typed)
            .await
            .unwrap_err();

        assert!(matches!(err, EditError::Sync(SyncFailure::Network(_))));
        let field = slot.borrow();
        assert_eq!(field.display(), "old");
        assert_eq!(field.committed(), "old");
        assert!(!field.is_pending());
    }
}

use super::{Transport, TransportError, TransportRequest, TransportResponse};
use async_trait::async_trait;
use http::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted transport for tests.
///
/// Replies are served in the order they were queued; once the queue is empty
/// the `always` reply (if any) is repeated. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    fallback: Option<TransportResponse>,
    delay: Option<Duration>,
    exchange_count: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        self.push(Ok(TransportResponse::new(status, body)));
        self
    }

    pub fn with_error(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn always(mut self, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        self.fallback = Some(TransportResponse::new(status, body));
        self
    }

    /// Hold every exchange open for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn exchange_count(&self) -> usize {
        self.exchange_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests().pop()
    }

    fn push(&self, reply: Result<TransportResponse, TransportError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    fn next_reply(&self) -> Result<TransportResponse, TransportError> {
        let queued = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match (queued, &self.fallback) {
            (Some(reply), _) => reply,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(TransportError::Unavailable(
                "no scripted reply left".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.exchange_count.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "[MOCK] exchange"
        );

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.next_reply()
    }
}

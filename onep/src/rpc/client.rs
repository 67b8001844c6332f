use super::auth::AuthCredential;
use super::envelope::CallEnvelope;
use super::response::{CallResult, Response};
use super::{RpcError, RPC_PATH};
use http::Method;
use onep_core::transport::{Transport, TransportRequest};
use serde_json::Value;
use std::sync::Arc;

/// Dispatcher for the RPC endpoint.
///
/// Holds no per-call state: clones share the transport and any number of
/// dispatches may run at once. Each dispatch is exactly one exchange and is
/// never retried.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    user_agent: String,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            transport,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RPC_PATH),
            user_agent: format!("onep-rs {}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send every call in `envelope` in one request.
    ///
    /// An empty or short result list is not an error; check each result's
    /// status before using its body.
    pub async fn dispatch(&self, envelope: &CallEnvelope) -> Result<Response, RpcError> {
        let body = serde_json::to_vec(envelope).map_err(RpcError::Encode)?;

        let request = TransportRequest::new(Method::POST, self.endpoint.as_str())
            .header("Content-Type", "application/json; charset=utf-8")?
            .header("User-Agent", &self.user_agent)?
            .body(body);

        let response = self.transport.exchange(request).await?;

        let results: Vec<CallResult> = match serde_json::from_slice(&response.body) {
            Ok(results) => results,
            Err(e) => {
                let body = response.text();
                if !response.status.is_success() {
                    return Err(RpcError::UnexpectedStatus {
                        status: response.status,
                        body,
                    });
                }
                tracing::warn!(error = %e, body = %body, "Failed to decode RPC response");
                return Err(RpcError::Decode {
                    message: e.to_string(),
                    body,
                });
            }
        };

        tracing::debug!(
            calls = envelope.len(),
            results = results.len(),
            "RPC dispatch completed"
        );

        Ok(Response::correlate(envelope, results))
    }

    pub async fn call(
        &self,
        auth: impl Into<AuthCredential>,
        procedure: &str,
        arguments: Vec<Value>,
    ) -> Result<Response, RpcError> {
        self.dispatch(&CallEnvelope::single(auth, procedure, arguments))
            .await
    }

    pub async fn call_multi<I, P>(
        &self,
        auth: impl Into<AuthCredential>,
        calls: I,
    ) -> Result<Response, RpcError>
    where
        I: IntoIterator<Item = (P, Vec<Value>)>,
        P: Into<String>,
    {
        self.dispatch(&CallEnvelope::batch(auth, calls)).await
    }
}

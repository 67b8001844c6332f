use super::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::Client;

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Request(err)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(method = %method, url = %url, body_len = body.len(), "Sending request");

        let mut builder = self.client.request(method, url.as_str()).headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        tracing::debug!(status = %status, body_len = body.len(), "Received response");

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

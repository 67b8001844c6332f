use super::ProvisionError;
use http::{Method, StatusCode};
use onep_core::transport::{Transport, TransportRequest};
use serde::Serialize;
use std::sync::Arc;

pub(crate) const DEFAULT_ACCEPT: &str = "text/plain, text/csv, application/x-www-form-urlencoded";
pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Which header carries the management key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyHeader {
    #[default]
    Token,
    Cik,
}

impl KeyHeader {
    pub fn header_name(&self) -> &'static str {
        match self {
            KeyHeader::Token => "X-Exosite-Token",
            KeyHeader::Cik => "X-Exosite-CIK",
        }
    }
}

/// Raw outcome of a provisioning call. Status interpretation is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ProvisionResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub(crate) enum Body {
    Empty,
    Form(String),
    Raw { content_type: String, data: Vec<u8> },
}

impl Body {
    pub(crate) fn form<T: Serialize + ?Sized>(fields: &T) -> Result<Self, ProvisionError> {
        Ok(Body::Form(serde_urlencoded::to_string(fields)?))
    }
}

/// Sender for provisioning endpoints under `<base>/provision`.
#[derive(Clone)]
pub struct ProvisionClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    manage_by: KeyHeader,
}

impl ProvisionClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            manage_by: KeyHeader::default(),
        }
    }

    /// Send management keys as `X-Exosite-CIK` instead of `X-Exosite-Token`.
    pub fn manage_by_cik(mut self) -> Self {
        self.manage_by = KeyHeader::Cik;
        self
    }

    pub fn key_header(&self) -> KeyHeader {
        self.manage_by
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        key: &str,
        key_header: KeyHeader,
        body: Body,
        accept: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let mut url = format!("{}{}", self.base_url, path);
        let mut request_body = Vec::new();
        let mut content_type = None;

        match body {
            Body::Empty => {}
            Body::Form(form) if method == Method::GET => {
                if !form.is_empty() {
                    url.push('?');
                    url.push_str(&form);
                }
            }
            Body::Form(form) => {
                content_type = Some(FORM_CONTENT_TYPE.to_string());
                request_body = form.into_bytes();
            }
            Body::Raw { content_type: ct, data } => {
                content_type = Some(ct);
                request_body = data;
            }
        }

        let mut request = TransportRequest::new(method.clone(), url).header("Accept", accept)?;
        if !key.is_empty() {
            request = request.header(key_header.header_name(), key)?;
        }
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", &content_type)?;
        }
        let request = request.body(request_body);

        tracing::debug!(method = %method, path = %path, "Sending provisioning request");

        let response = self.transport.exchange(request).await?;

        tracing::debug!(
            method = %method,
            path = %path,
            status = %response.status,
            "Provisioning request completed"
        );

        Ok(ProvisionResponse {
            status: response.status,
            body: response.text(),
        })
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

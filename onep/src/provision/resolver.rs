use super::cache::{CacheKey, ModelCache};
use super::client::{segment, Body, KeyHeader, ProvisionClient, DEFAULT_ACCEPT};
use super::model::ProvisioningModel;
use super::{ProvisionError, NOT_FOUND_LINE, PRECONDITION_FAILED_LINE, PROVISION_MANAGE_MODEL};
use chrono::Utc;
use http::{Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Resolves model registrations for one vendor scope.
///
/// Sessions for different vendors may share a [`ModelCache`]; their entries
/// never collide because the vendor token is part of the key.
#[derive(Clone)]
pub struct ProvisioningSession {
    client: ProvisionClient,
    vendor_token: Secret<String>,
    cache: ModelCache,
    ttl: Option<Duration>,
}

impl ProvisioningSession {
    pub fn new(client: ProvisionClient, vendor_token: Secret<String>) -> Self {
        Self {
            client,
            vendor_token,
            cache: ModelCache::new(),
            ttl: None,
        }
    }

    pub fn with_cache(mut self, cache: ModelCache) -> Self {
        self.cache = cache;
        self
    }

    /// Refetch cached models older than `ttl`. Stale entries are overwritten,
    /// not removed.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// A session for another vendor that shares this session's client and cache.
    pub fn for_vendor(&self, vendor_token: Secret<String>) -> Self {
        Self {
            client: self.client.clone(),
            vendor_token,
            cache: self.cache.clone(),
            ttl: self.ttl,
        }
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    pub fn client(&self) -> &ProvisionClient {
        &self.client
    }

    pub fn cache_key(&self, id: &str) -> CacheKey {
        CacheKey::new(id, self.vendor_token.expose_secret().as_str())
    }

    /// Look up the registration of `id` under `model_name`.
    ///
    /// A cached model is returned without any network access. Otherwise the
    /// model is read once from the provisioning API, parsed, stamped with
    /// `id` as its serial number and cached. Concurrent misses for the same
    /// id may each fetch; the last write wins.
    pub async fn resolve(
        &self,
        model_name: &str,
        id: &str,
    ) -> Result<ProvisioningModel, ProvisionError> {
        if id.is_empty() {
            return Err(ProvisionError::EmptyIdentifier);
        }

        let key = self.cache_key(id);
        if let Some(model) = self.cache.get(&key) {
            if self.is_fresh(&model) {
                return Ok(model);
            }
            tracing::debug!(model = %model_name, id = %id, "Cached model expired, refetching");
        } else {
            tracing::debug!(model = %model_name, id = %id, "Model not in cache, fetching");
        }

        let path = format!(
            "{}{}/{}",
            PROVISION_MANAGE_MODEL,
            segment(model_name),
            segment(id)
        );
        let response = self
            .client
            .send(
                Method::GET,
                &path,
                self.vendor_token.expose_secret(),
                KeyHeader::Token,
                Body::Empty,
                DEFAULT_ACCEPT,
            )
            .await?;

        match response.status {
            StatusCode::NOT_FOUND => {
                tracing::info!(model = %model_name, id = %id, "Model not found");
                return Err(ProvisionError::NotFound {
                    id: id.to_string(),
                    line: format!("HTTP/1.1 {}", response.status),
                });
            }
            StatusCode::PRECONDITION_FAILED => {
                tracing::info!(model = %model_name, id = %id, "Model precondition failed");
                return Err(ProvisionError::PreconditionFailed {
                    id: id.to_string(),
                    line: format!("HTTP/1.1 {}", response.status),
                });
            }
            status if !status.is_success() => {
                tracing::warn!(status = %status, model = %model_name, id = %id, "Unexpected provisioning status");
                return Err(ProvisionError::UnexpectedStatus {
                    status,
                    body: response.body,
                });
            }
            _ => {}
        }

        let raw = response.body.trim_matches(|c| c == '\r' || c == '\n');
        match raw {
            NOT_FOUND_LINE => {
                tracing::info!(model = %model_name, id = %id, "Model not found");
                return Err(ProvisionError::NotFound {
                    id: id.to_string(),
                    line: raw.to_string(),
                });
            }
            PRECONDITION_FAILED_LINE => {
                tracing::info!(model = %model_name, id = %id, "Model precondition failed");
                return Err(ProvisionError::PreconditionFailed {
                    id: id.to_string(),
                    line: raw.to_string(),
                });
            }
            _ => {}
        }

        let mut model = ProvisioningModel::parse(raw);
        model.serial_number = id.to_string();
        model.resolved_at = Some(Utc::now());

        self.cache.put(key, model.clone());

        Ok(model)
    }

    fn is_fresh(&self, model: &ProvisioningModel) -> bool {
        match (self.ttl, model.resolved_at) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ttl), Some(resolved_at)) => (Utc::now() - resolved_at)
                .to_std()
                .map(|age| age < ttl)
                .unwrap_or(true),
        }
    }
}

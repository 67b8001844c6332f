//! Client for the One Platform: batched procedure calls over
//! `/onep:v1/rpc/process` and the `/provision` API with its model cache.

pub mod config;
pub mod models;
pub mod provision;
pub mod rpc;

use config::OnepConfig;
use onep_core::transport::{ReqwestTransport, Transport, TransportError};
use provision::{ProvisionClient, ProvisioningSession};
use rpc::RpcClient;
use std::sync::Arc;

/// RPC and provisioning clients sharing one transport.
#[derive(Clone)]
pub struct Onep {
    pub rpc: RpcClient,
    pub provision: ProvisioningSession,
}

impl Onep {
    pub fn build(config: &OnepConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &OnepConfig) -> Self {
        let base_url = config.server.base_url();

        let rpc = RpcClient::new(transport.clone(), &base_url)
            .with_user_agent(config.http.user_agent.clone());
        let provision = ProvisioningSession::new(
            ProvisionClient::new(transport, &base_url),
            config.vendor.token.clone(),
        )
        .with_ttl(config.cache.ttl());

        tracing::info!(
            base_url = %base_url,
            cache_ttl_secs = ?config.cache.ttl_secs,
            "OneP client initialized"
        );

        Self { rpc, provision }
    }
}

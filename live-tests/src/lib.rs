//! Live integration tests for the OneP client.
//!
//! These tests talk to a real platform account and change its resources.
//! They only run when `ONEP_TEST_CIK` is set:
//!
//! ```bash
//! ONEP_TEST_CIK=<client key> cargo test -p live-tests
//! ```
//!
//! `ONEP_TEST_HOST` overrides the platform host.

use anyhow::{anyhow, Result};
use onep::config::OnepConfig;
use onep::Onep;
use onep_core::config::LoggingConfig;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
///
/// Uses the client's own subscriber setup so `ONEP__LOGGING__*` applies;
/// falls back to a plain test writer if that cannot be installed.
pub fn init_tracing(logging: &LoggingConfig) {
    INIT.call_once(|| {
        let installed = onep_core::observability::init_tracing(
            "onep-live-tests",
            &logging.level,
            logging.otlp_endpoint.as_deref(),
        );
        if let Err(e) = installed {
            eprintln!("Falling back to test writer: {}", e);
            tracing_subscriber::fmt()
                .with_env_filter("info,onep=debug,live_tests=debug")
                .with_test_writer()
                .try_init()
                .ok();
        }
    });
}

/// Account settings from environment variables.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub cik: String,
    pub host: Option<String>,
}

impl LiveConfig {
    /// `None` when no test account is configured.
    pub fn from_env() -> Option<Self> {
        let cik = std::env::var("ONEP_TEST_CIK").ok().filter(|cik| !cik.is_empty())?;
        Some(Self {
            cik,
            host: std::env::var("ONEP_TEST_HOST").ok(),
        })
    }
}

/// Client plus credentials for one live test.
pub struct LiveContext {
    pub cik: String,
    pub onep: Onep,
}

impl LiveContext {
    pub fn new() -> Result<Self> {
        let live = LiveConfig::from_env().ok_or_else(|| anyhow!("ONEP_TEST_CIK is not set"))?;

        let mut config = OnepConfig::load().map_err(|e| anyhow!("Failed to load config: {}", e))?;
        init_tracing(&config.logging);

        if let Some(host) = live.host {
            config.server.host = host;
        }

        let onep = Onep::build(&config).map_err(|e| anyhow!("Failed to build client: {}", e))?;

        Ok(Self {
            cik: live.cik,
            onep,
        })
    }
}

pub fn should_skip() -> bool {
    LiveConfig::from_env().is_none()
}

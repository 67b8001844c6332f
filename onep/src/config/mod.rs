use onep_core::config::{self as core_config, HttpConfig, LoggingConfig};
use onep_core::error::CoreError;
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "m2.exosite.com";
pub const DEV_HOST: &str = "m2-dev.exosite.com";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OnepConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_dev_host")]
    pub dev_host: String,
    /// Route every call to `dev_host` instead of `host`.
    #[serde(default)]
    pub use_dev: bool,
    #[serde(default = "default_secure")]
    pub secure: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_dev_host() -> String {
    DEV_HOST.to_string()
}

fn default_secure() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            dev_host: default_dev_host(),
            use_dev: false,
            secure: default_secure(),
        }
    }
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let host = if self.use_dev {
            &self.dev_host
        } else {
            &self.host
        };
        format!("{}://{}", scheme, host)
    }
}

/// Provisioning vendor credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "empty_secret")]
    pub token: Secret<String>,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            token: empty_secret(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheConfig {
    /// Age after which a cached provisioning model is fetched again.
    /// Unset means entries are trusted forever.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl OnepConfig {
    /// Load from `.env`, an optional `onep.{toml,yaml,json}` and `ONEP__*` variables.
    pub fn load() -> Result<Self, CoreError> {
        core_config::load("onep", "ONEP")
    }
}

use thiserror::Error;

/// Errors raised while bootstrapping a client: configuration and telemetry.
///
/// Per-call failures live with the component that produces them
/// (`TransportError`, and the RPC / provisioning error types in `onep`).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Telemetry error: {0}")]
    TelemetryError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: CoreError = config::ConfigError::NotFound("server.host".to_string()).into();
        match err {
            CoreError::ConfigError(e) => assert!(e.to_string().contains("server.host")),
            _ => panic!("Expected ConfigError"),
        }
    }
}

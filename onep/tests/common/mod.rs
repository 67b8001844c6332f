use onep::config::{OnepConfig, ServerConfig, VendorConfig};
use onep::Onep;
use secrecy::Secret;
use std::sync::Once;
use wiremock::MockServer;

pub const TEST_CIK: &str = "0123456789abcdef0123456789abcdef01234567";
pub const TEST_VENDOR_TOKEN: &str = "vendor-token-1";
pub const TEST_MODEL: &str = "meter-v1";
pub const TEST_RID: &str = "abcdeabcdeabcdeabcdeabcdeabcdeabcdeabcde";

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "onep=debug,onep_core=debug".into()),
            )
            .with_test_writer()
            .init();
    });
}

/// A client pointed at a local mock platform.
pub struct TestPlatform {
    pub server: MockServer,
    pub onep: Onep,
}

impl TestPlatform {
    pub async fn spawn() -> Self {
        init_tracing();

        let server = MockServer::start().await;
        let config = OnepConfig {
            server: ServerConfig {
                host: server.address().to_string(),
                secure: false,
                ..Default::default()
            },
            vendor: VendorConfig {
                token: Secret::new(TEST_VENDOR_TOKEN.to_string()),
            },
            ..Default::default()
        };

        let onep = Onep::build(&config).expect("Failed to build client");

        TestPlatform { server, onep }
    }

    /// Number of requests the mock platform has seen.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

pub fn model_record(status: &str, extra: &str) -> String {
    format!("{},{},{}\r\n", status, TEST_RID, extra)
}

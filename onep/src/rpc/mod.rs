//! Batched procedure-call protocol.
//!
//! Calls are wrapped in a [`CallEnvelope`], sent in one exchange by
//! [`RpcClient::dispatch`], and answered with a [`Response`] whose results
//! are matched back to their calls by id.

mod auth;
mod client;
mod envelope;
mod procedures;
mod response;

use http::StatusCode;
use onep_core::transport::TransportError;
use thiserror::Error;

pub use auth::{Auth, AuthCredential, CredentialKind, Qualifier};
pub use client::RpcClient;
pub use envelope::{CallEnvelope, CallRequest};
pub use procedures::{DataPoint, ReadOptions, ResourceRef};
pub use response::{CallError, CallResult, CallStatus, Response};

pub const RPC_PATH: &str = "/onep:v1/rpc/process";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String, body: String },

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("No result for call {id}")]
    MissingResult { id: u64 },

    #[error("Call {id} returned status '{status}'{}", describe_call_error(.error))]
    Call {
        id: u64,
        status: CallStatus,
        error: Option<CallError>,
    },

    #[error("Unexpected result for '{procedure}': expected {expected}, got {actual}")]
    UnexpectedShape {
        procedure: String,
        expected: &'static str,
        actual: String,
    },
}

fn describe_call_error(error: &Option<CallError>) -> String {
    match error {
        Some(e) => format!(": {} ({})", e.message, e.code),
        None => String::new(),
    }
}

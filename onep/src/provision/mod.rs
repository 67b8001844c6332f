//! Provisioning API: model resolution with a shared cache, plus the
//! vendor management calls.

mod cache;
mod client;
mod manage;
mod model;
mod resolver;

use http::StatusCode;
use onep_core::transport::TransportError;
use thiserror::Error;

pub use cache::{CacheKey, ModelCache};
pub use client::{KeyHeader, ProvisionClient, ProvisionResponse};
pub use manage::{ModelOptions, ModelSource};
pub use model::ProvisioningModel;
pub use resolver::ProvisioningSession;

pub const PROVISION_BASE: &str = "/provision";
pub const PROVISION_ACTIVATE: &str = "/provision/activate";
pub const PROVISION_DOWNLOAD: &str = "/provision/download";
pub const PROVISION_MANAGE_MODEL: &str = "/provision/manage/model/";
pub const PROVISION_MANAGE_CONTENT: &str = "/provision/manage/content/";
pub const PROVISION_REGISTER: &str = "/provision/register";

/// Length of a well-formed resource identifier.
pub const RID_LENGTH: usize = 40;

pub const NOT_FOUND_LINE: &str = "HTTP/1.1 404 Not Found";
pub const PRECONDITION_FAILED_LINE: &str = "HTTP/1.1 412 Precondition Failed";

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Identifier must not be empty")]
    EmptyIdentifier,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Model not found for id '{id}': {line}")]
    NotFound { id: String, line: String },

    #[error("Precondition failed for id '{id}': {line}")]
    PreconditionFailed { id: String, line: String },

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Resource identifier has length {rid_len}, expected 40")]
    Validation { rid_len: usize },

    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to encode form: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

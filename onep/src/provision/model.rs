use super::{ProvisionError, RID_LENGTH};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One model registration as returned by a provisioning model read.
///
/// The wire record is a single line `<status>,<rid>,<extra>`. Parsing never
/// fails: a malformed record yields a model that fails [`is_valid`].
///
/// [`is_valid`]: ProvisioningModel::is_valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningModel {
    pub raw: String,
    pub active_status: String,
    pub rid: String,
    pub serial_number: String,
    pub extra_field: String,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ProvisioningModel {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let mut model = Self {
            raw: raw.to_string(),
            ..Default::default()
        };

        let mut fields = raw.splitn(3, ',');
        if let (Some(status), Some(rid), Some(extra)) = (fields.next(), fields.next(), fields.next()) {
            model.active_status = status.to_string();
            model.rid = rid.to_string();
            model.extra_field = extra.trim_matches('"').to_string();
        }

        model
    }

    /// True when the resource identifier has the expected length.
    pub fn is_valid(&self) -> bool {
        self.rid.chars().count() == RID_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn ensure_valid(&self) -> Result<(), ProvisionError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProvisionError::Validation {
                rid_len: self.rid.chars().count(),
            })
        }
    }

    /// Decode the extra field as a JSON document.
    pub fn decode_extra<T: DeserializeOwned>(&self) -> Result<T, ProvisionError> {
        Ok(serde_json::from_str(&self.extra_field)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }
}

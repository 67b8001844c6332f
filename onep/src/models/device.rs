use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Document returned by the `info` procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub basic: Basic,
    #[serde(deserialize_with = "null_as_default")]
    pub counts: ResourceCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub description: Description,
    #[serde(deserialize_with = "null_as_default")]
    pub usage: ResourceCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub comments: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub subscribers: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basic {
    #[serde(deserialize_with = "null_as_default")]
    pub modified: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subscribers: i64,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub resource_type: String,
}

/// Per-type resource counts, used for both `counts` and `usage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub client: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub dataport: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub datarule: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub disk: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub dispatch: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub email: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub http: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub share: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sms: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub xmpp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    /// Limits mix numbers and strings such as `"inherit"`.
    #[serde(deserialize_with = "null_as_default")]
    pub limits: BTreeMap<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub locked: bool,
    /// Encoded [`DeviceMeta`] document.
    #[serde(deserialize_with = "null_as_default")]
    pub meta: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub public: bool,
}

/// Deployment metadata carried in `description.meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceMeta {
    #[serde(rename = "deviceType")]
    #[serde(deserialize_with = "null_as_default")]
    pub device_type: String,
    #[serde(rename = "deviceTypeID")]
    #[serde(deserialize_with = "null_as_default")]
    pub device_type_id: String,
    #[serde(rename = "deviceTypeName")]
    #[serde(deserialize_with = "null_as_default")]
    pub device_type_name: String,
    #[serde(rename = "Location")]
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(rename = "Timezone")]
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub activetime: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device: PhysicalDevice,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalDevice {
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sn: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub device_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vendor: String,
}

/// The platform sends `null` for unset fields; read it as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeviceInfo {
    /// A device is usable once it carries metadata.
    pub fn is_valid(&self) -> bool {
        !self.description.meta.is_empty()
    }

    pub fn meta(&self) -> Result<DeviceMeta, serde_json::Error> {
        serde_json::from_str(&self.description.meta).map_err(|e| {
            tracing::warn!(device = %self.description.name, error = %e, "Failed to decode device meta");
            e
        })
    }

    pub fn set_meta(&mut self, meta: &DeviceMeta) -> Result<&mut Self, serde_json::Error> {
        self.description.meta = serde_json::to_string(meta)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_info_document() {
        let info: DeviceInfo = serde_json::from_value(json!({
            "basic": {"modified": 1400000000, "status": "activated", "subscribers": 0, "type": "client"},
            "counts": {"dataport": 3, "datarule": 1},
            "description": {
                "limits": {"client": 0, "dataport": "inherit"},
                "locked": false,
                "meta": "{\"deviceType\":\"meter\",\"Location\":\"Taipei\",\"device\":{\"sn\":\"sn-1\",\"type\":\"vendor\"}}",
                "name": "Meter 1",
                "public": false
            },
            "tags": ["a"]
        }))
        .unwrap();

        assert_eq!(info.basic.resource_type, "client");
        assert_eq!(info.counts.dataport, 3);
        assert_eq!(info.usage, ResourceCounts::default());
        assert_eq!(info.description.limits["dataport"], json!("inherit"));
        assert!(info.is_valid());

        let meta = info.meta().unwrap();
        assert_eq!(meta.device_type, "meter");
        assert_eq!(meta.location, "Taipei");
        assert_eq!(meta.device.sn, "sn-1");
        assert_eq!(meta.device.device_type, "vendor");
        assert!(meta.timezone.is_empty());
    }

    #[test]
    fn test_set_meta_round_trips() {
        let mut info = DeviceInfo::default();
        assert!(!info.is_valid());

        let meta = DeviceMeta {
            timezone: "Asia/Taipei".to_string(),
            extra_field: "{\"A\":20}".to_string(),
            ..Default::default()
        };
        info.set_meta(&meta).unwrap();

        assert!(info.is_valid());
        assert!(info.description.meta.contains("\"Timezone\":\"Asia/Taipei\""));
        assert_eq!(info.meta().unwrap(), meta);
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let info: DeviceInfo = serde_json::from_value(json!({
            "basic": {"status": null, "type": "client"},
            "counts": null,
            "description": {"meta": null, "name": "Meter 1", "limits": null, "public": null},
            "tags": null
        }))
        .unwrap();

        assert!(info.basic.status.is_empty());
        assert_eq!(info.counts, ResourceCounts::default());
        assert!(info.description.meta.is_empty());
        assert!(info.description.limits.is_empty());
        assert!(!info.description.public);
        assert!(info.tags.is_empty());
        assert!(!info.is_valid());

        let meta: DeviceMeta =
            serde_json::from_str(r#"{"deviceType":null,"device":{"sn":null,"vendor":"acme"}}"#)
                .unwrap();
        assert!(meta.device_type.is_empty());
        assert_eq!(meta.device.vendor, "acme");
    }

    #[test]
    fn test_bad_meta_is_an_error() {
        let mut info = DeviceInfo::default();
        info.description.meta = "not json".to_string();

        assert!(info.is_valid());
        assert!(info.meta().is_err());
    }
}

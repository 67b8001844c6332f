//! Typed wrappers for the platform's procedures.
//!
//! Each helper sends one call, fails with [`RpcError::Call`] on a non-ok
//! status, and narrows the body to the shape that procedure returns.

use super::auth::AuthCredential;
use super::client::RpcClient;
use super::RpcError;
use crate::models::DeviceInfo;
use serde::Serialize;
use serde_json::{json, Value};

/// A resource named either by rid or by alias (`{"alias": name}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Rid(String),
    Alias(String),
}

impl ResourceRef {
    /// The client the credential belongs to.
    pub fn own() -> Self {
        ResourceRef::Alias(String::new())
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResourceRef::Rid(rid) => Value::String(rid.clone()),
            ResourceRef::Alias(alias) => json!({ "alias": alias }),
        }
    }
}

impl From<&str> for ResourceRef {
    fn from(rid: &str) -> Self {
        ResourceRef::Rid(rid.to_string())
    }
}

impl From<String> for ResourceRef {
    fn from(rid: String) -> Self {
        ResourceRef::Rid(rid)
    }
}

/// One `[timestamp, value]` sample of a dataport.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: Value,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: impl Into<Value>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!([self.timestamp, self.value])
    }

    fn from_value(procedure: &str, value: &Value) -> Result<Self, RpcError> {
        match value.as_array().map(Vec::as_slice) {
            Some([timestamp, value]) => {
                let timestamp = timestamp
                    .as_i64()
                    .ok_or_else(|| unexpected(procedure, "integer timestamp", timestamp))?;
                Ok(Self {
                    timestamp,
                    value: value.clone(),
                })
            }
            _ => Err(unexpected(procedure, "[timestamp, value] pair", value)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starttime: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endtime: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `"asc"` or `"desc"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// `"all"`, `"autowindow"` or `"givenwindow"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

impl ReadOptions {
    pub fn latest() -> Self {
        Self {
            limit: Some(1),
            sort: Some("desc".to_string()),
            ..Default::default()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unexpected(procedure: &str, expected: &'static str, actual: &Value) -> RpcError {
    RpcError::UnexpectedShape {
        procedure: procedure.to_string(),
        expected,
        actual: kind_of(actual).to_string(),
    }
}

fn expect_string(procedure: &str, value: Value) -> Result<String, RpcError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(unexpected(procedure, "string", &other)),
    }
}

impl RpcClient {
    async fn call_one(
        &self,
        auth: impl Into<AuthCredential>,
        procedure: &str,
        arguments: Vec<Value>,
    ) -> Result<Value, RpcError> {
        self.call(auth, procedure, arguments)
            .await?
            .take(1)?
            .into_body()
    }

    pub async fn activate(
        &self,
        auth: impl Into<AuthCredential>,
        codetype: &str,
        code: &str,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "activate", vec![json!(codetype), json!(code)])
            .await
            .map(|_| ())
    }

    /// Create a resource of `resource_type` from `description`; returns its rid.
    pub async fn create(
        &self,
        auth: impl Into<AuthCredential>,
        resource_type: &str,
        description: Value,
    ) -> Result<String, RpcError> {
        let body = self
            .call_one(auth, "create", vec![json!(resource_type), description])
            .await?;
        expect_string("create", body)
    }

    pub async fn deactivate(
        &self,
        auth: impl Into<AuthCredential>,
        codetype: &str,
        code: &str,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "deactivate", vec![json!(codetype), json!(code)])
            .await
            .map(|_| ())
    }

    pub async fn drop(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "drop", vec![resource.to_value()])
            .await
            .map(|_| ())
    }

    pub async fn flush(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "flush", vec![resource.to_value()])
            .await
            .map(|_| ())
    }

    pub async fn info(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        options: Value,
    ) -> Result<DeviceInfo, RpcError> {
        let body = self
            .call_one(auth, "info", vec![resource.to_value(), options])
            .await?;
        serde_json::from_value(body.clone()).map_err(|e| RpcError::Decode {
            message: format!("info: {}", e),
            body: body.to_string(),
        })
    }

    pub async fn listing(
        &self,
        auth: impl Into<AuthCredential>,
        types: &[&str],
    ) -> Result<Value, RpcError> {
        self.call_one(auth, "listing", vec![json!(types)]).await
    }

    /// Resolve an alias (or other `lookup_type`) to a rid.
    pub async fn lookup(
        &self,
        auth: impl Into<AuthCredential>,
        lookup_type: &str,
        alias: &str,
    ) -> Result<String, RpcError> {
        let body = self
            .call_one(auth, "lookup", vec![json!(lookup_type), json!(alias)])
            .await?;
        expect_string("lookup", body)
    }

    /// `map` procedure: bind `alias` to `rid`.
    pub async fn map_alias(
        &self,
        auth: impl Into<AuthCredential>,
        rid: &str,
        alias: &str,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "map", vec![json!("alias"), json!(rid), json!(alias)])
            .await
            .map(|_| ())
    }

    pub async fn read(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        options: &ReadOptions,
    ) -> Result<Vec<DataPoint>, RpcError> {
        let options = serde_json::to_value(options).map_err(RpcError::Encode)?;
        let body = self
            .call_one(auth, "read", vec![resource.to_value(), options])
            .await?;
        match &body {
            Value::Array(points) => points
                .iter()
                .map(|point| DataPoint::from_value("read", point))
                .collect(),
            other => Err(unexpected("read", "array", other)),
        }
    }

    pub async fn record(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        entries: &[DataPoint],
        options: Value,
    ) -> Result<(), RpcError> {
        let entries: Vec<Value> = entries.iter().map(DataPoint::to_value).collect();
        self.call_one(
            auth,
            "record",
            vec![resource.to_value(), Value::Array(entries), options],
        )
        .await
        .map(|_| ())
    }

    pub async fn recordbatch(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        entries: &[DataPoint],
    ) -> Result<Value, RpcError> {
        let entries: Vec<Value> = entries.iter().map(DataPoint::to_value).collect();
        self.call_one(
            auth,
            "recordbatch",
            vec![resource.to_value(), Value::Array(entries)],
        )
        .await
    }

    pub async fn revoke(
        &self,
        auth: impl Into<AuthCredential>,
        codetype: &str,
        code: &str,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "revoke", vec![json!(codetype), json!(code)])
            .await
            .map(|_| ())
    }

    /// Share a resource; returns the share code.
    pub async fn share(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        options: Value,
    ) -> Result<String, RpcError> {
        let body = self
            .call_one(auth, "share", vec![resource.to_value(), options])
            .await?;
        expect_string("share", body)
    }

    /// `unmap` procedure: release `alias`.
    pub async fn unmap_alias(
        &self,
        auth: impl Into<AuthCredential>,
        alias: &str,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "unmap", vec![json!("alias"), json!(alias)])
            .await
            .map(|_| ())
    }

    pub async fn update(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        description: Value,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "update", vec![resource.to_value(), description])
            .await
            .map(|_| ())
    }

    pub async fn usage(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        metric: &str,
        starttime: i64,
        endtime: i64,
    ) -> Result<Value, RpcError> {
        self.call_one(
            auth,
            "usage",
            vec![
                resource.to_value(),
                json!(metric),
                json!(starttime),
                json!(endtime),
            ],
        )
        .await
    }

    pub async fn wait(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
    ) -> Result<Value, RpcError> {
        self.call_one(auth, "wait", vec![resource.to_value()]).await
    }

    pub async fn write(
        &self,
        auth: impl Into<AuthCredential>,
        resource: &ResourceRef,
        value: impl Into<Value>,
    ) -> Result<(), RpcError> {
        self.call_one(auth, "write", vec![resource.to_value(), value.into()])
            .await
            .map(|_| ())
    }

    /// Write several resources at the current time in one call.
    pub async fn writegroup(
        &self,
        auth: impl Into<AuthCredential>,
        entries: &[(ResourceRef, Value)],
    ) -> Result<(), RpcError> {
        let entries: Vec<Value> = entries
            .iter()
            .map(|(resource, value)| json!([resource.to_value(), value]))
            .collect();
        self.call_one(auth, "writegroup", vec![Value::Array(entries)])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use onep_core::transport::MockTransport;
    use std::sync::Arc;

    fn client(reply: &str) -> (RpcClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new().with_reply(StatusCode::OK, reply.to_string()));
        (
            RpcClient::new(transport.clone(), "https://m2.exosite.com"),
            transport,
        )
    }

    fn sent_call(transport: &MockTransport) -> Value {
        let request = transport.last_request().unwrap();
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        body["calls"][0].clone()
    }

    #[test]
    fn test_resource_ref_values() {
        assert_eq!(ResourceRef::from("abc").to_value(), json!("abc"));
        assert_eq!(
            ResourceRef::Alias("X1".to_string()).to_value(),
            json!({"alias": "X1"})
        );
        assert_eq!(ResourceRef::own().to_value(), json!({"alias": ""}));
    }

    #[tokio::test]
    async fn test_lookup_narrows_to_rid() {
        let rid = "a".repeat(40);
        let (rpc, transport) = client(&format!(r#"[{{"id":1,"status":"ok","result":"{}"}}]"#, rid));

        let found = rpc.lookup("cik", "alias", "X1").await.unwrap();

        assert_eq!(found, rid);
        assert_eq!(
            sent_call(&transport),
            json!({"id": 1, "procedure": "lookup", "arguments": ["alias", "X1"]})
        );
    }

    #[tokio::test]
    async fn test_lookup_invalid_status_is_call_error() {
        let (rpc, _) = client(r#"[{"id":1,"status":"invalid"}]"#);

        let err = rpc.lookup("cik", "alias", "missing").await.unwrap_err();
        match err {
            RpcError::Call { status, .. } => assert_eq!(status, crate::rpc::CallStatus::Invalid),
            other => panic!("Expected Call error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_string_body() {
        let (rpc, _) = client(r#"[{"id":1,"status":"ok","result":{"unexpected":true}}]"#);

        let err = rpc
            .create("cik", "dataport", json!({"format": "integer"}))
            .await
            .unwrap_err();
        match err {
            RpcError::UnexpectedShape {
                procedure, actual, ..
            } => {
                assert_eq!(procedure, "create");
                assert_eq!(actual, "object");
            }
            other => panic!("Expected UnexpectedShape, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_decodes_data_points() {
        let (rpc, transport) = client(r#"[{"id":1,"status":"ok","result":[[1400000002,42],[1400000001,"text"]]}]"#);

        let points = rpc
            .read(
                "cik",
                &ResourceRef::Alias("X1".to_string()),
                &ReadOptions::latest(),
            )
            .await
            .unwrap();

        assert_eq!(
            points,
            vec![
                DataPoint::new(1400000002, 42),
                DataPoint::new(1400000001, "text"),
            ]
        );
        assert_eq!(
            sent_call(&transport)["arguments"],
            json!([{"alias": "X1"}, {"limit": 1, "sort": "desc"}])
        );
    }

    #[tokio::test]
    async fn test_map_and_writegroup_argument_shapes() {
        let (rpc, transport) = client(r#"[{"id":1,"status":"ok"}]"#);
        rpc.map_alias("cik", "rid-1", "X1").await.unwrap();
        assert_eq!(
            sent_call(&transport)["arguments"],
            json!(["alias", "rid-1", "X1"])
        );

        let (rpc, transport) = client(r#"[{"id":1,"status":"ok"}]"#);
        rpc.writegroup(
            "cik",
            &[
                (ResourceRef::from("rid-1"), json!(1)),
                (ResourceRef::Alias("X2".to_string()), json!("two")),
            ],
        )
        .await
        .unwrap();
        assert_eq!(
            sent_call(&transport)["arguments"],
            json!([[["rid-1", 1], [{"alias": "X2"}, "two"]]])
        );
    }

    #[tokio::test]
    async fn test_record_sends_timestamped_entries() {
        let (rpc, transport) = client(r#"[{"id":1,"status":"ok"}]"#);

        rpc.record(
            "cik",
            &ResourceRef::from("rid-1"),
            &[DataPoint::new(1400000000, 1), DataPoint::new(1400000060, 2)],
            json!({}),
        )
        .await
        .unwrap();

        assert_eq!(
            sent_call(&transport)["arguments"],
            json!(["rid-1", [[1400000000, 1], [1400000060, 2]], {}])
        );
    }
}

use super::envelope::CallEnvelope;
use super::RpcError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Per-call status tag reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CallStatus {
    Ok,
    Invalid,
    BadArg,
    Other(String),
}

impl From<String> for CallStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "ok" => CallStatus::Ok,
            "invalid" => CallStatus::Invalid,
            "badarg" => CallStatus::BadArg,
            _ => CallStatus::Other(status),
        }
    }
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Ok => "ok",
            CallStatus::Invalid => "invalid",
            CallStatus::BadArg => "badarg",
            CallStatus::Other(status) => status,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CallStatus::Ok)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub context: Option<Value>,
}

/// Outcome of one call, matched to its request by `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallResult {
    pub id: u64,
    pub status: CallStatus,
    #[serde(rename = "result", default)]
    result: Value,
    #[serde(default)]
    pub error: Option<CallError>,
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        self.status.is_ok() && self.error.is_none()
    }

    /// The result body, only when the call succeeded.
    pub fn body(&self) -> Option<&Value> {
        self.is_ok().then_some(&self.result)
    }

    /// Whatever the platform put under `result`, regardless of status.
    pub fn raw_body(&self) -> &Value {
        &self.result
    }

    /// Take the body, turning a failed status into [`RpcError::Call`].
    pub fn into_body(self) -> Result<Value, RpcError> {
        if self.is_ok() {
            Ok(self.result)
        } else {
            Err(RpcError::Call {
                id: self.id,
                status: self.status,
                error: self.error,
            })
        }
    }
}

/// Results of one dispatch, in the order the calls were made.
///
/// The platform may answer in any order; results are re-ordered by id to
/// match the envelope. Results carrying an id that no request used are kept
/// after the matched ones.
#[derive(Debug, Clone, Default)]
pub struct Response {
    results: Vec<CallResult>,
}

impl Response {
    pub(crate) fn correlate(envelope: &CallEnvelope, results: Vec<CallResult>) -> Self {
        let mut pending: Vec<Option<CallResult>> = results.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(pending.len());

        for call in envelope.calls() {
            let position = pending
                .iter()
                .position(|r| r.as_ref().is_some_and(|r| r.id == call.id));
            match position {
                Some(pos) => ordered.extend(pending[pos].take()),
                None => tracing::warn!(
                    id = call.id,
                    procedure = %call.procedure,
                    "No result returned for call"
                ),
            }
        }

        let unmatched: Vec<CallResult> = pending.into_iter().flatten().collect();
        if !unmatched.is_empty() {
            tracing::warn!(count = unmatched.len(), "Results with unknown call ids");
            ordered.extend(unmatched);
        }

        Self { results: ordered }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CallResult> {
        self.results.get(index)
    }

    pub fn first(&self) -> Option<&CallResult> {
        self.results.first()
    }

    pub fn by_id(&self, id: u64) -> Option<&CallResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallResult> {
        self.results.iter()
    }

    /// Consume the response and keep only the result for `id`.
    pub fn take(self, id: u64) -> Result<CallResult, RpcError> {
        self.results
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(RpcError::MissingResult { id })
    }

    pub fn into_results(self) -> Vec<CallResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: &str) -> Vec<CallResult> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_status_tags() {
        let results = decode(
            r#"[{"id":1,"status":"ok","result":5},
                {"id":2,"status":"invalid"},
                {"id":3,"status":"badarg"},
                {"id":4,"status":"restricted"}]"#,
        );

        assert_eq!(results[0].status, CallStatus::Ok);
        assert_eq!(results[1].status, CallStatus::Invalid);
        assert_eq!(results[2].status, CallStatus::BadArg);
        assert_eq!(results[3].status, CallStatus::Other("restricted".to_string()));
        assert_eq!(results[3].status.to_string(), "restricted");
    }

    #[test]
    fn test_failed_call_hides_body() {
        let results = decode(
            r#"[{"id":1,"status":"fail","result":"ignored","error":{"code":500,"message":"boom"}}]"#,
        );
        let result = results.into_iter().next().unwrap();

        assert!(result.body().is_none());
        assert_eq!(result.raw_body(), &json!("ignored"));
        match result.into_body() {
            Err(RpcError::Call { id, error, .. }) => {
                assert_eq!(id, 1);
                assert_eq!(error.unwrap().message, "boom");
            }
            other => panic!("Expected Call error, got {:?}", other),
        }
    }

    #[test]
    fn test_large_integers_preserved() {
        let results =
            decode(r#"[{"id":1,"status":"ok","result":[[1400000000,123456789012345678901234567890]]}]"#);

        let encoded = serde_json::to_string(results[0].raw_body()).unwrap();
        assert_eq!(encoded, "[[1400000000,123456789012345678901234567890]]");
    }

    #[test]
    fn test_correlate_reorders_by_id_and_keeps_strays() {
        let envelope = CallEnvelope::single("cik", "read", vec![]).push("write", vec![]);
        let results = decode(
            r#"[{"id":9,"status":"ok"},{"id":2,"status":"ok","result":"b"},{"id":1,"status":"ok","result":"a"}]"#,
        );

        let response = Response::correlate(&envelope, results);
        let ids: Vec<u64> = response.iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![1, 2, 9]);
        assert_eq!(response.by_id(2).unwrap().body(), Some(&json!("b")));
    }

    #[test]
    fn test_take_missing_id() {
        let response = Response::default();
        assert!(matches!(
            response.take(1),
            Err(RpcError::MissingResult { id: 1 })
        ));
    }
}

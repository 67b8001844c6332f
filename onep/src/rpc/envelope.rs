use super::auth::{Auth, AuthCredential};
use serde::Serialize;
use serde_json::Value;

/// One procedure invocation inside an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRequest {
    pub id: u64,
    pub procedure: String,
    pub arguments: Vec<Value>,
}

/// Wire body of one RPC exchange: `{"auth": ..., "calls": [...]}`.
///
/// Ids are assigned here, sequentially from 1 in caller order, so they are
/// unique within the envelope. Procedure names and argument shapes are not
/// checked.
#[derive(Debug, Clone, Serialize)]
pub struct CallEnvelope {
    auth: Auth,
    calls: Vec<CallRequest>,
}

impl CallEnvelope {
    pub fn new(auth: impl Into<AuthCredential>) -> Self {
        Self {
            auth: auth.into().normalize(),
            calls: Vec::new(),
        }
    }

    /// Envelope holding a single call with id 1.
    pub fn single(
        auth: impl Into<AuthCredential>,
        procedure: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self::new(auth).push(procedure, arguments)
    }

    pub fn batch<I, P>(auth: impl Into<AuthCredential>, calls: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<Value>)>,
        P: Into<String>,
    {
        calls
            .into_iter()
            .fold(Self::new(auth), |envelope, (procedure, arguments)| {
                envelope.push(procedure, arguments)
            })
    }

    /// Append a call, taking the next id.
    pub fn push(mut self, procedure: impl Into<String>, arguments: Vec<Value>) -> Self {
        let id = self.calls.len() as u64 + 1;
        self.calls.push(CallRequest {
            id,
            procedure: procedure.into(),
            arguments,
        });
        self
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn calls(&self) -> &[CallRequest] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Auth;
    use serde_json::json;

    #[test]
    fn test_single_call_has_id_one() {
        let envelope = CallEnvelope::single("cik-value", "read", vec![json!("rid"), json!({})]);

        assert_eq!(envelope.len(), 1);
        assert_eq!(envelope.calls()[0].id, 1);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "auth": {"cik": "cik-value"},
                "calls": [{"id": 1, "procedure": "read", "arguments": ["rid", {}]}]
            })
        );
    }

    #[test]
    fn test_batch_assigns_sequential_ids_in_caller_order() {
        let envelope = CallEnvelope::batch(
            Auth::token("tok"),
            vec![
                ("lookup", vec![json!("alias"), json!("X1")]),
                ("write", vec![json!({"alias": "X1"}), json!(7)]),
                ("read", vec![json!({"alias": "X1"}), json!({"limit": 1})]),
            ],
        );

        let ids: Vec<u64> = envelope.calls().iter().map(|c| c.id).collect();
        let procedures: Vec<&str> = envelope
            .calls()
            .iter()
            .map(|c| c.procedure.as_str())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(procedures, vec!["lookup", "write", "read"]);
        assert_eq!(
            serde_json::to_value(envelope.auth()).unwrap(),
            json!({"token": "tok"})
        );
    }

    #[test]
    fn test_empty_batch() {
        let envelope = CallEnvelope::batch("cik", Vec::<(&str, Vec<Value>)>::new());
        assert!(envelope.is_empty());
    }
}

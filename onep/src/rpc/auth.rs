use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Which credential field the platform should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CredentialKind {
    /// Client interface key.
    #[default]
    Cik,
    Token,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Cik => "cik",
            CredentialKind::Token => "token",
        }
    }
}

/// Act on behalf of a child of the authenticated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    ClientId(String),
    ResourceId(String),
}

/// Canonical credential block sent as `auth` in every envelope.
///
/// Serializes as `{"<kind>": "<value>"}` plus the qualifier key when set.
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    kind: CredentialKind,
    value: String,
    qualifier: Option<Qualifier>,
}

impl Auth {
    pub fn new(kind: CredentialKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            qualifier: None,
        }
    }

    pub fn cik(value: impl Into<String>) -> Self {
        Self::new(CredentialKind::Cik, value)
    }

    pub fn token(value: impl Into<String>) -> Self {
        Self::new(CredentialKind::Token, value)
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.qualifier = Some(Qualifier::ClientId(client_id.into()));
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.qualifier = Some(Qualifier::ResourceId(resource_id.into()));
        self
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("kind", &self.kind)
            .field("value", &"[REDACTED]")
            .field("qualifier", &self.qualifier)
            .finish()
    }
}

impl Serialize for Auth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.qualifier.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.kind.as_str(), &self.value)?;
        match &self.qualifier {
            Some(Qualifier::ClientId(id)) => map.serialize_entry("client_id", id)?,
            Some(Qualifier::ResourceId(id)) => map.serialize_entry("resource_id", id)?,
            None => {}
        }
        map.end()
    }
}

/// Credential as handed in by callers: a bare secret or an explicit [`Auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCredential {
    Bare(String),
    Structured(Auth),
}

impl AuthCredential {
    /// Resolve to the wire form. A bare secret is read as a client interface key.
    pub fn normalize(self) -> Auth {
        match self {
            AuthCredential::Bare(secret) => Auth::new(CredentialKind::default(), secret),
            AuthCredential::Structured(auth) => auth,
        }
    }
}

impl From<&str> for AuthCredential {
    fn from(secret: &str) -> Self {
        AuthCredential::Bare(secret.to_string())
    }
}

impl From<String> for AuthCredential {
    fn from(secret: String) -> Self {
        AuthCredential::Bare(secret)
    }
}

impl From<&String> for AuthCredential {
    fn from(secret: &String) -> Self {
        AuthCredential::Bare(secret.clone())
    }
}

impl From<Auth> for AuthCredential {
    fn from(auth: Auth) -> Self {
        AuthCredential::Structured(auth)
    }
}

impl From<&Auth> for AuthCredential {
    fn from(auth: &Auth) -> Self {
        AuthCredential::Structured(auth.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_secret_normalizes_to_cik() {
        let auth = AuthCredential::from("0123456789").normalize();
        assert_eq!(auth.kind(), CredentialKind::Cik);
        assert_eq!(
            serde_json::to_value(&auth).unwrap(),
            json!({"cik": "0123456789"})
        );
    }

    #[test]
    fn test_structured_credential_passes_through() {
        let auth = AuthCredential::from(Auth::token("tok")).normalize();
        assert_eq!(serde_json::to_value(&auth).unwrap(), json!({"token": "tok"}));
    }

    #[test]
    fn test_qualifier_serialized_alongside_kind() {
        let auth = Auth::cik("parent").with_client_id("child-rid");
        assert_eq!(
            serde_json::to_value(&auth).unwrap(),
            json!({"cik": "parent", "client_id": "child-rid"})
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", Auth::cik("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}

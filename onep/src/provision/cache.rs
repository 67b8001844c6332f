use super::model::ProvisioningModel;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Cache key: lookup id scoped by the vendor token it was resolved under.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    id: String,
    vendor_scope: String,
}

impl CacheKey {
    pub fn new(id: impl Into<String>, vendor_scope: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vendor_scope: vendor_scope.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("id", &self.id)
            .field("vendor_scope", &"[REDACTED]")
            .finish()
    }
}

/// Process-wide store of resolved models.
///
/// Clones share the same map. Entries are only ever inserted or overwritten,
/// never removed, and readers get their own copy of the model.
#[derive(Debug, Clone, Default)]
pub struct ModelCache {
    entries: Arc<DashMap<CacheKey, ProvisioningModel>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<ProvisioningModel> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: CacheKey, model: ProvisioningModel) {
        self.entries.insert(key, model);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

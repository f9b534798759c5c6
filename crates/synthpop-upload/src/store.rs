use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Size and content digest of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    /// Lowercase hex SHA-256 of the object body.
    pub sha256: String,
}

/// Trait implemented by object stores that can receive uploads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable location of `key`, e.g. `file:///data/bucket/customers/x.csv`.
    fn location(&self, key: &str) -> String;

    /// Store `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;

    /// Metadata for `key`, or `None` when the object does not exist.
    async fn head_object(&self, key: &str) -> Result<Option<ObjectMeta>, StoreError>;

    /// Keys starting with `prefix`, sorted.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

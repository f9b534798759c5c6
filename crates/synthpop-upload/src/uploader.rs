use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{StoreError, UploadError};
use crate::retry::RetryPolicy;
use crate::store::ObjectStore;

pub const CUSTOMERS_PREFIX: &str = "customers";
pub const TRANSACTIONS_PREFIX: &str = "transactions";

/// Subfolder under `transactions/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFolder {
    Historical,
    Streaming,
}

impl TransactionFolder {
    pub fn parse(value: &str) -> Result<Self, UploadError> {
        match value {
            "historical" => Ok(Self::Historical),
            "streaming" => Ok(Self::Streaming),
            other => Err(UploadError::InvalidFolder(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Streaming => "streaming",
        }
    }
}

impl fmt::Display for TransactionFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build `<prefix>/<basename of path>`.
pub fn object_key(prefix: &str, path: &Path) -> Result<String, UploadError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| UploadError::InvalidPath(path.to_path_buf()))?;
    Ok(format!("{}/{}", prefix.trim_end_matches('/'), name))
}

/// Where an upload landed and what was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub key: String,
    pub location: String,
    pub size: u64,
    pub sha256: String,
    pub attempts: u32,
}

/// Pushes local files into an object store.
#[derive(Debug, Clone)]
pub struct Uploader<S> {
    store: S,
    policy: RetryPolicy,
}

impl<S: ObjectStore> Uploader<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: S, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upload a customer table to `customers/<basename>`.
    pub async fn upload_customers(&self, local: &Path) -> Result<UploadReceipt, UploadError> {
        let key = object_key(CUSTOMERS_PREFIX, local)?;
        self.upload_file(local, &key).await
    }

    /// Upload a transaction file to `transactions/<folder>/<basename>`.
    pub async fn upload_transactions(
        &self,
        local: &Path,
        folder: TransactionFolder,
    ) -> Result<UploadReceipt, UploadError> {
        let prefix = format!("{TRANSACTIONS_PREFIX}/{folder}");
        let key = object_key(&prefix, local)?;
        self.upload_file(local, &key).await
    }

    /// Upload `local` under `key`, retrying transient store failures.
    pub async fn upload_file(&self, local: &Path, key: &str) -> Result<UploadReceipt, UploadError> {
        let body = read_local(local).await?;
        let size = body.len() as u64;
        let sha256 = hex::encode(Sha256::digest(&body));
        let start = Instant::now();

        let mut attempts = 0;
        self.policy
            .run("put_object", || {
                attempts += 1;
                self.store.put_object(key, body.clone())
            })
            .await
            .map_err(|(source, attempts)| store_failure(key, attempts, source))?;

        let location = self.store.location(key);
        info!(
            key,
            location = %location,
            bytes = size,
            attempts,
            duration_ms = start.elapsed().as_millis() as u64,
            "upload completed"
        );
        Ok(UploadReceipt {
            key: key.to_string(),
            location,
            size,
            sha256,
            attempts,
        })
    }

    /// Keys under `prefix`, sorted.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, UploadError> {
        self.policy
            .run("list_objects", || self.store.list_objects(prefix))
            .await
            .map_err(|(source, attempts)| store_failure(prefix, attempts, source))
    }

    /// True when `key` exists and matches `local` in size and SHA-256.
    pub async fn verify(&self, local: &Path, key: &str) -> Result<bool, UploadError> {
        let body = read_local(local).await?;
        let meta = self
            .policy
            .run("head_object", || self.store.head_object(key))
            .await
            .map_err(|(source, attempts)| store_failure(key, attempts, source))?;

        let Some(meta) = meta else {
            warn!(key, "object not found");
            return Ok(false);
        };
        let sha256 = hex::encode(Sha256::digest(&body));
        let matches = meta.size == body.len() as u64 && meta.sha256 == sha256;
        if matches {
            info!(key, bytes = meta.size, "upload verified");
        } else {
            warn!(
                key,
                local_bytes = body.len() as u64,
                remote_bytes = meta.size,
                "uploaded object differs from local file"
            );
        }
        Ok(matches)
    }
}

async fn read_local(local: &Path) -> Result<Vec<u8>, UploadError> {
    match tokio::fs::read(local).await {
        Ok(body) => Ok(body),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(UploadError::MissingFile(local.to_path_buf()))
        }
        Err(err) => Err(UploadError::Io(err)),
    }
}

fn store_failure(key: &str, attempts: u32, source: StoreError) -> UploadError {
    UploadError::Store {
        key: key.to_string(),
        attempts,
        source,
    }
}

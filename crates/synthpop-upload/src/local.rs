use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;
use crate::store::{ObjectMeta, ObjectStore};

/// Object store backed by a directory tree: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
    bucket: String,
}

impl LocalDirStore {
    /// Open an existing bucket directory. A missing bucket surfaces on first use.
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Open a bucket, creating its directory when absent.
    pub async fn create(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let store = Self::new(root, bucket);
        tokio::fs::create_dir_all(store.bucket_dir())
            .await
            .map_err(|err| StoreError::from_io("create bucket", err))?;
        Ok(store)
    }

    fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    async fn ensure_bucket(&self) -> Result<PathBuf, StoreError> {
        let dir = self.bucket_dir();
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(StoreError::BucketNotFound(self.bucket.clone())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::BucketNotFound(self.bucket.clone()))
            }
            Err(err) => Err(StoreError::from_io("open bucket", err)),
        }
    }

    fn object_path(&self, bucket_dir: &Path, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let escapes = key.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)));
        if escapes {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid object key '{key}'"),
            )));
        }
        Ok(bucket_dir.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalDirStore {
    fn location(&self, key: &str) -> String {
        format!("file://{}/{}", self.bucket_dir().display(), key)
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let bucket_dir = self.ensure_bucket().await?;
        let path = self.object_path(&bucket_dir, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::from_io("create prefix", err))?;
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = path.with_file_name(format!("{file_name}.part"));
        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|err| StoreError::from_io("create object", err))?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|err| StoreError::from_io("commit object", err))?;
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<Option<ObjectMeta>, StoreError> {
        let bucket_dir = self.ensure_bucket().await?;
        let path = self.object_path(&bucket_dir, key)?;
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::from_io("read object", err)),
        };
        Ok(Some(ObjectMeta {
            key: key.to_string(),
            size: body.len() as u64,
            sha256: hex::encode(Sha256::digest(&body)),
        }))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let bucket_dir = self.ensure_bucket().await?;
        let mut keys = Vec::new();
        let mut pending = vec![(bucket_dir, String::new())];
        while let Some((dir, key_prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|err| StoreError::from_io("list objects", err))?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let key = format!("{key_prefix}{name}");
                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), format!("{key}/")));
                } else if key.starts_with(prefix) && !name.ends_with(".part") {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

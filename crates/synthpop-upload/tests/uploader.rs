use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use synthpop_upload::{
    LocalDirStore, ObjectMeta, ObjectStore, RetryPolicy, StoreError, TransactionFolder,
    UploadError, Uploader,
};
use uuid::Uuid;

#[derive(Clone, Copy)]
enum Failure {
    Transient,
    Permission,
}

/// In-memory store that fails the first `failures` puts.
struct FlakyStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    failures: AtomicU32,
    failure: Failure,
    puts: AtomicU32,
}

impl FlakyStore {
    fn new(failures: u32, failure: Failure) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failures: AtomicU32::new(failures),
            failure,
            puts: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    fn location(&self, key: &str) -> String {
        format!("mem://{key}")
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(match self.failure {
                Failure::Transient => StoreError::Transient("connection reset".to_string()),
                Failure::Permission => StoreError::PermissionDenied("AccessDenied".to_string()),
            });
        }
        self.objects
            .lock()
            .expect("lock")
            .insert(key.to_string(), body);
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<Option<ObjectMeta>, StoreError> {
        let objects = self.objects.lock().expect("lock");
        Ok(objects.get(key).map(|body| ObjectMeta {
            key: key.to_string(),
            size: body.len() as u64,
            sha256: hex::encode(Sha256::digest(body)),
        }))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.lock().expect("lock");
        Ok(objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

fn temp_file(name: &str, contents: &str) -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("synthpop-upload-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write file");
    (dir, path)
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let (dir, path) = temp_file("customers.csv", "customer_id\nCUST00000001\n");
    let uploader = Uploader::with_policy(FlakyStore::new(2, Failure::Transient), RetryPolicy::immediate(3));

    let receipt = uploader.upload_customers(&path).await.expect("upload");
    assert_eq!(receipt.key, "customers/customers.csv");
    assert_eq!(receipt.attempts, 3);
    assert_eq!(receipt.location, "mem://customers/customers.csv");
    assert!(uploader.verify(&path, &receipt.key).await.expect("verify"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_error() {
    let (dir, path) = temp_file("customers.csv", "x");
    let uploader = Uploader::with_policy(FlakyStore::new(5, Failure::Transient), RetryPolicy::immediate(3));

    let err = uploader.upload_customers(&path).await.expect_err("keeps failing");
    match err {
        UploadError::Store { attempts, source, .. } => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, StoreError::Transient(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(uploader.store().puts.load(Ordering::SeqCst), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn permission_failures_are_not_retried() {
    let (dir, path) = temp_file("customers.csv", "x");
    let uploader = Uploader::with_policy(FlakyStore::new(1, Failure::Permission), RetryPolicy::immediate(3));

    let err = uploader.upload_customers(&path).await.expect_err("fatal");
    assert!(matches!(
        err,
        UploadError::Store {
            attempts: 1,
            source: StoreError::PermissionDenied(_),
            ..
        }
    ));
    assert_eq!(uploader.store().puts.load(Ordering::SeqCst), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_local_file_fails_before_any_put() {
    let uploader = Uploader::with_policy(FlakyStore::new(0, Failure::Transient), RetryPolicy::immediate(3));
    let missing = std::env::temp_dir().join(format!("missing-{}.csv", Uuid::new_v4()));
    let err = uploader.upload_customers(&missing).await.expect_err("missing file");
    assert!(matches!(err, UploadError::MissingFile(_)));
    assert_eq!(uploader.store().puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transactions_land_under_their_folder() {
    let (dir, path) = temp_file("batch_001.csv", "t");
    let uploader = Uploader::with_policy(FlakyStore::new(0, Failure::Transient), RetryPolicy::immediate(3));
    uploader
        .upload_transactions(&path, TransactionFolder::Streaming)
        .await
        .expect("upload");
    let (customers_dir, customers) = temp_file("customers.csv", "c");
    uploader.upload_customers(&customers).await.expect("upload");

    let keys = uploader.list("transactions/").await.expect("list");
    assert_eq!(keys, vec!["transactions/streaming/batch_001.csv"]);
    assert_eq!(uploader.list("").await.expect("list").len(), 2);

    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_dir_all(&customers_dir);
}

#[tokio::test]
async fn verify_detects_a_changed_local_file() {
    let root = std::env::temp_dir().join(format!("synthpop-bucket-{}", Uuid::new_v4()));
    let store = LocalDirStore::create(&root, "synthetic").await.expect("store");
    let uploader = Uploader::with_policy(store, RetryPolicy::immediate(3));
    let (dir, path) = temp_file("customers.csv", "customer_id\nCUST00000001\n");

    let receipt = uploader.upload_customers(&path).await.expect("upload");
    assert!(uploader.verify(&path, &receipt.key).await.expect("verify"));

    std::fs::write(&path, "customer_id\nCUST00000002\n").expect("rewrite");
    assert!(!uploader.verify(&path, &receipt.key).await.expect("verify"));
    assert!(!uploader.verify(&path, "customers/other.csv").await.expect("verify"));

    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_dir_all(&root);
}

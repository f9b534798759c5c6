//! Object-store upload for generated tables.
//!
//! Files are pushed as opaque bytes under fixed key prefixes, retried on
//! transient failures, and can be verified against the local copy.

pub mod error;
pub mod local;
pub mod retry;
pub mod store;
pub mod uploader;

pub use error::{StoreError, UploadError};
pub use local::LocalDirStore;
pub use retry::RetryPolicy;
pub use store::{ObjectMeta, ObjectStore};
pub use uploader::{
    CUSTOMERS_PREFIX, TRANSACTIONS_PREFIX, TransactionFolder, UploadReceipt, Uploader, object_key,
};

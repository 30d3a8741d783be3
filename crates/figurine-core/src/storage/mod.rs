//! Storage abstraction for persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::DocumentFile;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key of the single browser-style "save locally" slot.
pub const LOCAL_SAVE_SLOT: &str = "local-save";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Document storage backend.
///
/// On native platforms implementations must be `Send + Sync`; on WASM the
/// bounds are relaxed since it is single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    fn save(&self, key: &str, document: &DocumentFile) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentFile>>;

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All stored keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Document storage backend (WASM version without `Send + Sync`).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, key: &str, document: &DocumentFile) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentFile>>;

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All stored keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

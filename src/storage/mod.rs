//! Persistence gateway
//!
//! An opaque async key-value store holding JSON documents. The engine keeps
//! two entries, [`TIMERS_KEY`] and [`HISTORY_KEY`], each fully replaced on
//! every write.

pub mod file;
pub mod memory;

use std::future::Future;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key of the timer collection document
pub const TIMERS_KEY: &str = "timers";
/// Key of the completion history document, most-recent-first
pub const HISTORY_KEY: &str = "timerHistory";

/// Async key-value backend
pub trait Store: Send + Sync + 'static {
    /// Read a value; `None` when the key was never written or has been removed
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Drop every key held by this store
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

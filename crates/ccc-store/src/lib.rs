//! CCC Store - marker persistence
//!
//! - **MarkerStore**: async backend trait (assignee list, marker append)
//! - **MemoryStore**: in-process backend
//! - **FirestoreStore**: Firestore REST backend
//! - **MarkerService**: validate-then-write submission
//!
//! # Example
//!
//! ```rust
//! use ccc_store::{MarkerService, MemoryStore};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let service = MarkerService::new(Arc::new(MemoryStore::new()), ccc_catalog::builtin());
//! let err = service.submit(&ccc_core::Selection::new(), "").await.unwrap_err();
//! assert!(!err.is_recoverable());
//! # });
//! ```

pub mod error;
pub mod firestore;
pub mod memory;
pub mod store;
pub mod submit;

pub use error::{StorageError, SubmissionError};
pub use firestore::{Document, FirestoreStore};
pub use memory::MemoryStore;
pub use store::{MarkerId, MarkerStore};
pub use submit::{MarkerService, StoredMarker};

use ccc_core::{StoreBackend, StoreConfig};
use std::sync::Arc;

/// Build the backend selected in `config`
///
/// # Errors
/// [`StorageError::Misconfigured`] or [`StorageError::Http`] from
/// [`FirestoreStore::new`].
pub fn from_config(config: &StoreConfig) -> Result<Arc<dyn MarkerStore>, StorageError> {
    let store: Arc<dyn MarkerStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(config)?),
    };
    tracing::debug!(backend = store.backend(), "store ready");
    Ok(store)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! In-process store
//!
//! Keeps everything in memory behind `parking_lot` locks. Used for dry runs
//! and tests; can be switched offline and given artificial latency to
//! exercise failure and ordering paths.

use crate::error::StorageError;
use crate::store::{MarkerId, MarkerStore};
use async_trait::async_trait;
use ccc_core::{Assignee, Marker};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Memory-backed [`MarkerStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    assignees: RwLock<Vec<Assignee>>,
    markers: RwLock<Vec<(MarkerId, Marker)>>,
    offline: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an initial assignee list
    #[must_use]
    pub fn with_assignees(self, assignees: Vec<Assignee>) -> Self {
        *self.assignees.write() = assignees;
        self
    }

    /// With a delay before every call completes
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every call fail with [`StorageError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Replace the assignee list
    pub fn set_assignees(&self, assignees: Vec<Assignee>) {
        *self.assignees.write() = assignees;
    }

    /// Snapshot of stored markers in insertion order
    #[must_use]
    pub fn markers(&self) -> Vec<(MarkerId, Marker)> {
        self.markers.read().clone()
    }

    async fn enter(&self) -> Result<(), StorageError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarkerStore for MemoryStore {
    async fn list_assignees(&self) -> Result<Vec<Assignee>, StorageError> {
        self.enter().await?;
        Ok(self.assignees.read().clone())
    }

    async fn insert_marker(&self, marker: &Marker) -> Result<MarkerId, StorageError> {
        self.enter().await?;
        let mut markers = self.markers.write();
        let id = MarkerId::new(format!("marker-{:06}", markers.len() + 1));
        markers.push((id.clone(), marker.clone()));
        Ok(id)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

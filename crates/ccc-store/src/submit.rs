//! Marker submission
//!
//! Validation happens before any I/O: an incomplete form never reaches the
//! store. A valid marker is written with exactly one insert; failures are
//! reported to the caller and not retried.

use crate::error::{StorageError, SubmissionError};
use crate::store::{MarkerId, MarkerStore};
use ccc_catalog::Catalog;
use ccc_core::{Assignee, Marker, Selection, Session};
use std::sync::Arc;

/// A marker the store accepted
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMarker {
    /// Backend id
    pub id: MarkerId,
    /// What was written
    pub marker: Marker,
}

/// Validates and persists markers
#[derive(Clone)]
pub struct MarkerService<'c> {
    store: Arc<dyn MarkerStore>,
    catalog: &'c Catalog,
}

impl std::fmt::Debug for MarkerService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerService")
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

impl<'c> MarkerService<'c> {
    /// Create service over `store`
    pub fn new(store: Arc<dyn MarkerStore>, catalog: &'c Catalog) -> Self {
        Self { store, catalog }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn MarkerStore> {
        &self.store
    }

    /// Validate `selection` and store the resulting marker
    ///
    /// # Errors
    /// [`SubmissionError::Validation`] naming every missing field (the
    /// store is not called), or [`SubmissionError::Storage`] if the write
    /// fails.
    pub async fn submit(
        &self,
        selection: &Selection,
        url: &str,
    ) -> Result<StoredMarker, SubmissionError> {
        let marker = Marker::from_selection(selection, self.catalog, url).map_err(|e| {
            tracing::warn!(error = %e, "marker rejected");
            e
        })?;
        Ok(self.store_marker(marker).await?)
    }

    /// Store the marker built from a session's current state
    ///
    /// # Errors
    /// As [`MarkerService::submit`].
    pub async fn submit_session(
        &self,
        session: &Session<'_>,
    ) -> Result<StoredMarker, SubmissionError> {
        let marker = session.marker()?;
        Ok(self.store_marker(marker).await?)
    }

    async fn store_marker(&self, marker: Marker) -> Result<StoredMarker, StorageError> {
        match self.store.insert_marker(&marker).await {
            Ok(id) => {
                tracing::info!(
                    id = %id,
                    backend = self.store.backend(),
                    operation = %marker.operation,
                    equipment = %marker.equipment,
                    "marker stored"
                );
                Ok(StoredMarker { id, marker })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backend = self.store.backend(),
                    recoverable = e.is_recoverable(),
                    "marker store failed"
                );
                Err(e)
            }
        }
    }

    /// Current assignee list
    ///
    /// # Errors
    /// [`StorageError`] from the backend.
    pub async fn assignees(&self) -> Result<Vec<Assignee>, StorageError> {
        let list = self.store.list_assignees().await.map_err(|e| {
            tracing::error!(error = %e, backend = self.store.backend(), "assignee fetch failed");
            e
        })?;
        tracing::debug!(count = list.len(), "assignees fetched");
        Ok(list)
    }
}

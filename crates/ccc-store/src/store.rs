//! Store abstraction
//!
//! The form needs two things from persistence: the list of people a marker
//! can be assigned to, and an append-only collection of submitted markers.

use crate::error::StorageError;
use async_trait::async_trait;
use ccc_core::{Assignee, Marker};
use std::fmt;

/// Identifier the backend gave a stored marker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerId(String);

impl MarkerId {
    /// Wrap a backend id
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence backend for markers and assignees
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Everyone a marker can be assigned to
    async fn list_assignees(&self) -> Result<Vec<Assignee>, StorageError>;

    /// Append one marker, returning its id
    async fn insert_marker(&self, marker: &Marker) -> Result<MarkerId, StorageError>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

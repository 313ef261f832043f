//! Catalog integrity errors

use crate::level::CascadeLevel;

/// Catalog construction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Same id appears twice within one parent scope
    #[error("duplicate {level} id {id:?} under {parent:?}")]
    DuplicateId {
        /// Level of the duplicated entry
        level: CascadeLevel,
        /// Parent scope, `None` for top-level lists
        parent: Option<String>,
        /// The repeated id
        id: String,
    },

    /// Scoped entries reference a parent that does not exist
    #[error("{level} entries reference unknown parent {parent:?}")]
    UnknownParent {
        /// Level of the orphaned entries
        level: CascadeLevel,
        /// The missing parent id
        parent: String,
    },

    /// Same lead observer id appears twice
    #[error("duplicate lead observer id {0:?}")]
    DuplicateObserver(String),
}

//! CCC Catalog
//!
//! The static nested lookup table behind the cascading parameter form.
//!
//! # Overview
//!
//! - **CascadeLevel**: the fixed `Operation → Control → ControlFramework →
//!   OperatingContext → Equipment` chain
//! - **Catalog**: ids and labels at every level, scoped by parent
//! - **builtin()**: the compiled-in site and control data
//!
//! # Example
//!
//! ```rust
//! use ccc_catalog::{builtin, CascadeLevel};
//!
//! let catalog = builtin();
//! let frameworks = catalog.options_under(CascadeLevel::ControlFramework, Some("30000000"));
//! assert_eq!(frameworks[0].label, "Crash, Collision, Overturn on Mine Site");
//! ```

#![warn(missing_docs)]

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod level;

// Re-exports
pub use builtin::builtin;
pub use catalog::{Catalog, CatalogBuilder, CatalogEntry, SiteBounds};
pub use error::CatalogError;
pub use level::{CascadeLevel, ParseLevelError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

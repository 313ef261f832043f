//! CCC Core - selection state and marker construction
//!
//! The form logic of the CCC marker tool:
//! - Cascading selection over the catalog with a pure reducer
//! - Share-URL encoding and decoding
//! - Marker validation and construction
//! - Summary table and PDF export layout
//! - Latest-request-wins sequencing for asynchronous refreshes
//!
//! # Example
//!
//! ```rust
//! use ccc_core::prelude::*;
//!
//! let mut session = Session::new(ccc_catalog::builtin());
//! session.dispatch(&Action::level(CascadeLevel::Operation, "NMKM"));
//! session.dispatch(&Action::level(CascadeLevel::Control, "30000000"));
//!
//! let encoder = ShareEncoder::new("https://qr.example/");
//! let url = session.refresh_share_url(&encoder).unwrap().to_string();
//! assert_eq!(decode_url(&url).unwrap().risk_selected, "30000000");
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod marker;
pub mod selection;
pub mod sequence;
pub mod session;
pub mod share;
pub mod summary;
pub mod types;

pub use capability::{
    export_pdf, ExportLayout, ExportRequest, MapWidget, PageSize, PdfExporter, Placement,
    QrRenderer, RasterImage, TableRenderer,
};
pub use config::{
    AppConfig, ExportConfig, FirestoreConfig, MapConfig, ShareConfig, StoreBackend, StoreConfig,
};
pub use error::{
    CapabilityError, ConfigError, DecodeError, EncodingError, LocationError, RequiredField,
    ValidationError,
};
pub use marker::Marker;
pub use selection::{derive_options, reduce, Action, Selection};
pub use sequence::{Completion, Latest, RequestSequencer, Ticket};
pub use session::Session;
pub use share::{decode_url, ShareEncoder, ShareParams, PARAMS_KEY};
pub use summary::{SummaryRow, SummaryTable};
pub use types::{Assignee, FormType, Location};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with CCC Core
    pub use crate::{
        decode_url, derive_options, reduce, Action, Assignee, FormType, Location, Marker,
        Selection, Session, ShareEncoder, ShareParams, SummaryTable,
    };
    pub use ccc_catalog::{CascadeLevel, Catalog, CatalogEntry};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

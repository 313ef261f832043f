//! CCC CLI - command-line front end
//!
//! Drives the same session, share-URL and submission code as the form:
//!
//! ```text
//! ccc-marker options control --operation NMKM
//! ccc-marker url --operation NMKM --control 30000000
//! ccc-marker decode '<share url>'
//! ccc-marker submit --operation NMKM ... --form CCC --lat -37.8 --lng 144.9
//! ```

pub mod cli;
pub mod commands;
pub mod logging;

pub use commands::{load_config, run, HeadlessMap};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

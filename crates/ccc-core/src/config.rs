//! Application configuration
//!
//! Loaded from TOML; every section has defaults so an empty file is valid.
//! Secrets can be supplied through the environment instead of the file.

use crate::capability::{ExportLayout, PageSize};
use crate::error::ConfigError;
use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides `store.firestore.api_key`
pub const ENV_FIRESTORE_API_KEY: &str = "CCC_FIRESTORE_API_KEY";
/// Overrides `share.base_url`
pub const ENV_SHARE_BASE_URL: &str = "CCC_SHARE_BASE_URL";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Share URL settings
    pub share: ShareConfig,
    /// Persistence settings
    pub store: StoreConfig,
    /// Map defaults
    pub map: MapConfig,
    /// PDF export settings
    pub export: ExportConfig,
}

/// Share URL settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Origin the QR link points at
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://bhp-qr-code-evolve-platform-prototype1.burnsred.com.au/".to_string(),
        }
    }
}

/// Which store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, for tests and dry runs
    #[default]
    Memory,
    /// Firestore REST API
    Firestore,
}

/// Persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,
    /// Collection holding assignee documents
    pub assignees_collection: String,
    /// Collection markers are appended to
    pub markers_collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Firestore connection
    pub firestore: FirestoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            assignees_collection: "assignees".to_string(),
            markers_collection: "markers".to_string(),
            timeout_secs: 30,
            firestore: FirestoreConfig::default(),
        }
    }
}

/// Firestore connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    /// REST endpoint root
    pub endpoint: String,
    /// Project id
    pub project_id: String,
    /// Database id
    pub database: String,
    /// Web API key
    pub api_key: Option<String>,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://firestore.googleapis.com/v1".to_string(),
            project_id: "ccc-data-store".to_string(),
            database: "(default)".to_string(),
            api_key: None,
        }
    }
}

/// Map defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial centre latitude, used until the device reports a position
    pub center_lat: f64,
    /// Initial centre longitude
    pub center_lng: f64,
    /// Initial zoom
    pub zoom: f64,
}

impl MapConfig {
    /// Initial centre as a location
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] when the configured centre is out of range.
    pub fn center(&self) -> Result<Location, ConfigError> {
        Location::new(self.center_lat, self.center_lng)
            .map_err(|e| ConfigError::Invalid(format!("map centre: {e}")))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: -37.816_276_645_870_91,
            center_lng: 144.985_810_447_802_9,
            zoom: 14.0,
        }
    }
}

/// PDF export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Download file name
    pub file_name: String,
    /// Template page width in points
    pub page_width: f32,
    /// Template page height in points
    pub page_height: f32,
}

impl ExportConfig {
    /// Page size for layout
    #[inline]
    #[must_use]
    pub fn page(&self) -> PageSize {
        PageSize {
            width: self.page_width,
            height: self.page_height,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "ccc_qr.pdf".to_string(),
            page_width: PageSize::A4.width,
            page_height: PageSize::A4.height,
        }
    }
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With share base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.share.base_url = base_url.into();
        self
    }

    /// With store backend
    #[inline]
    #[must_use]
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.store.backend = backend;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or unknown value types.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, else as
    /// [`AppConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply environment overrides using `lookup` to read variables
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_FIRESTORE_API_KEY).filter(|k| !k.is_empty()) {
            self.store.firestore.api_key = Some(key);
        }
        if let Some(base) = lookup(ENV_SHARE_BASE_URL).filter(|b| !b.is_empty()) {
            self.share.base_url = base;
        }
        self
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Check values that parse but cannot work
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.share.base_url)
            .map_err(|e| ConfigError::Invalid(format!("share.base_url: {e}")))?;
        self.map.center()?;

        if self.store.timeout_secs == 0 {
            return Err(ConfigError::Invalid("store.timeout_secs must be > 0".into()));
        }
        if self.store.backend == StoreBackend::Firestore {
            let fs = &self.store.firestore;
            if fs.project_id.is_empty() {
                return Err(ConfigError::Invalid("store.firestore.project_id is empty".into()));
            }
            if fs.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Invalid(format!(
                    "store.firestore.api_key is not set (or set {ENV_FIRESTORE_API_KEY})"
                )));
            }
        }
        let side = ExportLayout::QR_SIZE;
        if self.export.page_width < side || self.export.page_height < side {
            return Err(ConfigError::Invalid("export page is smaller than the QR code".into()));
        }
        Ok(())
    }
}

//! Error types for CCC Core
//!
//! Provides error handling for:
//! - Missing fields at marker submission
//! - Share-URL encoding and decoding
//! - Coordinate validation
//! - Configuration loading
//! - External capability (QR, PDF) failures

use ccc_catalog::CascadeLevel;
use std::fmt;
use std::path::PathBuf;

/// A field that must be populated before a marker can be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequiredField {
    /// One of the cascade levels
    Level(CascadeLevel),
    /// CCC / FCC form type
    FormType,
    /// Map location
    Location,
    /// Generated share URL
    Url,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Level(level) => f.write_str(level.as_str()),
            RequiredField::FormType => f.write_str("form-type"),
            RequiredField::Location => f.write_str("location"),
            RequiredField::Url => f.write_str("url"),
        }
    }
}

impl From<CascadeLevel> for RequiredField {
    fn from(level: CascadeLevel) -> Self {
        RequiredField::Level(level)
    }
}

/// Submission attempted with required fields unset
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", join(.missing))]
pub struct ValidationError {
    /// Every missing field, in form order
    pub missing: Vec<RequiredField>,
}

impl ValidationError {
    /// Whether `field` is among the missing ones
    #[inline]
    #[must_use]
    pub fn names(&self, field: RequiredField) -> bool {
        self.missing.contains(&field)
    }
}

fn join(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Selection could not be serialized into a share token
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// JSON serialization failed
    #[error("failed to serialize share parameters: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Share URL or token could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Not an absolute URL
    #[error("invalid share url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// URL has no `params` query parameter
    #[error("share url has no params query parameter")]
    MissingParams,

    /// Token is not valid base64
    #[error("invalid base64 token: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8
    #[error("token is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not the expected JSON record
    #[error("token is not a share record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coordinates outside the valid range
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// Latitude not finite or outside [-90, 90]
    #[error("latitude {0} out of range")]
    Latitude(f64),

    /// Longitude not finite or outside [-180, 180]
    #[error("longitude {0} out of range")]
    Longitude(f64),
}

/// Configuration loading or validation failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// External rendering collaborator failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Nothing to render
    #[error("nothing to render: share url is empty")]
    EmptyPayload,

    /// QR or table rasterization failed
    #[error("render failed: {0}")]
    Render(String),

    /// PDF composition failed
    #[error("export failed: {0}")]
    Export(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_fields() {
        let err = ValidationError {
            missing: vec![
                RequiredField::Level(CascadeLevel::ControlFramework),
                RequiredField::Location,
            ],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: control-framework, location"
        );
        assert!(err.names(RequiredField::Location));
        assert!(!err.names(RequiredField::Url));
    }

    #[test]
    fn decode_error_display() {
        assert!(DecodeError::MissingParams.to_string().contains("params"));
    }
}

//! Value types shared across the form
//!
//! - Form type (CCC / FCC)
//! - Map location
//! - Assignee reference

use crate::error::LocationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which check form a marker opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Critical control check
    #[serde(rename = "CCC")]
    Ccc,
    /// Field control check
    #[serde(rename = "FCC")]
    Fcc,
}

impl FormType {
    /// Both form types, in dropdown order
    pub const ALL: [FormType; 2] = [FormType::Ccc, FormType::Fcc];

    /// Wire and display name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Ccc => "CCC",
            FormType::Fcc => "FCC",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|form| form.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown form type: {s}"))
    }
}

/// A point picked on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Location {
    /// Validated constructor
    ///
    /// # Errors
    /// Returns [`LocationError`] for non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, LocationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(LocationError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// A person a marker can be assigned to
///
/// Sourced from the remote store; field names follow the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignee {
    /// Stable user id
    #[serde(rename = "uid")]
    pub id: String,
    /// Name shown in the assignee dropdown
    #[serde(rename = "name")]
    pub display_name: String,
    /// Login name, when the store has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Assignee {
    /// Create new assignee reference
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            username: None,
        }
    }

    /// With login name
    #[inline]
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

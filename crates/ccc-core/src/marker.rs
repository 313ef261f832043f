//! Marker construction
//!
//! A marker is the immutable record written to the store when the user
//! submits a fully populated form. It carries catalog labels, not ids.

use crate::error::{RequiredField, ValidationError};
use crate::selection::Selection;
use crate::types::{Assignee, FormType, Location};
use ccc_catalog::{CascadeLevel, Catalog};
use serde::{Deserialize, Serialize};

/// A finalized, persisted selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Assigned person, if any
    pub assignee: Option<Assignee>,
    /// Operating context label
    pub context: String,
    /// Control label
    pub control: String,
    /// Equipment label
    pub equipment: String,
    /// Form type
    pub form: FormType,
    /// Control framework label
    pub framework: String,
    /// Picked location
    pub location: Location,
    /// Operation site label
    pub operation: String,
    /// Share URL encoded in the QR code
    pub url: String,
}

impl Marker {
    /// Build a marker from a complete selection
    ///
    /// All-or-nothing: every cascade level, the form type, the location and
    /// a non-empty `url` must be present.
    ///
    /// # Errors
    /// [`ValidationError`] naming every missing field. An id whose label
    /// cannot be resolved counts as missing.
    pub fn from_selection(
        selection: &Selection,
        catalog: &Catalog,
        url: &str,
    ) -> Result<Self, ValidationError> {
        let labels = CascadeLevel::ALL.map(|level| selection.label(level, catalog));

        let mut missing: Vec<RequiredField> = CascadeLevel::ALL
            .into_iter()
            .zip(&labels)
            .filter(|(_, label)| label.is_none())
            .map(|(level, _)| RequiredField::Level(level))
            .collect();
        if selection.form_type().is_none() {
            missing.push(RequiredField::FormType);
        }
        if selection.location().is_none() {
            missing.push(RequiredField::Location);
        }
        if url.trim().is_empty() {
            missing.push(RequiredField::Url);
        }

        match (labels, selection.form_type(), selection.location()) {
            (
                [Some(operation), Some(control), Some(framework), Some(context), Some(equipment)],
                Some(form),
                Some(location),
            ) if missing.is_empty() => Ok(Self {
                assignee: selection.assignee().cloned(),
                context: context.to_string(),
                control: control.to_string(),
                equipment: equipment.to_string(),
                form,
                framework: framework.to_string(),
                location,
                operation: operation.to_string(),
                url: url.to_string(),
            }),
            _ => Err(ValidationError { missing }),
        }
    }
}

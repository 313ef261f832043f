//! Selection state and reducer
//!
//! A [`Selection`] holds one optional id per cascade level plus the
//! non-cascading form fields. It can only change through [`reduce`] or the
//! `set_*` methods, which keep the cascade consistent: if level N is unset,
//! every level deeper than N is unset too.
//!
//! An id that is not offered at its level (see [`derive_options`]) is
//! treated exactly like clearing the level.

use crate::types::{Assignee, FormType, Location};
use ccc_catalog::{CascadeLevel, Catalog, CatalogEntry};

/// The user's current choices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    levels: [Option<String>; CascadeLevel::COUNT],
    form_type: Option<FormType>,
    lead_observer: Option<String>,
    assignee: Option<Assignee>,
    location: Option<Location>,
}

/// A single user action on the form
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pick or clear a cascade level
    SetLevel {
        /// Level being changed
        level: CascadeLevel,
        /// New id, `None` to clear
        id: Option<String>,
    },
    /// Pick or clear the form type
    SetFormType(Option<FormType>),
    /// Pick or clear the lead observer
    SetLeadObserver(Option<String>),
    /// Pick or clear the assignee
    SetAssignee(Option<Assignee>),
    /// Place or clear the map location
    SetLocation(Option<Location>),
}

impl Action {
    /// Shorthand for [`Action::SetLevel`]
    #[must_use]
    pub fn level(level: CascadeLevel, id: impl Into<String>) -> Self {
        Action::SetLevel {
            level,
            id: Some(id.into()),
        }
    }

    /// Whether applying this action can change the share-URL payload
    #[must_use]
    pub fn affects_share_params(&self) -> bool {
        matches!(self, Action::SetLevel { .. } | Action::SetLeadObserver(_))
    }
}

/// Apply one action, returning the next selection
#[must_use]
pub fn reduce(mut selection: Selection, action: &Action, catalog: &Catalog) -> Selection {
    match action {
        Action::SetLevel { level, id } => selection.set_level(catalog, *level, id.as_deref()),
        Action::SetFormType(form) => selection.set_form_type(*form),
        Action::SetLeadObserver(id) => selection.set_lead_observer(catalog, id.as_deref()),
        Action::SetAssignee(assignee) => selection.set_assignee(assignee.clone()),
        Action::SetLocation(location) => selection.set_location(*location),
    }
    selection
}

/// Options selectable at `level` given the current selection
///
/// `Operation` lists every site. Deeper levels list the entries scoped by the
/// selection one level up, or nothing when that level is unset.
#[must_use]
pub fn derive_options<'c>(
    level: CascadeLevel,
    selection: &Selection,
    catalog: &'c Catalog,
) -> &'c [CatalogEntry] {
    let parent = level.parent().and_then(|p| selection.get(p));
    catalog.options_under(level, parent)
}

impl Selection {
    /// Empty selection, as at session start
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected id at `level`
    #[inline]
    #[must_use]
    pub fn get(&self, level: CascadeLevel) -> Option<&str> {
        self.levels[level.index()].as_deref()
    }

    /// Selected form type
    #[inline]
    #[must_use]
    pub fn form_type(&self) -> Option<FormType> {
        self.form_type
    }

    /// Selected lead observer id
    #[inline]
    #[must_use]
    pub fn lead_observer(&self) -> Option<&str> {
        self.lead_observer.as_deref()
    }

    /// Selected assignee
    #[inline]
    #[must_use]
    pub fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Picked location
    #[inline]
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Deepest level with a selection
    #[must_use]
    pub fn deepest(&self) -> Option<CascadeLevel> {
        CascadeLevel::ALL
            .into_iter()
            .take_while(|level| self.get(*level).is_some())
            .last()
    }

    /// Whether every cascade level is selected
    #[must_use]
    pub fn cascade_complete(&self) -> bool {
        self.deepest() == Some(CascadeLevel::Equipment)
    }

    /// Whether no set level follows an unset one
    #[must_use]
    pub fn is_cascade_consistent(&self) -> bool {
        let first_gap = self.levels.iter().position(Option::is_none);
        first_gap.map_or(true, |gap| self.levels[gap..].iter().all(Option::is_none))
    }

    /// Label of the selected entry at `level`
    #[must_use]
    pub fn label<'c>(&self, level: CascadeLevel, catalog: &'c Catalog) -> Option<&'c str> {
        let id = self.get(level)?;
        let parent = level.parent().and_then(|p| self.get(p));
        catalog.label(level, parent, id)
    }

    /// Set or clear `level`, clearing everything that depends on it
    ///
    /// Deeper levels and the assignee are always cleared. Changing the
    /// operation also clears the form type and lead observer.
    pub fn set_level(&mut self, catalog: &Catalog, level: CascadeLevel, id: Option<&str>) {
        let offered = derive_options(level, self, catalog);
        let accepted = id.filter(|id| offered.iter().any(|e| e.id == *id));

        if let (Some(raw), None) = (id, accepted) {
            tracing::warn!(%level, id = raw, "id not offered at this level; treating as unset");
        }

        self.levels[level.index()] = accepted.map(str::to_string);
        for deeper in level.deeper() {
            self.levels[deeper.index()] = None;
        }
        self.assignee = None;
        if level == CascadeLevel::Operation {
            self.form_type = None;
            self.lead_observer = None;
        }

        tracing::debug!(%level, selected = ?accepted, "cascade level updated");
    }

    /// Set or clear the map location
    #[inline]
    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// Set or clear the form type; ignored until an operation is chosen
    pub fn set_form_type(&mut self, form: Option<FormType>) {
        self.form_type = form.filter(|_| self.get(CascadeLevel::Operation).is_some());
    }

    /// Set or clear the lead observer; unknown ids clear it
    pub fn set_lead_observer(&mut self, catalog: &Catalog, id: Option<&str>) {
        let operation_set = self.get(CascadeLevel::Operation).is_some();
        self.lead_observer = id
            .filter(|id| operation_set && catalog.lead_observer(id).is_some())
            .map(str::to_string);
    }

    /// Set or clear the assignee; ignored until equipment is chosen
    pub fn set_assignee(&mut self, assignee: Option<Assignee>) {
        self.assignee = assignee.filter(|_| self.cascade_complete());
    }
}

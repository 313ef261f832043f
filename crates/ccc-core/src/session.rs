//! Form session
//!
//! Owns the selection for one user session together with the values that
//! are refreshed asynchronously (share URL, assignee list) and the single
//! user-placed map pin. All state changes go through [`Session::dispatch`]
//! or the `begin_*`/`complete_*` pairs.

use crate::capability::MapWidget;
use crate::error::{EncodingError, LocationError, ValidationError};
use crate::marker::Marker;
use crate::selection::{derive_options, reduce, Action, Selection};
use crate::sequence::{Completion, Latest, Ticket};
use crate::share::{ShareEncoder, ShareParams};
use crate::summary::SummaryTable;
use crate::types::{Assignee, Location};
use ccc_catalog::{CascadeLevel, Catalog, CatalogEntry};

/// Per-user form state
#[derive(Debug)]
pub struct Session<'c> {
    catalog: &'c Catalog,
    selection: Selection,
    share_url: Latest<String>,
    assignees: Latest<Vec<Assignee>>,
}

impl<'c> Session<'c> {
    /// Start an empty session over `catalog`
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
            share_url: Latest::default(),
            assignees: Latest::default(),
        }
    }

    /// Catalog in use
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Apply a user action
    ///
    /// Returns `true` when the share-URL payload changed. The previous URL
    /// is discarded and must be regenerated.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        let before = ShareParams::from_selection(&self.selection);
        self.selection = reduce(std::mem::take(&mut self.selection), action, self.catalog);
        let changed =
            action.affects_share_params() && ShareParams::from_selection(&self.selection) != before;
        if changed {
            if self.share_url.get().is_some() {
                tracing::debug!("share url outdated");
            }
            self.share_url.invalidate();
        }
        changed
    }

    /// Options for `level` under the current selection
    #[must_use]
    pub fn options(&self, level: CascadeLevel) -> &'c [CatalogEntry] {
        derive_options(level, &self.selection, self.catalog)
    }

    /// Share record for the current selection
    #[must_use]
    pub fn share_params(&self) -> ShareParams {
        ShareParams::from_selection(&self.selection)
    }

    /// Most recently applied share URL
    #[must_use]
    pub fn share_url(&self) -> Option<&str> {
        self.share_url.get().map(String::as_str)
    }

    /// Start regenerating the share URL
    pub fn begin_share_url(&mut self) -> (Ticket, ShareParams) {
        (self.share_url.begin(), self.share_params())
    }

    /// Deliver a generated share URL
    ///
    /// Stale tickets are dropped whatever the result.
    ///
    /// # Errors
    /// Propagates the encoding failure of a current request.
    pub fn complete_share_url(
        &mut self,
        ticket: Ticket,
        result: Result<String, EncodingError>,
    ) -> Result<Completion, EncodingError> {
        if !self.share_url.is_current(ticket) {
            return Ok(Completion::Stale);
        }
        Ok(self.share_url.complete(ticket, result?))
    }

    /// Regenerate the share URL synchronously
    ///
    /// # Errors
    /// [`EncodingError`] from the encoder.
    pub fn refresh_share_url(&mut self, encoder: &ShareEncoder) -> Result<&str, EncodingError> {
        let (ticket, params) = self.begin_share_url();
        let result = encoder.encode_params(&params);
        self.complete_share_url(ticket, result)?;
        Ok(self.share_url().unwrap_or_default())
    }

    /// Assignees from the most recent fetch
    #[must_use]
    pub fn assignees(&self) -> &[Assignee] {
        self.assignees.get().map_or(&[][..], Vec::as_slice)
    }

    /// Start an assignee fetch
    pub fn begin_assignee_fetch(&mut self) -> Ticket {
        self.assignees.begin()
    }

    /// Deliver an assignee fetch result
    ///
    /// # Errors
    /// Propagates the fetch failure of a current request.
    pub fn complete_assignee_fetch<E>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Assignee>, E>,
    ) -> Result<Completion, E> {
        if !self.assignees.is_current(ticket) {
            return Ok(Completion::Stale);
        }
        let list = result?;
        tracing::debug!(count = list.len(), "assignees loaded");
        Ok(self.assignees.complete(ticket, list))
    }

    /// Pick an assignee by id from the loaded list
    ///
    /// Unknown ids clear the assignee, as does an incomplete cascade.
    pub fn select_assignee(&mut self, id: Option<&str>) {
        let assignee = id.and_then(|id| self.assignees().iter().find(|a| a.id == id).cloned());
        self.dispatch(&Action::SetAssignee(assignee));
    }

    /// Put the map in its initial state
    pub fn init_map(&self, map: &mut dyn MapWidget, center: Location, zoom: f64) {
        map.center_on(center, zoom);
        map.show_user_location(center);
    }

    /// Handle a click on the map
    ///
    /// Replaces any previous pin so exactly one user pin exists.
    ///
    /// # Errors
    /// [`LocationError`] for coordinates outside the valid range; the
    /// previous location is kept.
    pub fn handle_map_click(
        &mut self,
        map: &mut dyn MapWidget,
        lat: f64,
        lng: f64,
    ) -> Result<Location, LocationError> {
        let location = Location::new(lat, lng)?;

        if self.selection.location().is_some() {
            map.remove_marker();
        }
        map.place_marker(location);
        self.dispatch(&Action::SetLocation(Some(location)));

        if let Some(op) = self.selection.get(CascadeLevel::Operation) {
            let outside = self
                .catalog
                .site_bounds(op)
                .is_some_and(|b| b.is_known() && !b.contains(lat, lng));
            if outside {
                tracing::warn!(operation = op, %location, "location is outside the operation site");
            }
        }
        Ok(location)
    }

    /// Clear the picked location and its pin
    pub fn clear_location(&mut self, map: &mut dyn MapWidget) {
        if self.selection.location().is_some() {
            map.remove_marker();
        }
        self.dispatch(&Action::SetLocation(None));
    }

    /// Summary table for the current selection
    #[must_use]
    pub fn summary(&self) -> SummaryTable {
        SummaryTable::from_selection(&self.selection, self.catalog)
    }

    /// Build the marker for submission from the current state
    ///
    /// # Errors
    /// [`ValidationError`] naming every missing field.
    pub fn marker(&self) -> Result<Marker, ValidationError> {
        Marker::from_selection(
            &self.selection,
            self.catalog,
            self.share_url().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormType;
    use ccc_catalog::builtin;

    #[test]
    fn dispatch_reports_share_changes() {
        let mut s = Session::new(builtin());
        assert!(s.dispatch(&Action::level(CascadeLevel::Operation, "NMKM")));
        assert!(!s.dispatch(&Action::level(CascadeLevel::Operation, "NMKM")));
        assert!(!s.dispatch(&Action::SetFormType(Some(FormType::Ccc))));
        assert!(!s.dispatch(&Action::level(CascadeLevel::ControlFramework, "bogus")));
    }

    #[test]
    fn stale_share_url_is_ignored() {
        let mut s = Session::new(builtin());
        let encoder = ShareEncoder::new("http://x/");

        let (old, old_params) = s.begin_share_url();
        s.dispatch(&Action::level(CascadeLevel::Operation, "CNM"));
        let (new, new_params) = s.begin_share_url();

        let fresh = encoder.encode_params(&new_params).unwrap();
        assert_eq!(s.complete_share_url(new, Ok(fresh.clone())).unwrap(), Completion::Applied);
        let late = encoder.encode_params(&old_params);
        assert_eq!(s.complete_share_url(old, late).unwrap(), Completion::Stale);
        assert_eq!(s.share_url(), Some(fresh.as_str()));
    }

    #[test]
    fn stale_assignee_failure_is_ignored() {
        let mut s = Session::new(builtin());
        let old = s.begin_assignee_fetch();
        let new = s.begin_assignee_fetch();
        let done: Result<_, String> = Ok(vec![Assignee::new("u1", "Ada")]);
        assert_eq!(s.complete_assignee_fetch(new, done).unwrap(), Completion::Applied);
        let failed: Result<Vec<Assignee>, String> = Err("offline".into());
        assert_eq!(s.complete_assignee_fetch(old, failed).unwrap(), Completion::Stale);
        assert_eq!(s.assignees().len(), 1);
    }

    #[test]
    fn unrelated_changes_keep_url() {
        let mut s = Session::new(builtin());
        s.dispatch(&Action::level(CascadeLevel::Operation, "NMKM"));
        let url = s.refresh_share_url(&ShareEncoder::new("http://x/")).unwrap().to_string();
        assert!(!s.dispatch(&Action::SetFormType(Some(FormType::Fcc))));
        assert!(!s.dispatch(&Action::level(CascadeLevel::Operation, "NMKM")));
        assert_eq!(s.share_url(), Some(url.as_str()));
    }

    #[test]
    fn change_during_refresh_drops_result() {
        let mut s = Session::new(builtin());
        let encoder = ShareEncoder::new("http://x/");
        let (ticket, params) = s.begin_share_url();
        s.dispatch(&Action::level(CascadeLevel::Operation, "CNM"));
        let late = encoder.encode_params(&params);
        assert_eq!(s.complete_share_url(ticket, late).unwrap(), Completion::Stale);
        assert_eq!(s.share_url(), None);
    }

    #[test]
    fn assignee_selection_uses_loaded_list() {
        let mut s = Session::new(builtin());
        for action in [
            Action::level(CascadeLevel::Operation, "NPI"),
            Action::level(CascadeLevel::Control, "60000000"),
            Action::level(CascadeLevel::ControlFramework, "62000000"),
            Action::level(CascadeLevel::OperatingContext, "62100000"),
            Action::level(CascadeLevel::Equipment, "62120000"),
        ] {
            s.dispatch(&action);
        }
        let t = s.begin_assignee_fetch();
        s.complete_assignee_fetch::<String>(t, Ok(vec![Assignee::new("u9", "Nine")]))
            .unwrap();

        s.select_assignee(Some("u9"));
        assert_eq!(s.selection().assignee().map(|a| a.display_name.as_str()), Some("Nine"));
        s.select_assignee(Some("ghost"));
        assert_eq!(s.selection().assignee(), None);
    }
}

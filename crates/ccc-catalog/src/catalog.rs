//! Catalog types and builder
//!
//! The catalog is a nested lookup table. Operations and controls are flat
//! lists; frameworks, operating contexts and equipment are keyed by the id
//! of the entry one level up. Entry order is insertion order and is what
//! the option lists present.

use crate::error::CatalogError;
use crate::level::CascadeLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A selectable id with its human-readable label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identifier, unique within its parent scope
    pub id: String,
    /// Label shown to users and written to markers
    pub label: String,
}

impl CatalogEntry {
    /// Create new entry
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Dropdown text, `"<id> - <label>"`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} - {}", self.id, self.label)
    }
}

/// Geographic rectangle of an operation site
///
/// Corners are `(lng, lat)` pairs. An all-zero rectangle means the bounds
/// have not been surveyed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteBounds {
    /// South-west corner `(lng, lat)`
    pub south_west: (f64, f64),
    /// North-east corner `(lng, lat)`
    pub north_east: (f64, f64),
}

impl SiteBounds {
    /// Create bounds from two `(lng, lat)` corners
    #[inline]
    #[must_use]
    pub fn new(south_west: (f64, f64), north_east: (f64, f64)) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Bounds with no surveyed extent
    #[inline]
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether the rectangle carries real coordinates
    #[must_use]
    pub fn is_known(&self) -> bool {
        *self != Self::unknown()
    }

    /// Whether a point lies inside the rectangle (edges inclusive)
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        let (min_lng, max_lng) = ordered(self.south_west.0, self.north_east.0);
        let (min_lat, max_lat) = ordered(self.south_west.1, self.north_east.1);
        (min_lng..=max_lng).contains(&lng) && (min_lat..=max_lat).contains(&lat)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The static nested lookup table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operations: Vec<CatalogEntry>,
    site_bounds: IndexMap<String, SiteBounds>,
    controls: Vec<CatalogEntry>,
    control_icons: IndexMap<String, String>,
    frameworks: IndexMap<String, Vec<CatalogEntry>>,
    contexts: IndexMap<String, Vec<CatalogEntry>>,
    equipment: IndexMap<String, Vec<CatalogEntry>>,
    lead_observers: Vec<CatalogEntry>,
}

impl Catalog {
    /// Start building a catalog
    #[inline]
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Entries available at `level` when the level above is set to `parent`
    ///
    /// `Operation` ignores `parent`. `Control` entries are shared by every
    /// operation but still require `parent` to name a known operation.
    /// Unset or unknown parents yield an empty slice.
    #[must_use]
    pub fn options_under(&self, level: CascadeLevel, parent: Option<&str>) -> &[CatalogEntry] {
        match level {
            CascadeLevel::Operation => self.operations.as_slice(),
            CascadeLevel::Control => match parent {
                Some(op) if find(&self.operations, op).is_some() => self.controls.as_slice(),
                _ => &[][..],
            },
            CascadeLevel::ControlFramework
            | CascadeLevel::OperatingContext
            | CascadeLevel::Equipment => parent
                .and_then(|p| self.scoped(level).get(p))
                .map_or(&[][..], Vec::as_slice),
        }
    }

    /// Look up one entry within its parent scope
    #[must_use]
    pub fn entry(
        &self,
        level: CascadeLevel,
        parent: Option<&str>,
        id: &str,
    ) -> Option<&CatalogEntry> {
        find(self.options_under(level, parent), id)
    }

    /// Label of one entry within its parent scope
    #[must_use]
    pub fn label(&self, level: CascadeLevel, parent: Option<&str>, id: &str) -> Option<&str> {
        self.entry(level, parent, id).map(|e| e.label.as_str())
    }

    /// Surveyed bounds of an operation site
    #[must_use]
    pub fn site_bounds(&self, operation: &str) -> Option<SiteBounds> {
        self.site_bounds.get(operation).copied()
    }

    /// Icon name of a control
    #[must_use]
    pub fn control_icon(&self, control: &str) -> Option<&str> {
        self.control_icons.get(control).map(String::as_str)
    }

    /// Lead observers, in catalog order
    #[inline]
    #[must_use]
    pub fn lead_observers(&self) -> &[CatalogEntry] {
        &self.lead_observers
    }

    /// Name of a lead observer
    #[must_use]
    pub fn lead_observer(&self, id: &str) -> Option<&str> {
        find(&self.lead_observers, id).map(|e| e.label.as_str())
    }

    /// Total number of entries across every level
    #[must_use]
    pub fn len(&self) -> usize {
        let nested = |m: &IndexMap<String, Vec<CatalogEntry>>| m.values().map(Vec::len).sum::<usize>();
        self.operations.len()
            + self.controls.len()
            + nested(&self.frameworks)
            + nested(&self.contexts)
            + nested(&self.equipment)
    }

    /// Whether the catalog has no operations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn scoped(&self, level: CascadeLevel) -> &IndexMap<String, Vec<CatalogEntry>> {
        match level {
            CascadeLevel::ControlFramework => &self.frameworks,
            CascadeLevel::OperatingContext => &self.contexts,
            _ => &self.equipment,
        }
    }
}

fn find<'a>(entries: &'a [CatalogEntry], id: &str) -> Option<&'a CatalogEntry> {
    entries.iter().find(|e| e.id == id)
}

/// Incremental catalog construction
///
/// Integrity is checked once, in [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Add an operation site
    #[must_use]
    pub fn operation(mut self, id: &str, site: &str, bounds: SiteBounds) -> Self {
        self.catalog.operations.push(CatalogEntry::new(id, site));
        self.catalog.site_bounds.insert(id.to_string(), bounds);
        self
    }

    /// Add a control
    #[must_use]
    pub fn control(mut self, id: &str, label: &str, icon: &str) -> Self {
        self.catalog.controls.push(CatalogEntry::new(id, label));
        self.catalog
            .control_icons
            .insert(id.to_string(), icon.to_string());
        self
    }

    /// Add a control framework under `control`
    #[must_use]
    pub fn framework(mut self, control: &str, id: &str, label: &str) -> Self {
        push_scoped(&mut self.catalog.frameworks, control, id, label);
        self
    }

    /// Add an operating context under `framework`
    #[must_use]
    pub fn context(mut self, framework: &str, id: &str, label: &str) -> Self {
        push_scoped(&mut self.catalog.contexts, framework, id, label);
        self
    }

    /// Add an equipment item under `context`
    #[must_use]
    pub fn equipment(mut self, context: &str, id: &str, label: &str) -> Self {
        push_scoped(&mut self.catalog.equipment, context, id, label);
        self
    }

    /// Add a lead observer
    #[must_use]
    pub fn lead_observer(mut self, id: &str, name: &str) -> Self {
        self.catalog.lead_observers.push(CatalogEntry::new(id, name));
        self
    }

    /// Validate and finish
    ///
    /// # Errors
    /// [`CatalogError::DuplicateId`] when an id repeats within one scope,
    /// [`CatalogError::UnknownParent`] when a scoped entry names a parent
    /// that does not exist one level up.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let c = self.catalog;

        check_unique(CascadeLevel::Operation, None, &c.operations)?;
        check_unique(CascadeLevel::Control, None, &c.controls)?;

        let all_ids = |m: &IndexMap<String, Vec<CatalogEntry>>| -> HashSet<String> {
            m.values().flatten().map(|e| e.id.clone()).collect()
        };
        let control_ids: HashSet<String> = c.controls.iter().map(|e| e.id.clone()).collect();
        let framework_ids = all_ids(&c.frameworks);
        let context_ids = all_ids(&c.contexts);

        for (level, scoped, parents) in [
            (CascadeLevel::ControlFramework, &c.frameworks, &control_ids),
            (CascadeLevel::OperatingContext, &c.contexts, &framework_ids),
            (CascadeLevel::Equipment, &c.equipment, &context_ids),
        ] {
            for (parent, entries) in scoped {
                if !parents.contains(parent) {
                    return Err(CatalogError::UnknownParent {
                        level,
                        parent: parent.clone(),
                    });
                }
                check_unique(level, Some(parent), entries)?;
            }
        }

        let mut observers = HashSet::with_capacity(c.lead_observers.len());
        for observer in &c.lead_observers {
            if !observers.insert(observer.id.as_str()) {
                return Err(CatalogError::DuplicateObserver(observer.id.clone()));
            }
        }

        Ok(c)
    }
}

fn push_scoped(
    map: &mut IndexMap<String, Vec<CatalogEntry>>,
    parent: &str,
    id: &str,
    label: &str,
) {
    map.entry(parent.to_string())
        .or_default()
        .push(CatalogEntry::new(id, label));
}

fn check_unique(
    level: CascadeLevel,
    parent: Option<&str>,
    entries: &[CatalogEntry],
) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                level,
                parent: parent.map(str::to_string),
                id: entry.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Catalog {
        Catalog::builder()
            .operation("OP", "Site", SiteBounds::unknown())
            .control("C1", "Control one", "car")
            .control("C2", "Control two", "gears")
            .framework("C1", "F1", "Framework one")
            .context("F1", "X1", "Context one")
            .equipment("X1", "E2", "Equipment two")
            .equipment("X1", "E1", "Equipment one")
            .lead_observer("L1", "Observer")
            .build()
            .unwrap()
    }

    #[test]
    fn controls_require_known_operation() {
        let c = small();
        assert_eq!(c.options_under(CascadeLevel::Control, Some("OP")).len(), 2);
        assert!(c.options_under(CascadeLevel::Control, Some("NOPE")).is_empty());
        assert!(c.options_under(CascadeLevel::Control, None).is_empty());
    }

    #[test]
    fn scoped_entries_keep_insertion_order() {
        let c = small();
        let ids: Vec<_> = c
            .options_under(CascadeLevel::Equipment, Some("X1"))
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["E2", "E1"]);
    }

    #[test]
    fn labels_resolve_within_scope() {
        let c = small();
        assert_eq!(
            c.label(CascadeLevel::ControlFramework, Some("C1"), "F1"),
            Some("Framework one")
        );
        assert_eq!(c.label(CascadeLevel::ControlFramework, Some("C2"), "F1"), None);
        assert_eq!(c.control_icon("C2"), Some("gears"));
        assert_eq!(c.lead_observer("L1"), Some("Observer"));
        assert_eq!(c.len(), 7);
    }

    #[test]
    fn rejects_duplicate_in_scope() {
        let err = Catalog::builder()
            .operation("OP", "Site", SiteBounds::unknown())
            .control("C1", "a", "car")
            .framework("C1", "F1", "x")
            .framework("C1", "F1", "y")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateId { level: CascadeLevel::ControlFramework, .. }
        ));
    }

    #[test]
    fn rejects_orphan() {
        let err = Catalog::builder()
            .control("C1", "a", "car")
            .context("F9", "X1", "x")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownParent {
                level: CascadeLevel::OperatingContext,
                parent: "F9".to_string()
            }
        );
    }

    #[test]
    fn bounds_contain_points() {
        let b = SiteBounds::new((144.98, -37.82), (144.99, -37.81));
        assert!(b.is_known());
        assert!(b.contains(-37.815, 144.985));
        assert!(!b.contains(-37.80, 144.985));
        assert!(!SiteBounds::unknown().is_known());
    }

    #[test]
    fn entry_display() {
        assert_eq!(CatalogEntry::new("NMKM", "Mt Keith").display(), "NMKM - Mt Keith");
    }
}

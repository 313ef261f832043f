use ccc_catalog::{builtin, CascadeLevel, Catalog, CatalogError, SiteBounds};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

fn leaves(catalog: &Catalog, level: CascadeLevel, parent: Option<&str>) -> usize {
    let entries = catalog.options_under(level, parent);
    match level.child() {
        None => entries.len(),
        Some(child) => entries
            .iter()
            .map(|e| {
                let below = leaves(catalog, child, Some(e.id.as_str()));
                assert!(below > 0, "{level} {} has no {child} entries", e.id);
                below
            })
            .sum(),
    }
}

#[test]
fn test_every_branch_reaches_equipment() {
    let catalog = builtin();
    assert!(leaves(catalog, CascadeLevel::Operation, None) > 0);
}

#[test]
fn test_labels_resolve_within_scope_only() {
    let catalog = builtin();
    assert_eq!(
        catalog.label(CascadeLevel::Equipment, Some("31200000"), "31140000"),
        Some("Dozers")
    );
    assert_eq!(catalog.label(CascadeLevel::Equipment, Some("31100000"), "31140000"), None);
    assert_eq!(catalog.label(CascadeLevel::Control, Some("nowhere"), "30000000"), None);
}

#[test]
fn test_builder_rejects_orphans() {
    let err = Catalog::builder()
        .operation("OP", "Site", SiteBounds::unknown())
        .control("1", "Control", "icon")
        .framework("2", "21", "Framework")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::UnknownParent {
            level: CascadeLevel::ControlFramework,
            parent: "2".into(),
        }
    );
}

#[test]
fn test_builder_allows_same_id_in_different_scopes() {
    let catalog = Catalog::builder()
        .operation("OP", "Site", SiteBounds::unknown())
        .control("1", "Control", "icon")
        .framework("1", "11", "Framework")
        .context("11", "111", "Context")
        .context("11", "112", "Context 2")
        .equipment("111", "E", "Truck")
        .equipment("112", "E", "Loader")
        .build()
        .unwrap();
    assert_eq!(catalog.label(CascadeLevel::Equipment, Some("112"), "E"), Some("Loader"));
    assert_eq!(catalog.len(), 7);
}

proptest! {
    #[test]
    fn prop_offered_entries_resolve_in_scope(picks in prop::array::uniform5(any::<Index>())) {
        let catalog = builtin();
        let mut parent: Option<String> = None;
        for (level, pick) in CascadeLevel::ALL.into_iter().zip(picks) {
            let offered = catalog.options_under(level, parent.as_deref());
            prop_assert!(!offered.is_empty(), "{} empty under {:?}", level, parent);
            for entry in offered {
                prop_assert_eq!(
                    catalog.label(level, parent.as_deref(), &entry.id),
                    Some(entry.label.as_str())
                );
            }
            parent = Some(offered[pick.index(offered.len())].id.clone());
        }
    }

    #[test]
    fn prop_unknown_parent_offers_nothing(parent in "[a-z]{1,8}") {
        let catalog = builtin();
        for level in &CascadeLevel::ALL[1..] {
            prop_assert!(catalog.options_under(*level, Some(&parent)).is_empty());
        }
    }
}

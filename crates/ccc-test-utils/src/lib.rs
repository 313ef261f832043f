//! Testing utilities for the CCC workspace
//!
//! Shared fixtures, capability fakes and proptest strategies.

#![allow(missing_docs)]

use ccc_catalog::{builtin, CascadeLevel, Catalog};
use ccc_core::{
    derive_options, reduce, Action, Assignee, CapabilityError, ExportRequest, FormType, Location, MapWidget,
    PdfExporter, QrRenderer, RasterImage, Selection, SummaryTable, TableRenderer,
};
use proptest::prelude::*;

/// Location inside the BurnsRED office bounds
pub fn office_location() -> Location {
    Location {
        lat: -37.816_276_645_870_91,
        lng: 144.985_810_447_802_9,
    }
}

/// Actions that fill every cascade level for Mt Keith
pub fn complete_cascade_actions() -> Vec<Action> {
    vec![
        Action::level(CascadeLevel::Operation, "NMKM"),
        Action::level(CascadeLevel::Control, "30000000"),
        Action::level(CascadeLevel::ControlFramework, "31000000"),
        Action::level(CascadeLevel::OperatingContext, "31200000"),
        Action::level(CascadeLevel::Equipment, "31140000"),
    ]
}

pub fn apply_all(actions: &[Action], catalog: &Catalog) -> Selection {
    actions
        .iter()
        .fold(Selection::new(), |s, a| reduce(s, a, catalog))
}

/// Selection a marker can be built from
pub fn complete_selection() -> Selection {
    let mut actions = complete_cascade_actions();
    actions.push(Action::SetFormType(Some(FormType::Ccc)));
    actions.push(Action::SetLocation(Some(office_location())));
    apply_all(&actions, builtin())
}

pub fn sample_assignees() -> Vec<Assignee> {
    vec![
        Assignee::new("u-ada", "Ada Lovelace").with_username("ada"),
        Assignee::new("u-grace", "Grace Hopper"),
    ]
}

/// Map fake that records every call
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub centered: Vec<(Location, f64)>,
    pub user_location: Option<Location>,
    pub placed: Vec<Location>,
    pub removed: usize,
}

impl RecordingMap {
    /// Pins currently on the map
    pub fn live_pins(&self) -> usize {
        self.placed.len().saturating_sub(self.removed)
    }
}

impl MapWidget for RecordingMap {
    fn center_on(&mut self, at: Location, zoom: f64) {
        self.centered.push((at, zoom));
    }

    fn show_user_location(&mut self, at: Location) {
        self.user_location = Some(at);
    }

    fn place_marker(&mut self, at: Location) {
        self.placed.push(at);
    }

    fn remove_marker(&mut self) {
        self.removed += 1;
    }
}

/// QR fake that embeds the payload as the image bytes
#[derive(Debug, Default)]
pub struct PayloadQr;

impl QrRenderer for PayloadQr {
    fn render(&self, data: &str) -> Result<RasterImage, CapabilityError> {
        Ok(RasterImage {
            width: 256,
            height: 256,
            png: data.as_bytes().to_vec(),
        })
    }
}

/// Table fake that renders the text table
#[derive(Debug, Default)]
pub struct TextTable;

impl TableRenderer for TextTable {
    fn render(&self, table: &SummaryTable) -> Result<RasterImage, CapabilityError> {
        Ok(RasterImage {
            width: 1200,
            height: 350,
            png: table.to_string().into_bytes(),
        })
    }
}

/// Exporter fake that serializes the layout and both payloads
#[derive(Debug, Default)]
pub struct LayoutPdf;

impl PdfExporter for LayoutPdf {
    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, CapabilityError> {
        let mut out = format!("%PDF {:?}\n", request.layout).into_bytes();
        out.extend_from_slice(&request.qr.png);
        out.push(b'\n');
        out.extend_from_slice(&request.summary.png);
        Ok(out)
    }
}

/// Any cascade level
pub fn arb_level() -> impl Strategy<Value = CascadeLevel> {
    prop::sample::select(CascadeLevel::ALL.to_vec())
}

/// Ids drawn from the built-in catalog plus some junk
pub fn arb_id() -> impl Strategy<Value = Option<String>> {
    let catalog = builtin();
    let mut pool: Vec<String> = Vec::new();
    for level in CascadeLevel::ALL {
        collect_ids(catalog, level, None, &mut pool);
    }
    pool.push("bogus".to_string());
    pool.push(String::new());
    prop::option::weighted(0.9, prop::sample::select(pool))
}

fn collect_ids(catalog: &Catalog, level: CascadeLevel, parent: Option<&str>, out: &mut Vec<String>) {
    if level != CascadeLevel::Operation && parent.is_none() {
        return;
    }
    for entry in catalog.options_under(level, parent) {
        if !out.contains(&entry.id) {
            out.push(entry.id.clone());
        }
        if let Some(child) = level.child() {
            collect_ids(catalog, child, Some(entry.id.as_str()), out);
        }
    }
}

/// Any user action
pub fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (arb_level(), arb_id()).prop_map(|(level, id)| Action::SetLevel { level, id }),
        1 => prop::option::of(prop::sample::select(FormType::ALL.to_vec()))
            .prop_map(Action::SetFormType),
        1 => prop::option::of(prop::sample::select(vec![
            "20000001".to_string(),
            "20000004".to_string(),
            "nobody".to_string(),
        ]))
        .prop_map(Action::SetLeadObserver),
        1 => prop::option::of(prop::sample::select(sample_assignees()))
            .prop_map(Action::SetAssignee),
        1 => prop::option::of((-90.0f64..=90.0, -180.0f64..=180.0))
            .prop_map(|p| Action::SetLocation(p.map(|(lat, lng)| Location { lat, lng }))),
    ]
}

/// Selection walked down the cascade to a random depth, picking among the
/// offered entries at each level, with random non-cascade fields on top
pub fn arb_selection() -> impl Strategy<Value = Selection> {
    (
        0..=CascadeLevel::COUNT,
        prop::array::uniform5(any::<prop::sample::Index>()),
        prop::collection::vec(arb_action(), 0..4),
    )
        .prop_map(|(depth, picks, extra)| {
            let catalog = builtin();
            let mut selection = Selection::new();
            for (level, pick) in CascadeLevel::ALL.into_iter().zip(picks).take(depth) {
                let offered = derive_options(level, &selection, catalog);
                if offered.is_empty() {
                    break;
                }
                let id = offered[pick.index(offered.len())].id.clone();
                selection = reduce(selection, &Action::SetLevel { level, id: Some(id) }, catalog);
            }
            extra
                .iter()
                .filter(|a| !matches!(a, Action::SetLevel { .. }))
                .fold(selection, |s, a| reduce(s, a, catalog))
        })
}

/// Selection reached by an arbitrary action sequence, junk ids included
pub fn arb_selection_from_actions() -> impl Strategy<Value = Selection> {
    (arb_selection(), prop::collection::vec(arb_action(), 0..8))
        .prop_map(|(start, actions)| {
            actions.iter().fold(start, |s, a| reduce(s, a, builtin()))
        })
}

//! Compiled-in catalog
//!
//! Site, control and equipment data for the CCC marker tool. Built once on
//! first access.

use crate::catalog::{Catalog, CatalogBuilder, SiteBounds};
use once_cell::sync::Lazy;

type Corner = (f64, f64);

const OPERATIONS: &[(&str, &str, Corner, Corner)] = &[
    ("NMKM", "Mt Keith", (0.0, 0.0), (0.0, 0.0)),
    ("CNM", "Cliffs", (0.0, 0.0), (0.0, 0.0)),
    ("NLNM", "Leinster", (0.0, 0.0), (0.0, 0.0)),
    ("NPI", "Non-Process Infrastructure", (0.0, 0.0), (0.0, 0.0)),
    (
        "BRO",
        "BurnsRED Office",
        (144.981_765_699_195_08, -37.818_534_455_210_106),
        (144.990_877_722_206_1, -37.811_264_469_979_434),
    ),
    (
        "WFH",
        "BurnsRED WFH Office",
        (144.894_927_451_105_4, -37.764_818_823_135_53),
        (144.907_305, -37.755_989),
    ),
];

const LEAD_OBSERVERS: &[(&str, &str)] = &[
    ("20000001", "Justin Chancellor"),
    ("20000002", "Daniel Carey"),
    ("20000003", "Maynard James"),
    ("20000004", "Adam Jones"),
];

const CONTROLS: &[(&str, &str, &str)] = &[
    ("30000000", "Vehicle and Mobile Equipment", "car"),
    ("40000000", "Rail", "train-subway"),
    ("50000000", "Lifting", "square-caret-up"),
    ("60000000", "Electrical", "bolt-lightning"),
    ("70000000", "Falling object", "arrows-down-to-line"),
    ("80000000", "Crushing", "gears"),
    ("90000000", "Mat. Moving", "arrows-turn-to-dots"),
];

const FRAMEWORKS: &[(&str, &[(&str, &str)])] = &[
    (
        "30000000",
        &[
            ("31000000", "Crash, Collision, Overturn on Mine Site"),
            ("32000000", "Pre-start Inspections"),
            ("33000000", "Use mobile plant"),
            ("34000000", "General Safety Rules for Operator"),
            ("35000000", "Warning Signals and Reversing"),
        ],
    ),
    ("40000000", &[("41000000", "Control 1"), ("42000000", "Control 2")]),
    ("50000000", &[("51000000", "Control 1"), ("52000000", "Control 2")]),
    ("60000000", &[("61000000", "Control 1"), ("62000000", "Control 2")]),
    ("70000000", &[("71000000", "Control 1"), ("72000000", "Control 2")]),
    ("80000000", &[("81000000", "Control 1"), ("82000000", "Control 2")]),
    ("90000000", &[("91000000", "Control 1"), ("92000000", "Control 2")]),
];

/// Frameworks whose operating contexts are the two generic placeholders
const GENERIC_CONTEXT_PARENTS: &[&str] = &[
    "32000000", "33000000", "34000000", "35000000", "41000000", "42000000", "51000000",
    "52000000", "61000000", "62000000", "71000000", "72000000", "81000000", "82000000",
    "91000000", "92000000",
];

const CRASH_CONTEXTS: &[(&str, &str)] = &[
    ("31100000", "Underground"),
    ("31200000", "Surface"),
    ("31300000", "Onsite non-Mining"),
    ("31400000", "Offsite"),
];

const EQUIPMENT: &[(&str, &[(&str, &str)])] = &[
    (
        "31200000",
        &[
            ("31110000", "Off-highway Truck"),
            ("31120000", "Wheel Loaders"),
            ("31130000", "Rubber Tyred SME"),
            ("31140000", "Dozers"),
            ("31150000", "Drills and tracked SME"),
            ("31160000", "Excavators/ Shovels"),
            ("31170000", "Off-highway haulers"),
        ],
    ),
    (
        "31100000",
        &[
            ("31210000", "UG ME"),
            ("31220000", "UG Loaders, bogger"),
            ("31230000", "UG shuttle cars, miners"),
        ],
    ),
    (
        "31300000",
        &[
            ("31310000", "Off-highway Truck"),
            ("31320000", "Wheel Loaders"),
            ("31330000", "Rubber Tyred SME"),
            ("31340000", "Dozers"),
        ],
    ),
    (
        "31400000",
        &[
            ("31410000", "Off-highway Truck"),
            ("31420000", "Wheel Loaders"),
            ("31430000", "Rubber Tyred SME"),
            ("31440000", "Dozers"),
        ],
    ),
    ("32100000", &[("32111000", "Off-highway Truck"), ("32120000", "Wheel Loaders")]),
    ("32200000", &[("32210000", "Off-highway Truck"), ("32220000", "Wheel Loaders")]),
    ("33100000", &[("33110000", "Off-highway Truck"), ("33120000", "Wheel Loaders")]),
    ("33200000", &[("33210000", "Off-highway Truck"), ("33220000", "Wheel Loaders")]),
    ("34100000", &[("34110000", "Off-highway Truck"), ("34120000", "Wheel Loaders")]),
    ("34200000", &[("34210000", "Off-highway Truck"), ("34220000", "Wheel Loaders")]),
    ("35100000", &[("35110000", "Off-highway Truck"), ("35120000", "Wheel Loaders")]),
    ("35200000", &[("35210000", "Off-highway Truck"), ("35220000", "Wheel Loaders")]),
];

/// Operating contexts from `41000000` onward carry numbered placeholder
/// equipment; their ids follow the `<context prefix><n>0000` pattern.
const PLACEHOLDER_EQUIPMENT_FROM: &str = "41000000";

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    tables()
        .build()
        .expect("built-in catalog tables are consistent")
});

/// The compiled-in catalog
#[must_use]
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

fn tables() -> CatalogBuilder {
    let mut b = Catalog::builder();

    for &(id, site, sw, ne) in OPERATIONS {
        b = b.operation(id, site, SiteBounds::new(sw, ne));
    }
    for &(id, name) in LEAD_OBSERVERS {
        b = b.lead_observer(id, name);
    }
    for &(id, label, icon) in CONTROLS {
        b = b.control(id, label, icon);
    }
    for &(control, frameworks) in FRAMEWORKS {
        for &(id, label) in frameworks {
            b = b.framework(control, id, label);
        }
    }

    for &(id, label) in CRASH_CONTEXTS {
        b = b.context("31000000", id, label);
    }
    for &framework in GENERIC_CONTEXT_PARENTS {
        let prefix = &framework[..2];
        for n in 1..=2 {
            b = b.context(
                framework,
                &format!("{prefix}{n}00000"),
                &format!("Operating Context {n}"),
            );
        }
    }

    for &(context, items) in EQUIPMENT {
        for &(id, label) in items {
            b = b.equipment(context, id, label);
        }
    }
    for &framework in GENERIC_CONTEXT_PARENTS
        .iter()
        .filter(|f| **f >= PLACEHOLDER_EQUIPMENT_FROM)
    {
        let prefix = &framework[..2];
        for ctx in 1..=2 {
            let context = format!("{prefix}{ctx}00000");
            for n in 1..=2 {
                b = b.equipment(
                    &context,
                    &format!("{prefix}{ctx}{n}0000"),
                    &format!("Equipment Item {n}"),
                );
            }
        }
    }

    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CascadeLevel;

    fn ids(entries: &[crate::CatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn tables_build() {
        assert!(tables().build().is_ok());
    }

    #[test]
    fn operations_in_declared_order() {
        assert_eq!(
            ids(builtin().options_under(CascadeLevel::Operation, None)),
            ["NMKM", "CNM", "NLNM", "NPI", "BRO", "WFH"]
        );
    }

    #[test]
    fn crash_framework_contexts() {
        let contexts = builtin().options_under(CascadeLevel::OperatingContext, Some("31000000"));
        assert_eq!(contexts.len(), 4);
        assert_eq!(contexts[0].label, "Underground");
    }

    #[test]
    fn generic_contexts_and_equipment() {
        let c = builtin();
        assert_eq!(
            ids(c.options_under(CascadeLevel::OperatingContext, Some("92000000"))),
            ["92100000", "92200000"]
        );
        assert_eq!(
            ids(c.options_under(CascadeLevel::Equipment, Some("92200000"))),
            ["92210000", "92220000"]
        );
        assert_eq!(
            c.label(CascadeLevel::Equipment, Some("41100000"), "41120000"),
            Some("Equipment Item 2")
        );
        assert_eq!(
            c.label(CascadeLevel::Equipment, Some("32100000"), "32111000"),
            Some("Off-highway Truck")
        );
    }

    #[test]
    fn surveyed_bounds() {
        let c = builtin();
        assert!(!c.site_bounds("NMKM").unwrap().is_known());
        let bro = c.site_bounds("BRO").unwrap();
        assert!(bro.contains(-37.816_276_645_870_91, 144.985_810_447_802_9));
    }

    #[test]
    fn observers_and_icons() {
        let c = builtin();
        assert_eq!(c.lead_observers().len(), 4);
        assert_eq!(c.lead_observer("20000003"), Some("Maynard James"));
        assert_eq!(c.control_icon("40000000"), Some("train-subway"));
    }
}

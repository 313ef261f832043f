//! Summary table shown next to the QR code and composited into the PDF

use crate::selection::Selection;
use ccc_catalog::{CascadeLevel, Catalog};
use serde::Serialize;
use std::fmt;

/// One parameter/value row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Row heading
    pub parameter: &'static str,
    /// Resolved label, empty when unset
    pub value: Option<String>,
}

/// Parameter summary of a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    /// Rows in display order
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Resolve labels for every cascade level plus the location
    #[must_use]
    pub fn from_selection(selection: &Selection, catalog: &Catalog) -> Self {
        let mut rows: Vec<SummaryRow> = CascadeLevel::ALL
            .into_iter()
            .map(|level| SummaryRow {
                parameter: level.title(),
                value: selection.label(level, catalog).map(str::to_string),
            })
            .collect();
        rows.push(SummaryRow {
            parameter: "Location",
            value: selection.location().map(|loc| loc.to_string()),
        });
        Self { rows }
    }

    /// Value of the row titled `parameter`
    #[must_use]
    pub fn value(&self, parameter: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.parameter == parameter)
            .and_then(|row| row.value.as_deref())
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|row| row.parameter.len())
            .max()
            .unwrap_or(0)
            .max("Parameter".len());
        writeln!(f, "{:<width$}  Value", "Parameter")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<width$}  {}",
                row.parameter,
                row.value.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{reduce, Action};
    use crate::types::Location;
    use ccc_catalog::builtin;

    #[test]
    fn partial_selection_leaves_blanks() {
        let c = builtin();
        let s = reduce(Selection::new(), &Action::level(CascadeLevel::Operation, "WFH"), c);
        let s = reduce(
            s,
            &Action::SetLocation(Some(Location::new(-37.76, 144.9).unwrap())),
            c,
        );
        let table = SummaryTable::from_selection(&s, c);

        assert_eq!(table.rows.len(), 6);
        assert_eq!(table.value("Operation"), Some("BurnsRED WFH Office"));
        assert_eq!(table.value("Control"), None);
        assert_eq!(table.value("Location"), Some("-37.76, 144.9"));
    }

    #[test]
    fn renders_two_columns() {
        let table = SummaryTable::from_selection(&Selection::new(), builtin());
        let text = table.to_string();
        assert!(text.starts_with("Parameter          Value\n"));
        assert!(text.contains("Operating Context"));
    }
}

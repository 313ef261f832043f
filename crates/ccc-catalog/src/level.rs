//! Cascade levels
//!
//! The fixed chain `Operation → Control → ControlFramework →
//! OperatingContext → Equipment`. Every level except the first is scoped by
//! the selection one step shallower.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One stage in the cascading selection chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeLevel {
    /// Operation site (`NMKM`, `CNM`, ...)
    Operation,
    /// Critical control (`30000000`, ...)
    Control,
    /// Control framework, scoped by control
    ControlFramework,
    /// Operating context, scoped by control framework
    OperatingContext,
    /// Equipment, scoped by operating context
    Equipment,
}

impl CascadeLevel {
    /// Number of cascade levels
    pub const COUNT: usize = 5;

    /// All levels, shallowest first
    pub const ALL: [CascadeLevel; Self::COUNT] = [
        CascadeLevel::Operation,
        CascadeLevel::Control,
        CascadeLevel::ControlFramework,
        CascadeLevel::OperatingContext,
        CascadeLevel::Equipment,
    ];

    /// Zero-based depth in the cascade
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            CascadeLevel::Operation => 0,
            CascadeLevel::Control => 1,
            CascadeLevel::ControlFramework => 2,
            CascadeLevel::OperatingContext => 3,
            CascadeLevel::Equipment => 4,
        }
    }

    /// Level that scopes this one, `None` for [`CascadeLevel::Operation`]
    #[inline]
    #[must_use]
    pub fn parent(self) -> Option<CascadeLevel> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Next level down, `None` for [`CascadeLevel::Equipment`]
    #[inline]
    #[must_use]
    pub fn child(self) -> Option<CascadeLevel> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Every level strictly deeper than this one, shallowest first
    #[must_use]
    pub fn deeper(self) -> &'static [CascadeLevel] {
        &Self::ALL[self.index() + 1..]
    }

    /// Stable kebab-case name used on the command line and in logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CascadeLevel::Operation => "operation",
            CascadeLevel::Control => "control",
            CascadeLevel::ControlFramework => "control-framework",
            CascadeLevel::OperatingContext => "operating-context",
            CascadeLevel::Equipment => "equipment",
        }
    }

    /// Human-readable heading, as shown in the summary table
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            CascadeLevel::Operation => "Operation",
            CascadeLevel::Control => "Control",
            CascadeLevel::ControlFramework => "Control Framework",
            CascadeLevel::OperatingContext => "Operating Context",
            CascadeLevel::Equipment => "Equipment",
        }
    }
}

impl fmt::Display for CascadeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown cascade level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cascade level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for CascadeLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_total_and_fixed() {
        for pair in CascadeLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].child(), Some(pair[1]));
            assert_eq!(pair[1].parent(), Some(pair[0]));
        }
        assert_eq!(CascadeLevel::Operation.parent(), None);
        assert_eq!(CascadeLevel::Equipment.child(), None);
    }

    #[test]
    fn deeper_excludes_self() {
        assert_eq!(
            CascadeLevel::Control.deeper(),
            &[
                CascadeLevel::ControlFramework,
                CascadeLevel::OperatingContext,
                CascadeLevel::Equipment
            ]
        );
        assert!(CascadeLevel::Equipment.deeper().is_empty());
    }

    #[test]
    fn parses_names() {
        assert_eq!(
            "operating-context".parse::<CascadeLevel>().unwrap(),
            CascadeLevel::OperatingContext
        );
        assert_eq!(" Control ".parse::<CascadeLevel>().unwrap(), CascadeLevel::Control);
        assert!("site".parse::<CascadeLevel>().is_err());
    }
}

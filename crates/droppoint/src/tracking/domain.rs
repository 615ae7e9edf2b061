use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default category tag assigned to drop points created without one.
pub const DEFAULT_CATEGORY: &str = "bottle";

/// A tracked collection station, identified by a permanent number.
///
/// Numbers are assigned once and never reused, even after removal; a
/// removed drop point keeps its full history but drops out of the active
/// set. The category is an opaque tag ("bottle", "trashcan", ...) used
/// only for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPoint {
    pub number: u32,
    pub category: String,
    pub created: DateTime<Utc>,
    pub removed: Option<DateTime<Utc>>,
}

impl DropPoint {
    pub fn is_removed(&self) -> bool {
        self.removed.is_some()
    }
}

/// A point-in-time placement of a drop point.
///
/// Placements are appended over time to represent relocation; the current
/// location is the latest entry. Coordinates and level are optional since
/// some venues only describe placements in prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub level: Option<i32>,
    pub time: DateTime<Utc>,
}

/// A human-submitted observation of a drop point's fill condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub status: FillStatus,
    pub time: DateTime<Utc>,
}

/// A record of a collector physically attending a drop point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub action: VisitAction,
    pub time: DateTime<Utc>,
}

/// Fill condition of a drop point as observed in reports.
///
/// The middle variants form a severity ladder from `NoCrates` up to
/// `Overflowing`. `Unknown` is a placeholder carrying no information,
/// `New` is the resting state of a freshly tracked drop point, and
/// `Emptied` is the clean state reached right after servicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStatus {
    Unknown,
    New,
    NoCrates,
    SomeBottles,
    ReasonablyFull,
    Full,
    Overflowing,
    Emptied,
}

impl FillStatus {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Unknown,
            Self::New,
            Self::NoCrates,
            Self::SomeBottles,
            Self::ReasonablyFull,
            Self::Full,
            Self::Overflowing,
            Self::Emptied,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::New => "New",
            Self::NoCrates => "No Crates",
            Self::SomeBottles => "Some Bottles",
            Self::ReasonablyFull => "Reasonably Full",
            Self::Full => "Full",
            Self::Overflowing => "Overflowing",
            Self::Emptied => "Emptied",
        }
    }
}

/// What a collector did during a visit.
///
/// Only `Emptied` changes the fill status of the drop point; the other
/// actions are logged for the audit timeline but leave the last reported
/// condition standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitAction {
    Emptied,
    CratesAdded,
    CratesRemoved,
    Relocated,
    NoAction,
}

impl VisitAction {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Emptied,
            Self::CratesAdded,
            Self::CratesRemoved,
            Self::Relocated,
            Self::NoAction,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Emptied => "Emptied",
            Self::CratesAdded => "Crates Added",
            Self::CratesRemoved => "Crates Removed",
            Self::Relocated => "Relocated",
            Self::NoAction => "No Action",
        }
    }

    pub fn empties(self) -> bool {
        self == Self::Emptied
    }
}

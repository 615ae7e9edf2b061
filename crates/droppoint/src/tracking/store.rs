use chrono::{DateTime, Utc};

use super::domain::{DropPoint, Location, Report, Visit};
use super::history::DropPointHistory;

/// Storage abstraction the tracking engine reads through.
///
/// Implementations own persistence and concurrency control; the engine
/// only ever sees owned [`DropPointHistory`] snapshots, so every
/// computation observes one consistent view per call. Histories are
/// append-only: reports, visits, and placements are added and never
/// edited, and marking a drop point removed is the only mutation to the
/// drop point itself.
pub trait DropPointStore: Send + Sync {
    /// Inserts a new drop point together with its initial placement.
    ///
    /// Fails with [`StoreError::Conflict`] when the number is taken.
    fn insert(&self, drop_point: DropPoint, initial_location: Location)
        -> Result<(), StoreError>;

    /// Marks an existing drop point as removed.
    fn mark_removed(&self, number: u32, removed: DateTime<Utc>) -> Result<(), StoreError>;

    fn append_report(&self, number: u32, report: Report) -> Result<(), StoreError>;

    fn append_visit(&self, number: u32, visit: Visit) -> Result<(), StoreError>;

    fn append_location(&self, number: u32, location: Location) -> Result<(), StoreError>;

    /// Snapshot of one drop point, or `None` for an unknown number.
    fn history(&self, number: u32) -> Result<Option<DropPointHistory>, StoreError>;

    /// Snapshots of every drop point, removed ones included.
    fn histories(&self) -> Result<Vec<DropPointHistory>, StoreError>;

    /// Lowest number greater than every number ever assigned.
    ///
    /// Removed drop points still occupy their number; numbers are never
    /// reused.
    fn next_free_number(&self) -> Result<u32, StoreError>;
}

/// Failures surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("drop point number already taken")]
    Conflict,
    #[error("no such drop point")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

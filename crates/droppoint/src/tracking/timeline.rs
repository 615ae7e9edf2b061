use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Location, Report, Visit};
use super::history::DropPointHistory;

/// One entry in a drop point's merged audit timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    Created { time: DateTime<Utc> },
    Relocated { location: Location },
    Reported { report: Report },
    Visited { visit: Visit },
    Removed { time: DateTime<Utc> },
}

impl TimelineEvent {
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Self::Created { time } | Self::Removed { time } => *time,
            Self::Relocated { location } => location.time,
            Self::Reported { report } => report.time,
            Self::Visited { visit } => visit.time,
        }
    }

    /// Rank used to order events sharing a timestamp: lifecycle-later
    /// kinds sort above lifecycle-earlier ones in the descending view,
    /// so creation always lands at the bottom even when its initial
    /// placement or a same-instant report shares its timestamp.
    fn rank(&self) -> u8 {
        match self {
            Self::Created { .. } => 0,
            Self::Relocated { .. } => 1,
            Self::Reported { .. } => 2,
            Self::Visited { .. } => 3,
            Self::Removed { .. } => 4,
        }
    }
}

/// Merges a drop point's records into one reverse-chronological timeline.
///
/// Creation, every placement, every report, every visit, and removal (if
/// present) are folded into a single sequence sorted by time descending.
/// Entries with equal timestamps are ordered deterministically: by event
/// kind rank, then by append order within a kind, so repeated projections
/// of the same snapshot always agree. This is a read-only projection for
/// audit display; it feeds neither status nor priority.
pub fn project_timeline(history: &DropPointHistory) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(
        2 + history.locations().len() + history.reports().len() + history.visits().len(),
    );

    events.push(TimelineEvent::Created {
        time: history.created(),
    });
    for location in history.locations() {
        events.push(TimelineEvent::Relocated {
            location: location.clone(),
        });
    }
    for report in history.reports() {
        events.push(TimelineEvent::Reported { report: *report });
    }
    for visit in history.visits() {
        events.push(TimelineEvent::Visited { visit: *visit });
    }
    if let Some(time) = history.removed() {
        events.push(TimelineEvent::Removed { time });
    }

    let mut keyed: Vec<(usize, TimelineEvent)> = events.into_iter().enumerate().collect();
    keyed.sort_by(|(seq_a, a), (seq_b, b)| {
        b.time()
            .cmp(&a.time())
            .then_with(|| b.rank().cmp(&a.rank()))
            .then_with(|| seq_b.cmp(seq_a))
    });
    keyed.into_iter().map(|(_, event)| event).collect()
}

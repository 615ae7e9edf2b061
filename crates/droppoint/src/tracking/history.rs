use chrono::{DateTime, Utc};

use super::domain::{DropPoint, Location, Report, Visit};

/// Immutable snapshot of everything recorded against one drop point.
///
/// Stores hand out owned snapshots so that status resolution, priority
/// computation, and timeline projection each observe one consistent view
/// of the three histories; concurrent appends only show up in later
/// snapshots. The three sequences are held in ascending time order, with
/// append order preserved for records sharing a timestamp, so equal-time
/// tie-breaks are stable across repeated reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DropPointHistory {
    drop_point: DropPoint,
    locations: Vec<Location>,
    reports: Vec<Report>,
    visits: Vec<Visit>,
}

impl DropPointHistory {
    /// Builds a snapshot from records in append order.
    ///
    /// Each sequence is sorted stably by time, so records a store hands
    /// over out of chronological order are normalized while equal-time
    /// records keep their insertion order.
    pub fn new(
        drop_point: DropPoint,
        mut locations: Vec<Location>,
        mut reports: Vec<Report>,
        mut visits: Vec<Visit>,
    ) -> Self {
        locations.sort_by_key(|location| location.time);
        reports.sort_by_key(|report| report.time);
        visits.sort_by_key(|visit| visit.time);
        Self {
            drop_point,
            locations,
            reports,
            visits,
        }
    }

    pub fn drop_point(&self) -> &DropPoint {
        &self.drop_point
    }

    pub fn number(&self) -> u32 {
        self.drop_point.number
    }

    pub fn category(&self) -> &str {
        &self.drop_point.category
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.drop_point.created
    }

    pub fn removed(&self) -> Option<DateTime<Utc>> {
        self.drop_point.removed
    }

    pub fn is_removed(&self) -> bool {
        self.drop_point.is_removed()
    }

    /// Placements in ascending time order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Reports in ascending time order.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Visits in ascending time order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// The latest placement, if any has been recorded.
    pub fn current_location(&self) -> Option<&Location> {
        self.locations.last()
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.reports.last()
    }

    pub fn last_visit(&self) -> Option<&Visit> {
        self.visits.last()
    }

    /// Reports not yet answered by a visit, newest first.
    ///
    /// These are the reports strictly newer than the last visit, or all
    /// reports if the drop point has never been visited. Among reports
    /// sharing a timestamp the later append counts as newer.
    pub fn new_reports(&self) -> impl Iterator<Item = &Report> {
        let cutoff = self.last_visit().map(|visit| visit.time);
        self.reports
            .iter()
            .rev()
            .filter(move |report| cutoff.map_or(true, |cutoff| report.time > cutoff))
    }

    pub fn total_report_count(&self) -> usize {
        self.reports.len()
    }

    /// Number of reports since the last visit (all of them if unvisited).
    pub fn new_report_count(&self) -> usize {
        self.new_reports().count()
    }

    /// The most recent instant anything happened to this drop point.
    ///
    /// Used to answer "changed since" queries: creation, removal, and
    /// every recorded placement, report, and visit all count as changes.
    pub fn last_modified(&self) -> DateTime<Utc> {
        let mut latest = self.drop_point.created;
        if let Some(removed) = self.drop_point.removed {
            latest = latest.max(removed);
        }
        if let Some(location) = self.locations.last() {
            latest = latest.max(location.time);
        }
        if let Some(report) = self.reports.last() {
            latest = latest.max(report.time);
        }
        if let Some(visit) = self.visits.last() {
            latest = latest.max(visit.time);
        }
        latest
    }
}

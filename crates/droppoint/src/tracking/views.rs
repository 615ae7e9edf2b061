use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{FillStatus, VisitAction};
use super::history::DropPointHistory;
use super::scheduling::Priority;
use super::status::resolve_status;

/// Snapshot of one drop point as served to maps and collector clients.
///
/// Location fields come from the latest placement; status and priority
/// are computed at projection time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropPointInfo {
    pub number: u32,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    pub reports_total: usize,
    pub reports_new: usize,
    pub status: FillStatus,
    pub status_label: &'static str,
    pub priority: f64,
    pub priority_factor: f64,
    pub base_time: DateTime<Utc>,
    pub removed: bool,
    pub last_modified: DateTime<Utc>,
}

impl DropPointInfo {
    pub fn project(history: &DropPointHistory, priority: Priority) -> Self {
        let status = resolve_status(history);
        let (description, lat, lng, level) = match history.current_location() {
            Some(location) => (
                location.description.clone(),
                location.lat,
                location.lng,
                location.level,
            ),
            None => (String::new(), None, None, None),
        };
        Self {
            number: history.number(),
            category: history.category().to_string(),
            description,
            lat,
            lng,
            level,
            reports_total: history.total_report_count(),
            reports_new: history.new_report_count(),
            status,
            status_label: status.label(),
            priority: priority.score,
            priority_factor: priority.factor,
            base_time: priority.base_time,
            removed: history.is_removed(),
            last_modified: history.last_modified(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountEntry {
    pub status: FillStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCountEntry {
    pub action: VisitAction,
    pub action_label: &'static str,
    pub count: usize,
}

/// Aggregate counts across the whole tracked fleet.
///
/// Breakdown vectors carry every variant, zero counts included, so
/// consumers get stable rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStatistics {
    pub drop_points_total: usize,
    pub drop_points_active: usize,
    pub reports_total: usize,
    pub visits_total: usize,
    pub active_by_status: Vec<StatusCountEntry>,
    pub reports_by_status: Vec<StatusCountEntry>,
    pub visits_by_action: Vec<ActionCountEntry>,
}

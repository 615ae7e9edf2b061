use std::collections::HashMap;

use super::domain::{FillStatus, VisitAction};
use super::history::DropPointHistory;
use super::status::resolve_status;
use super::views::{ActionCountEntry, StatusCountEntry, TrackingStatistics};

/// Tallies fleet-wide counts over a set of drop point histories.
///
/// Removed drop points count toward the totals and event breakdowns but
/// not toward the active set or its status breakdown.
pub fn collect_statistics(histories: &[DropPointHistory]) -> TrackingStatistics {
    let mut drop_points_active = 0;
    let mut reports_total = 0;
    let mut visits_total = 0;
    let mut active_by_status: HashMap<FillStatus, usize> = HashMap::new();
    let mut reports_by_status: HashMap<FillStatus, usize> = HashMap::new();
    let mut visits_by_action: HashMap<VisitAction, usize> = HashMap::new();

    for history in histories {
        if !history.is_removed() {
            drop_points_active += 1;
            *active_by_status
                .entry(resolve_status(history))
                .or_default() += 1;
        }
        reports_total += history.reports().len();
        for report in history.reports() {
            *reports_by_status.entry(report.status).or_default() += 1;
        }
        visits_total += history.visits().len();
        for visit in history.visits() {
            *visits_by_action.entry(visit.action).or_default() += 1;
        }
    }

    TrackingStatistics {
        drop_points_total: histories.len(),
        drop_points_active,
        reports_total,
        visits_total,
        active_by_status: status_entries(&active_by_status),
        reports_by_status: status_entries(&reports_by_status),
        visits_by_action: action_entries(&visits_by_action),
    }
}

fn status_entries(counts: &HashMap<FillStatus, usize>) -> Vec<StatusCountEntry> {
    FillStatus::ordered()
        .into_iter()
        .map(|status| StatusCountEntry {
            status,
            status_label: status.label(),
            count: counts.get(&status).copied().unwrap_or(0),
        })
        .collect()
}

fn action_entries(counts: &HashMap<VisitAction, usize>) -> Vec<ActionCountEntry> {
    VisitAction::ordered()
        .into_iter()
        .map(|action| ActionCountEntry {
            action,
            action_label: action.label(),
            count: counts.get(&action).copied().unwrap_or(0),
        })
        .collect()
}

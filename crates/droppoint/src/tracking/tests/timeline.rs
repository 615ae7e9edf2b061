use super::common::*;

use crate::tracking::history::DropPointHistory;
use crate::tracking::timeline::{project_timeline, TimelineEvent};
use crate::tracking::{FillStatus, VisitAction};

#[test]
fn full_lifecycle_reads_newest_first() {
    let created = event_time(10, 0);
    let mut drop_point = drop_point(1, created);
    drop_point.removed = Some(event_time(14, 0));

    let history = DropPointHistory::new(
        drop_point,
        vec![
            placement("Main hall entrance", created),
            placement("Stage left", event_time(12, 30)),
        ],
        vec![
            report(FillStatus::SomeBottles, event_time(11, 0)),
            report(FillStatus::Full, event_time(13, 0)),
        ],
        vec![visit(VisitAction::Emptied, event_time(12, 0))],
    );

    let timeline = project_timeline(&history);
    let kinds: Vec<&str> = timeline
        .iter()
        .map(|event| match event {
            TimelineEvent::Created { .. } => "created",
            TimelineEvent::Relocated { .. } => "relocated",
            TimelineEvent::Reported { .. } => "reported",
            TimelineEvent::Visited { .. } => "visited",
            TimelineEvent::Removed { .. } => "removed",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "removed", "reported", "relocated", "visited", "reported", "relocated", "created",
        ]
    );
    assert!(timeline
        .windows(2)
        .all(|pair| pair[0].time() >= pair[1].time()));
}

#[test]
fn same_instant_events_order_by_lifecycle_rank() {
    let moment = event_time(12, 0);
    let history = history_with(
        drop_point(1, event_time(10, 0)),
        vec![report(FillStatus::Full, moment)],
        vec![visit(VisitAction::Emptied, moment)],
    );

    let timeline = project_timeline(&history);
    assert!(matches!(timeline[0], TimelineEvent::Visited { .. }));
    assert!(matches!(timeline[1], TimelineEvent::Reported { .. }));
}

#[test]
fn initial_placement_sits_above_creation() {
    let history = history_with(drop_point(1, event_time(10, 0)), Vec::new(), Vec::new());

    let timeline = project_timeline(&history);
    assert_eq!(timeline.len(), 2);
    assert!(matches!(timeline[0], TimelineEvent::Relocated { .. }));
    assert!(matches!(timeline[1], TimelineEvent::Created { .. }));
}

#[test]
fn same_kind_ties_keep_append_order_newest_first() {
    let moment = event_time(12, 0);
    let history = history_with(
        drop_point(1, event_time(10, 0)),
        vec![
            report(FillStatus::SomeBottles, moment),
            report(FillStatus::Full, moment),
        ],
        Vec::new(),
    );

    let timeline = project_timeline(&history);
    let statuses: Vec<FillStatus> = timeline
        .iter()
        .filter_map(|event| match event {
            TimelineEvent::Reported { report } => Some(report.status),
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec![FillStatus::Full, FillStatus::SomeBottles]);
}

#[test]
fn projection_is_deterministic() {
    let history = history_with(
        drop_point(1, event_time(10, 0)),
        vec![
            report(FillStatus::SomeBottles, event_time(11, 0)),
            report(FillStatus::Full, event_time(11, 0)),
        ],
        vec![visit(VisitAction::Emptied, event_time(11, 0))],
    );

    assert_eq!(project_timeline(&history), project_timeline(&history));
}

#[test]
fn events_serialize_with_a_tag() {
    let history = history_with(
        drop_point(1, event_time(10, 0)),
        vec![report(FillStatus::Full, event_time(11, 0))],
        Vec::new(),
    );

    let timeline = project_timeline(&history);
    let json = serde_json::to_value(&timeline[0]).expect("serializes");
    assert_eq!(json.get("event").and_then(|v| v.as_str()), Some("reported"));
    assert!(json
        .get("report")
        .and_then(|report| report.get("status"))
        .is_some());
}

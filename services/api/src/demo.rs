use crate::infra::{parse_timestamp, MemoryDropPointStore};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use droppoint::error::AppError;
use droppoint::tracking::{
    DropPointService, FillStatus, InfoFilter, NewDropPoint, PriorityConfig, TimelineEvent,
    VisitAction,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct QueueArgs {
    /// Evaluate the queue at this instant (RFC 3339). Defaults to now;
    /// future instants are clamped to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor the walkthrough at this instant (RFC 3339). Defaults to
    /// now; future instants are clamped to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) at: Option<DateTime<Utc>>,
}

pub(crate) fn run_queue(args: QueueArgs) -> Result<(), AppError> {
    let at = anchor(args.at);
    let service = seed_sample_fleet(at)?;

    println!("Visit queue for the sample fleet (evaluated {at})");
    render_queue(&service, at)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let at = anchor(args.at);
    let service = seed_sample_fleet(at)?;

    println!("Drop point tracking demo");
    println!("Sample fleet seeded over the six hours before {at}");

    println!("\nFleet snapshot");
    let fleet = service.list(&InfoFilter::default(), Some(at))?;
    for info in &fleet {
        println!(
            "- #{} {} | {} | {} of {} report(s) awaiting service",
            info.number, info.description, info.status_label, info.reports_new, info.reports_total
        );
    }

    println!("\nVisit queue (most urgent first)");
    render_queue(&service, at)?;

    let queue = service.visit_queue(Some(at))?;
    if let Some(top) = queue.first() {
        println!("\nServicing the most urgent drop point");
        match service.record_visit(top.number, VisitAction::Emptied, Some(at)) {
            Ok(after) => println!(
                "- #{} {} emptied: status {} | score {:.2} | {} report(s) awaiting service",
                after.number,
                after.description,
                after.status_label,
                after.priority,
                after.reports_new
            ),
            Err(err) => println!("- visit not recorded: {err}"),
        }
    }

    println!("\nRetiring a drop point");
    match service.remove(4, Some(at)) {
        Ok(removed) => println!(
            "- #{} {} taken out of service, score pinned at {:.2}",
            removed.number, removed.description, removed.priority
        ),
        Err(err) => println!("- removal failed: {err}"),
    }
    match service.submit_report(4, FillStatus::Full, Some(at)) {
        Ok(info) => println!("- report accepted (status {})", info.status_label),
        Err(err) => println!("- late report refused: {err}"),
    }

    println!("\nTimeline for #1 (newest first)");
    for event in service.timeline(1)? {
        println!("- {}", describe_event(&event));
    }

    let stats = service.statistics()?;
    println!("\nFleet statistics");
    println!(
        "- {} drop points tracked, {} active",
        stats.drop_points_total, stats.drop_points_active
    );
    println!(
        "- {} report(s) and {} visit(s) on record",
        stats.reports_total, stats.visits_total
    );
    println!("- active drop points by status:");
    for entry in stats.active_by_status.iter().filter(|entry| entry.count > 0) {
        println!("  - {}: {}", entry.status_label, entry.count);
    }

    Ok(())
}

fn anchor(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(Utc::now).min(Utc::now())
}

/// Five drop points with activity spread over the six hours before `at`,
/// covering a backlog, a recent service, a fresh overflow, an untouched
/// point, and a visit that emptied nothing.
fn seed_sample_fleet(
    at: DateTime<Utc>,
) -> Result<DropPointService<MemoryDropPointStore>, AppError> {
    let store = Arc::new(MemoryDropPointStore::default());
    let service = DropPointService::new(store, PriorityConfig::default());

    let created = at - Duration::hours(6);
    for description in [
        "Hall 1, main entrance",
        "Hall 2, pillar B",
        "Foyer west",
        "Stage right",
        "Food court, north corner",
    ] {
        service.create(station(description, created))?;
    }

    service.submit_report(1, FillStatus::ReasonablyFull, Some(at - Duration::hours(3)))?;
    service.submit_report(1, FillStatus::Full, Some(at - Duration::hours(1)))?;
    service.submit_report(2, FillStatus::Full, Some(at - Duration::hours(2)))?;
    service.record_visit(2, VisitAction::Emptied, Some(at - Duration::minutes(30)))?;
    service.submit_report(3, FillStatus::Overflowing, Some(at - Duration::minutes(20)))?;
    service.submit_report(5, FillStatus::SomeBottles, Some(at - Duration::hours(4)))?;
    service.record_visit(5, VisitAction::NoAction, Some(at - Duration::minutes(210)))?;

    Ok(service)
}

fn station(description: &str, created: DateTime<Utc>) -> NewDropPoint {
    NewDropPoint {
        number: None,
        category: None,
        description: description.to_string(),
        lat: None,
        lng: None,
        level: None,
        time: Some(created),
    }
}

fn render_queue(
    service: &DropPointService<MemoryDropPointStore>,
    at: DateTime<Utc>,
) -> Result<(), AppError> {
    let queue = service.visit_queue(Some(at))?;
    if queue.is_empty() {
        println!("- queue is empty");
        return Ok(());
    }
    for info in &queue {
        println!(
            "- #{} {} | score {:.2} | {} | {} new report(s)",
            info.number, info.description, info.priority, info.status_label, info.reports_new
        );
    }
    Ok(())
}

fn describe_event(event: &TimelineEvent) -> String {
    match event {
        TimelineEvent::Created { time } => format!("{time} created"),
        TimelineEvent::Relocated { location } => {
            format!("{} placed at {}", location.time, location.description)
        }
        TimelineEvent::Reported { report } => {
            format!("{} reported {}", report.time, report.status.label())
        }
        TimelineEvent::Visited { visit } => {
            format!("{} visited ({})", visit.time, visit.action.label())
        }
        TimelineEvent::Removed { time } => format!("{time} removed"),
    }
}

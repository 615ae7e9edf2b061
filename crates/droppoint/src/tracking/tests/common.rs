use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::tracking::domain::{DropPoint, Location, Report, Visit, DEFAULT_CATEGORY};
use crate::tracking::history::DropPointHistory;
use crate::tracking::scheduling::{PriorityConfig, PriorityEngine, StandardWeights};
use crate::tracking::service::DropPointService;
use crate::tracking::store::{DropPointStore, StoreError};
use crate::tracking::validation::NewDropPoint;
use crate::tracking::{tracking_router, FillStatus, VisitAction};

/// Fixed clock on the event's opening day; tests offset from here.
pub(super) fn event_time(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 21, hour, minute, 0)
        .single()
        .expect("valid fixture time")
}

pub(super) fn drop_point(number: u32, created: DateTime<Utc>) -> DropPoint {
    DropPoint {
        number,
        category: DEFAULT_CATEGORY.to_string(),
        created,
        removed: None,
    }
}

pub(super) fn placement(description: &str, time: DateTime<Utc>) -> Location {
    Location {
        description: description.to_string(),
        lat: Some(53.561),
        lng: Some(9.961),
        level: Some(1),
        time,
    }
}

pub(super) fn report(status: FillStatus, time: DateTime<Utc>) -> Report {
    Report { status, time }
}

pub(super) fn visit(action: VisitAction, time: DateTime<Utc>) -> Visit {
    Visit { action, time }
}

pub(super) fn creation(number: Option<u32>, time: DateTime<Utc>) -> NewDropPoint {
    NewDropPoint {
        number,
        category: None,
        description: "Main hall entrance".to_string(),
        lat: Some(53.561),
        lng: Some(9.961),
        level: Some(1),
        time: Some(time),
    }
}

/// History with a single placement at creation time.
pub(super) fn history_with(
    drop_point: DropPoint,
    reports: Vec<Report>,
    visits: Vec<Visit>,
) -> DropPointHistory {
    let initial = placement("Main hall entrance", drop_point.created);
    DropPointHistory::new(drop_point, vec![initial], reports, visits)
}

/// Two-hour interval and unit base priority, so factor denominators are
/// 7200 seconds in every test that does arithmetic by hand.
pub(super) fn priority_config() -> PriorityConfig {
    PriorityConfig::from_minutes(1.0, 120).expect("valid fixture config")
}

pub(super) fn engine() -> PriorityEngine<StandardWeights> {
    PriorityEngine::new(priority_config(), StandardWeights)
}

pub(super) fn build_service() -> (DropPointService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = DropPointService::new(store.clone(), priority_config());
    (service, store)
}

pub(super) fn tracking_router_with_service(
    service: DropPointService<MemoryStore>,
) -> axum::Router {
    tracking_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

struct StoredRecord {
    drop_point: DropPoint,
    locations: Vec<Location>,
    reports: Vec<Report>,
    visits: Vec<Visit>,
}

impl StoredRecord {
    fn to_history(&self) -> DropPointHistory {
        DropPointHistory::new(
            self.drop_point.clone(),
            self.locations.clone(),
            self.reports.clone(),
            self.visits.clone(),
        )
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<BTreeMap<u32, StoredRecord>>>,
}

impl DropPointStore for MemoryStore {
    fn insert(
        &self,
        drop_point: DropPoint,
        initial_location: Location,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&drop_point.number) {
            return Err(StoreError::Conflict);
        }
        guard.insert(
            drop_point.number,
            StoredRecord {
                drop_point,
                locations: vec![initial_location],
                reports: Vec::new(),
                visits: Vec::new(),
            },
        );
        Ok(())
    }

    fn mark_removed(&self, number: u32, removed: DateTime<Utc>) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(&number).ok_or(StoreError::NotFound)?;
        record.drop_point.removed = Some(removed);
        Ok(())
    }

    fn append_report(&self, number: u32, report: Report) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(&number).ok_or(StoreError::NotFound)?;
        record.reports.push(report);
        Ok(())
    }

    fn append_visit(&self, number: u32, visit: Visit) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(&number).ok_or(StoreError::NotFound)?;
        record.visits.push(visit);
        Ok(())
    }

    fn append_location(&self, number: u32, location: Location) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(&number).ok_or(StoreError::NotFound)?;
        record.locations.push(location);
        Ok(())
    }

    fn history(&self, number: u32) -> Result<Option<DropPointHistory>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(&number).map(StoredRecord::to_history))
    }

    fn histories(&self) -> Result<Vec<DropPointHistory>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().map(StoredRecord::to_history).collect())
    }

    fn next_free_number(&self) -> Result<u32, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.keys().next_back().map_or(1, |highest| highest + 1))
    }
}

/// Accepts lookups but refuses inserts, for forcing the conflict path.
pub(super) struct ConflictStore;

impl DropPointStore for ConflictStore {
    fn insert(&self, _drop_point: DropPoint, _location: Location) -> Result<(), StoreError> {
        Err(StoreError::Conflict)
    }

    fn mark_removed(&self, _number: u32, _removed: DateTime<Utc>) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    fn append_report(&self, _number: u32, _report: Report) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    fn append_visit(&self, _number: u32, _visit: Visit) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    fn append_location(&self, _number: u32, _location: Location) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    fn history(&self, _number: u32) -> Result<Option<DropPointHistory>, StoreError> {
        Ok(None)
    }

    fn histories(&self) -> Result<Vec<DropPointHistory>, StoreError> {
        Ok(Vec::new())
    }

    fn next_free_number(&self) -> Result<u32, StoreError> {
        Ok(1)
    }
}

pub(super) struct UnavailableStore;

impl DropPointStore for UnavailableStore {
    fn insert(&self, _drop_point: DropPoint, _location: Location) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn mark_removed(&self, _number: u32, _removed: DateTime<Utc>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append_report(&self, _number: u32, _report: Report) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append_visit(&self, _number: u32, _visit: Visit) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append_location(&self, _number: u32, _location: Location) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _number: u32) -> Result<Option<DropPointHistory>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn histories(&self) -> Result<Vec<DropPointHistory>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn next_free_number(&self) -> Result<u32, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

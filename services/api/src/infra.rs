use chrono::{DateTime, Utc};
use droppoint::tracking::{
    DropPoint, DropPointHistory, DropPointStore, Location, Report, StoreError, Visit,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Drop point records held in process memory, keyed by number.
///
/// Backs the default server and the CLI demos. The BTreeMap keeps
/// numbers ordered so the highest assigned number is the last key.
#[derive(Default, Clone)]
pub(crate) struct MemoryDropPointStore {
    records: Arc<Mutex<BTreeMap<u32, DropPointRecord>>>,
}

#[derive(Clone)]
struct DropPointRecord {
    drop_point: DropPoint,
    locations: Vec<Location>,
    reports: Vec<Report>,
    visits: Vec<Visit>,
}

impl DropPointRecord {
    fn to_history(&self) -> DropPointHistory {
        DropPointHistory::new(
            self.drop_point.clone(),
            self.locations.clone(),
            self.reports.clone(),
            self.visits.clone(),
        )
    }
}

impl DropPointStore for MemoryDropPointStore {
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
            DropPointRecord {
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
        Ok(guard.get(&number).map(DropPointRecord::to_history))
    }

    fn histories(&self) -> Result<Vec<DropPointHistory>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().map(DropPointRecord::to_history).collect())
    }

    fn next_free_number(&self) -> Result<u32, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.keys().next_back().map_or(1, |highest| highest + 1))
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

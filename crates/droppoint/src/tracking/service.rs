use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::history::DropPointHistory;
use super::scheduling::{PriorityConfig, PriorityEngine, ReportWeighting, StandardWeights};
use super::stats::collect_statistics;
use super::store::{DropPointStore, StoreError};
use super::timeline::{project_timeline, TimelineEvent};
use super::validation::{
    validate_creation, validate_event, validate_relocation, validate_removal, NewDropPoint,
    NewLocation, ValidationError,
};
use super::views::{DropPointInfo, TrackingStatistics};
use super::{FillStatus, Report, Visit, VisitAction};

/// Narrows drop point listings.
#[derive(Debug, Clone, Default)]
pub struct InfoFilter {
    pub category: Option<String>,
    pub changed_since: Option<DateTime<Utc>>,
}

/// Service composing the store, validation rules, and priority engine.
///
/// Mutations take an optional event time `at` so late submissions keep
/// their real timestamp; it defaults to the wall clock and may never lie
/// in the future. Reads take an optional `at` to pin the priority clock
/// for reproducible output.
pub struct DropPointService<S, W = StandardWeights> {
    store: Arc<S>,
    engine: PriorityEngine<W>,
}

impl<S> DropPointService<S, StandardWeights>
where
    S: DropPointStore + 'static,
{
    pub fn new(store: Arc<S>, config: PriorityConfig) -> Self {
        Self::with_engine(store, PriorityEngine::new(config, StandardWeights))
    }
}

impl<S, W> DropPointService<S, W>
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    pub fn with_engine(store: Arc<S>, engine: PriorityEngine<W>) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &PriorityEngine<W> {
        &self.engine
    }

    /// Registers a new drop point with its initial placement.
    pub fn create(&self, request: NewDropPoint) -> Result<DropPointInfo, DropPointServiceError> {
        let now = Utc::now();
        let number = match request.number {
            Some(number) => number,
            None => self.store.next_free_number()?,
        };
        let number_taken = self.store.history(number)?.is_some();

        let (drop_point, initial_location) =
            validate_creation(&request, number, number_taken, now)?;
        self.store.insert(drop_point, initial_location)?;
        self.snapshot(number, now)
    }

    /// Takes a drop point out of service, keeping its history.
    pub fn remove(
        &self,
        number: u32,
        at: Option<DateTime<Utc>>,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        let now = Utc::now();
        let history = self.store.history(number)?;
        let removed = validate_removal(history.as_ref(), at, now)?;
        self.store.mark_removed(number, removed)?;
        self.snapshot(number, now)
    }

    /// Records a fill-condition report against a drop point.
    pub fn submit_report(
        &self,
        number: u32,
        status: FillStatus,
        at: Option<DateTime<Utc>>,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        let now = Utc::now();
        let history = self.store.history(number)?;
        let time = validate_event(history.as_ref(), at, now)?;
        self.store.append_report(number, Report { status, time })?;
        self.snapshot(number, now)
    }

    /// Records a collector visit against a drop point.
    pub fn record_visit(
        &self,
        number: u32,
        action: VisitAction,
        at: Option<DateTime<Utc>>,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        let now = Utc::now();
        let history = self.store.history(number)?;
        let time = validate_event(history.as_ref(), at, now)?;
        self.store.append_visit(number, Visit { action, time })?;
        self.snapshot(number, now)
    }

    /// Appends a new placement to a drop point.
    pub fn relocate(
        &self,
        number: u32,
        request: NewLocation,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        let now = Utc::now();
        let history = self.store.history(number)?;
        let location = validate_relocation(history.as_ref(), &request, now)?;
        self.store.append_location(number, location)?;
        self.snapshot(number, now)
    }

    /// Fetches the current snapshot of one drop point.
    pub fn info(
        &self,
        number: u32,
        at: Option<DateTime<Utc>>,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        self.snapshot(number, at.unwrap_or_else(Utc::now))
    }

    /// Lists drop point snapshots, newest-change-first filtering included.
    pub fn list(
        &self,
        filter: &InfoFilter,
        at: Option<DateTime<Utc>>,
    ) -> Result<Vec<DropPointInfo>, DropPointServiceError> {
        let now = at.unwrap_or_else(Utc::now);
        let mut infos: Vec<DropPointInfo> = self
            .store
            .histories()?
            .iter()
            .filter(|history| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |category| history.category() == category)
            })
            .filter(|history| {
                filter
                    .changed_since
                    .map_or(true, |since| history.last_modified() > since)
            })
            .map(|history| self.project(history, now))
            .collect();
        infos.sort_by_key(|info| info.number);
        Ok(infos)
    }

    /// Ranks active drop points by how urgently they need a visit.
    pub fn visit_queue(
        &self,
        at: Option<DateTime<Utc>>,
    ) -> Result<Vec<DropPointInfo>, DropPointServiceError> {
        let now = at.unwrap_or_else(Utc::now);
        let mut queue: Vec<DropPointInfo> = self
            .store
            .histories()?
            .iter()
            .filter(|history| !history.is_removed())
            .map(|history| self.project(history, now))
            .collect();
        queue.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| a.number.cmp(&b.number))
        });
        Ok(queue)
    }

    /// Returns the full audit timeline of one drop point.
    pub fn timeline(&self, number: u32) -> Result<Vec<TimelineEvent>, DropPointServiceError> {
        let history = self.store.history(number)?.ok_or(StoreError::NotFound)?;
        Ok(project_timeline(&history))
    }

    /// Tallies fleet-wide statistics over every known drop point.
    pub fn statistics(&self) -> Result<TrackingStatistics, DropPointServiceError> {
        let histories = self.store.histories()?;
        Ok(collect_statistics(&histories))
    }

    /// Lowest number not yet assigned, for prefilling creation forms.
    pub fn next_free_number(&self) -> Result<u32, DropPointServiceError> {
        Ok(self.store.next_free_number()?)
    }

    fn snapshot(
        &self,
        number: u32,
        now: DateTime<Utc>,
    ) -> Result<DropPointInfo, DropPointServiceError> {
        let history = self.store.history(number)?.ok_or(StoreError::NotFound)?;
        Ok(self.project(&history, now))
    }

    fn project(&self, history: &DropPointHistory, now: DateTime<Utc>) -> DropPointInfo {
        DropPointInfo::project(history, self.engine.compute(history, now))
    }
}

/// Error raised by the drop point service.
#[derive(Debug, thiserror::Error)]
pub enum DropPointServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Drop point tracking: lifecycle records, fill-status inference, and
//! visit-priority scheduling.
//!
//! The flow mirrors how crews actually work an event: guests submit fill
//! reports and collectors log visits, while the scheduler ranks every
//! active drop point by how urgently it needs attention. Everything
//! derives from the append-only history; no status or priority is ever
//! stored.

pub mod domain;
pub mod history;
pub mod router;
pub mod scheduling;
pub mod service;
pub mod store;
pub mod timeline;
pub mod validation;
pub mod views;

pub(crate) mod stats;
pub(crate) mod status;

#[cfg(test)]
mod tests;

pub use domain::{DropPoint, FillStatus, Location, Report, Visit, VisitAction, DEFAULT_CATEGORY};
pub use history::DropPointHistory;
pub use router::tracking_router;
pub use scheduling::{
    Priority, PriorityConfig, PriorityConfigError, PriorityEngine, ReportWeighting,
    StandardWeights, DEFAULT_BASE_PRIORITY, DEFAULT_VISIT_INTERVAL_MIN,
};
pub use service::{DropPointService, DropPointServiceError, InfoFilter};
pub use stats::collect_statistics;
pub use status::resolve_status;
pub use store::{DropPointStore, StoreError};
pub use timeline::{project_timeline, TimelineEvent};
pub use validation::{NewDropPoint, NewLocation, ValidationError, ValidationProblem};
pub use views::{ActionCountEntry, DropPointInfo, StatusCountEntry, TrackingStatistics};

//! Status inference and visit-priority scheduling for bottle drop points
//! at large events.
//!
//! Drop points are numbered collection stations whose state is never
//! stored directly: fill status, visit priority, and the audit timeline
//! are all derived on demand from the append-only history of reports,
//! visits, placements, and removal. The [`tracking`] module carries the
//! whole workflow, from validation of submitted mutations through the
//! ranked visit queue served over HTTP.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracking;

pub use error::AppError;

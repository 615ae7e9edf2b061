//! Visit-priority computation.
//!
//! Priority is an aging score: a decaying-weighted sum of the unresolved
//! report backlog, normalized by the target service cadence and scaled by
//! the time a drop point has waited since its last service. Untouched
//! drop points therefore climb the queue slowly on their own, while a
//! fresh severe report dominates any pile of stale ones.

mod config;
mod weights;

pub use config::{
    PriorityConfig, PriorityConfigError, DEFAULT_BASE_PRIORITY, DEFAULT_VISIT_INTERVAL_MIN,
};
pub use weights::{ReportWeighting, StandardWeights};

use chrono::{DateTime, Utc};

use super::history::DropPointHistory;

/// Priority of one drop point at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priority {
    /// Urgency used to rank collection work, rounded to two decimals.
    pub score: f64,
    /// Urgency accrued per second of neglect; `score` is this factor
    /// times the dwell time since `base_time`.
    pub factor: f64,
    /// Start of the dwell interval: the last visit, or creation if the
    /// drop point has never been visited.
    pub base_time: DateTime<Utc>,
}

/// Stateless engine computing visit priorities from history snapshots.
pub struct PriorityEngine<W = StandardWeights> {
    config: PriorityConfig,
    weights: W,
}

impl PriorityEngine<StandardWeights> {
    pub fn with_defaults() -> Self {
        Self::new(PriorityConfig::default(), StandardWeights)
    }
}

impl<W: ReportWeighting> PriorityEngine<W> {
    pub fn new(config: PriorityConfig, weights: W) -> Self {
        Self { config, weights }
    }

    pub fn config(&self) -> &PriorityConfig {
        &self.config
    }

    /// Computes the priority of a drop point at `now`.
    ///
    /// A removed drop point is never a candidate for visiting, so its
    /// score and factor are both zero regardless of history. Otherwise
    /// the score grows linearly with the time since `base_time`, at a
    /// rate set by the unresolved-report backlog:
    ///
    /// ```text
    /// factor = (base_priority + Σ weight(report_i) / 2^i) / interval_seconds
    /// score  = factor * seconds_since(base_time)
    /// ```
    ///
    /// with `i` counting unresolved reports from newest to oldest. The
    /// halving gives reports an exponential half-life by backlog rank:
    /// the newest unresolved report contributes its full weight, the one
    /// behind it half, and deep backlog underflows toward zero in f64
    /// well before it could matter.
    pub fn compute(&self, history: &DropPointHistory, now: DateTime<Utc>) -> Priority {
        let base_time = history
            .last_visit()
            .map(|visit| visit.time)
            .unwrap_or_else(|| history.created());

        if history.is_removed() {
            return Priority {
                score: 0.0,
                factor: 0.0,
                base_time,
            };
        }

        let factor = self.factor(history);
        let dwell_seconds = (now - base_time).num_milliseconds() as f64 / 1000.0;
        Priority {
            score: round2(factor * dwell_seconds),
            factor,
            base_time,
        }
    }

    /// Urgency accrued per second of neglect. A removed drop point
    /// accrues nothing, as in [`Self::compute`].
    pub fn factor(&self, history: &DropPointHistory) -> f64 {
        if history.is_removed() {
            return 0.0;
        }
        let mut numerator = self.config.base_priority();
        let mut share = 1.0_f64;
        for report in history.new_reports() {
            numerator += self.weights.weight(report.status) * share;
            share *= 0.5;
        }
        numerator / self.config.visit_interval_seconds()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

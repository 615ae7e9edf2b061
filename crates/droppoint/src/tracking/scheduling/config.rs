use chrono::Duration;

/// Knobs controlling how fast visit priority accrues.
///
/// Construction validates both values, so an engine holding a
/// `PriorityConfig` can never divide by a non-positive interval or seed
/// the backlog sum with a non-finite base. Invalid settings are rejected
/// here, before any score arithmetic runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityConfig {
    base_priority: f64,
    visit_interval: Duration,
}

/// Default standing urgency: one phantom default-weight report, so
/// priority keeps growing slowly even when nobody files reports.
pub const DEFAULT_BASE_PRIORITY: f64 = 1.0;

/// Default target service cadence in minutes.
pub const DEFAULT_VISIT_INTERVAL_MIN: i64 = 120;

impl PriorityConfig {
    /// Validates and constructs a [`PriorityConfig`].
    ///
    /// The base priority must be finite and non-negative (zero disables
    /// growth from pure neglect); the visit interval must be at least one
    /// millisecond since scores normalize by it at millisecond resolution.
    pub fn new(
        base_priority: f64,
        visit_interval: Duration,
    ) -> Result<Self, PriorityConfigError> {
        if !base_priority.is_finite() || base_priority < 0.0 {
            return Err(PriorityConfigError::InvalidBasePriority {
                value: base_priority,
            });
        }
        if visit_interval.num_milliseconds() <= 0 {
            return Err(PriorityConfigError::IntervalTooShort {
                millis: visit_interval.num_milliseconds(),
            });
        }
        Ok(Self {
            base_priority,
            visit_interval,
        })
    }

    /// Convenience constructor mirroring the minute-based setting most
    /// deployments configure.
    pub fn from_minutes(
        base_priority: f64,
        visit_interval_minutes: i64,
    ) -> Result<Self, PriorityConfigError> {
        let visit_interval = Duration::try_minutes(visit_interval_minutes).ok_or(
            PriorityConfigError::IntervalOutOfRange {
                minutes: visit_interval_minutes,
            },
        )?;
        Self::new(base_priority, visit_interval)
    }

    pub fn base_priority(&self) -> f64 {
        self.base_priority
    }

    pub fn visit_interval(&self) -> Duration {
        self.visit_interval
    }

    pub fn visit_interval_seconds(&self) -> f64 {
        self.visit_interval.num_milliseconds() as f64 / 1000.0
    }
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            base_priority: DEFAULT_BASE_PRIORITY,
            visit_interval: Duration::minutes(DEFAULT_VISIT_INTERVAL_MIN),
        }
    }
}

/// Rejected priority settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriorityConfigError {
    #[error("base visit priority must be finite and non-negative, got {value}")]
    InvalidBasePriority { value: f64 },
    #[error("base visit interval must be at least one millisecond, got {millis}ms")]
    IntervalTooShort { millis: i64 },
    #[error("base visit interval of {minutes}min is out of range")]
    IntervalOutOfRange { minutes: i64 },
}

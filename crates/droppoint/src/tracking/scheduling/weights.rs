use super::super::domain::FillStatus;

/// Severity→weight policy feeding the priority engine.
///
/// Weights must be non-negative and non-decreasing along the severity
/// ladder (`NoCrates` up to `Overflowing`); the resting states `Unknown`,
/// `New`, and `Emptied` sit outside the ladder and may weigh less. The
/// engine treats the mapping as opaque, so deployments can swap in their
/// own calibration.
pub trait ReportWeighting: Send + Sync {
    fn weight(&self, status: FillStatus) -> f64;
}

/// Shipped weight table.
///
/// An `Emptied` report adds no urgency, and an `Overflowing` one
/// deliberately jumps ahead of the linear ladder so a single overflow
/// outranks a handful of moderate reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardWeights;

impl ReportWeighting for StandardWeights {
    fn weight(&self, status: FillStatus) -> f64 {
        match status {
            FillStatus::Unknown => 0.0,
            FillStatus::New => 1.0,
            FillStatus::NoCrates => 2.0,
            FillStatus::SomeBottles => 3.0,
            FillStatus::ReasonablyFull => 4.0,
            FillStatus::Full => 5.0,
            FillStatus::Overflowing => 8.0,
            FillStatus::Emptied => 0.0,
        }
    }
}

impl<F> ReportWeighting for F
where
    F: Fn(FillStatus) -> f64 + Send + Sync,
{
    fn weight(&self, status: FillStatus) -> f64 {
        self(status)
    }
}

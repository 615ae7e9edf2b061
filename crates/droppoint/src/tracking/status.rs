use super::domain::FillStatus;
use super::history::DropPointHistory;

/// Derives the current fill status of a drop point from its snapshot.
///
/// Reports are authoritative for what was observed; visits are
/// authoritative for whether the drop point was cleared, but only when
/// strictly newer than the last observation:
///
/// * A report always sets the status that was reported, overriding any
///   older signal. At exact time equality with a visit the report wins.
/// * If any visit since the last report emptied the drop point, the
///   status is [`FillStatus::Emptied`]; visits that did not empty it
///   leave the last reported status standing.
/// * With no reports at all, a last visit that emptied the drop point
///   yields [`FillStatus::Emptied`]; any other visit carries no fill
///   information and the drop point counts as newly tracked.
/// * With no history whatsoever the status is [`FillStatus::New`].
///
/// This is a pure function of the snapshot; an empty history is a
/// well-defined input, never an error.
pub fn resolve_status(history: &DropPointHistory) -> FillStatus {
    let last_report = history.last_report();
    let last_visit = history.last_visit();

    if let (Some(report), Some(visit)) = (last_report, last_visit) {
        if visit.time > report.time {
            let emptied_since_report = history
                .visits()
                .iter()
                .rev()
                .take_while(|visit| visit.time > report.time)
                .any(|visit| visit.action.empties());
            if emptied_since_report {
                return FillStatus::Emptied;
            }
            return report.status;
        }
    }

    if let Some(report) = last_report {
        return report.status;
    }

    if let Some(visit) = last_visit {
        if visit.action.empties() {
            return FillStatus::Emptied;
        }
    }

    FillStatus::New
}

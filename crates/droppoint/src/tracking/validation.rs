use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{DropPoint, Location, DEFAULT_CATEGORY};
use super::history::DropPointHistory;

/// Request to create a drop point together with its initial placement.
///
/// `number` may be left empty to have the next free number assigned;
/// `time` defaults to the moment of creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDropPoint {
    pub number: Option<u32>,
    pub category: Option<String>,
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub level: Option<i32>,
    pub time: Option<DateTime<Utc>>,
}

/// Request to append a placement to an existing drop point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub level: Option<i32>,
    pub time: Option<DateTime<Utc>>,
}

/// One rejected aspect of a lifecycle mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationProblem {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in one lifecycle mutation.
///
/// Validation never stops at the first problem: a submitter fixing a
/// form sees every issue in one pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid request: {}", describe(.problems))]
pub struct ValidationError {
    pub problems: Vec<ValidationProblem>,
}

fn describe(problems: &[ValidationProblem]) -> String {
    problems
        .iter()
        .map(|problem| format!("{}: {}", problem.field, problem.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Default)]
struct Problems(Vec<ValidationProblem>);

impl Problems {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(ValidationProblem {
            field,
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems: self.0 })
        }
    }
}

/// Validates a creation request and materializes the records to insert.
///
/// `number` must already be resolved to a concrete value (callers
/// allocate the next free number for empty submissions) and
/// `number_taken` states whether the store already knows it.
pub(crate) fn validate_creation(
    request: &NewDropPoint,
    number: u32,
    number_taken: bool,
    now: DateTime<Utc>,
) -> Result<(DropPoint, Location), ValidationError> {
    let mut problems = Problems::default();

    if number == 0 {
        problems.push("number", "drop point number must be positive");
    } else if number_taken {
        problems.push("number", "that drop point already exists");
    }

    let created = request.time.unwrap_or(now);
    if created > now {
        problems.push("time", "creation time lies in the future");
    }

    check_coordinates(&mut problems, request.lat, request.lng);

    problems.finish()?;

    let category = request
        .category
        .clone()
        .filter(|category| !category.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let drop_point = DropPoint {
        number,
        category,
        created,
        removed: None,
    };
    let initial_location = Location {
        description: request.description.clone(),
        lat: request.lat,
        lng: request.lng,
        level: request.level,
        time: created,
    };
    Ok((drop_point, initial_location))
}

/// Validates a removal and resolves its effective time.
pub(crate) fn validate_removal(
    history: Option<&DropPointHistory>,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    let mut problems = Problems::default();

    match history {
        None => problems.push("drop_point", "no such drop point"),
        Some(history) if history.is_removed() => {
            problems.push("drop_point", "drop point already removed");
        }
        Some(_) => {}
    }

    let removed = at.unwrap_or(now);
    if removed > now {
        problems.push("time", "removal time lies in the future");
    }
    if let Some(history) = history {
        if removed < history.created() {
            problems.push("time", "removal time precedes creation");
        }
    }

    problems.finish()?;
    Ok(removed)
}

/// Validates the target and timestamp of an appended report or visit.
pub(crate) fn validate_event(
    history: Option<&DropPointHistory>,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    let mut problems = Problems::default();

    match history {
        None => problems.push("drop_point", "no such drop point"),
        Some(history) if history.is_removed() => {
            problems.push("drop_point", "drop point has been removed");
        }
        Some(_) => {}
    }

    let time = at.unwrap_or(now);
    if time > now {
        problems.push("time", "time lies in the future");
    }

    problems.finish()?;
    Ok(time)
}

/// Validates a relocation request and materializes the placement.
pub(crate) fn validate_relocation(
    history: Option<&DropPointHistory>,
    request: &NewLocation,
    now: DateTime<Utc>,
) -> Result<Location, ValidationError> {
    let mut problems = Problems::default();

    match history {
        None => problems.push("drop_point", "no such drop point"),
        Some(history) if history.is_removed() => {
            problems.push("drop_point", "drop point has been removed");
        }
        Some(_) => {}
    }

    let time = request.time.unwrap_or(now);
    if time > now {
        problems.push("time", "time lies in the future");
    }

    check_coordinates(&mut problems, request.lat, request.lng);

    problems.finish()?;
    Ok(Location {
        description: request.description.clone(),
        lat: request.lat,
        lng: request.lng,
        level: request.level,
        time,
    })
}

fn check_coordinates(problems: &mut Problems, lat: Option<f64>, lng: Option<f64>) {
    if let Some(lat) = lat {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            problems.push("lat", "latitude must lie between -90 and 90");
        }
    }
    if let Some(lng) = lng {
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            problems.push("lng", "longitude must lie between -180 and 180");
        }
    }
}

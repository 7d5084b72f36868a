//! Validation errors raised at the boundary of the offending call.
//!
//! All checks are eager; there is no internal recovery or retry. Wrong-kind
//! inputs (the scripting-language failure mode) are ruled out statically by
//! the typed constructors, so the remaining taxonomy is value validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("coordinates (x, y, z) must be finite numbers")]
    NonFiniteCoordinate,

    #[error("drone id must be a non-empty string")]
    EmptyDroneId,

    #[error("a mission requires at least two waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("mission start time must be strictly before end time")]
    StartNotBeforeEnd,

    #[error("waypoint time {time} lies outside the mission window")]
    WaypointTimeOutOfWindow { time: DateTime<Utc> },

    #[error("waypoint times must be non-decreasing along the sequence")]
    WaypointTimesNotOrdered,

    #[error("safety buffer must be a positive number, got {value}")]
    NonPositiveBuffer { value: f64 },

    #[error("sampling step must be a positive number of seconds, got {value}")]
    NonPositiveTimeStep { value: f64 },

    #[error("search window must be non-negative")]
    NegativeWindow,

    #[error("conflict description must be a non-empty string")]
    EmptyDescription,

    #[error("a conflict requires at least two distinct, non-empty drone ids")]
    MalformedConflictingIds,

    #[error("candidate sample is missing a timestamp")]
    MissingTimestamp,
}

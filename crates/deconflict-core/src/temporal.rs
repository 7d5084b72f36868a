//! Exact temporal refinement of candidate sample pairs.

use chrono::Duration;
use tracing::trace;

use crate::error::ValidationError;
use crate::models::{Conflict, Mission, Waypoint};
use crate::trajectory::position_at;

/// Half-width of the search interval around a candidate's timestamp.
pub fn default_search_window() -> Duration {
    Duration::seconds(5)
}

/// Refine a candidate pair with the default five-second window.
pub fn refine_candidate(
    mission_a: &Mission,
    mission_b: &Mission,
    candidate_a: &Waypoint,
    candidate_b: &Waypoint,
    safety_buffer: f64,
) -> Result<Option<Conflict>, ValidationError> {
    refine_candidate_with_window(
        mission_a,
        mission_b,
        candidate_a,
        candidate_b,
        safety_buffer,
        default_search_window(),
    )
}

/// Walk a `[candidate_a.time - window, candidate_a.time + window]` interval at
/// one-second resolution, clipped to both missions' active windows, comparing
/// exact interpolated positions against the buffer.
///
/// First instant wins: the walk stops at the earliest qualifying instant and
/// builds a [`Conflict`] located at the midpoint of the two positions. `None`
/// means the candidate was a false positive from the coarse prune.
pub fn refine_candidate_with_window(
    mission_a: &Mission,
    mission_b: &Mission,
    candidate_a: &Waypoint,
    candidate_b: &Waypoint,
    safety_buffer: f64,
    window: Duration,
) -> Result<Option<Conflict>, ValidationError> {
    if !safety_buffer.is_finite() || safety_buffer <= 0.0 {
        return Err(ValidationError::NonPositiveBuffer {
            value: safety_buffer,
        });
    }
    if window < Duration::zero() {
        return Err(ValidationError::NegativeWindow);
    }
    let Some(anchor) = candidate_a.time else {
        return Err(ValidationError::MissingTimestamp);
    };
    trace!(
        anchor = %anchor,
        other_sample_time = ?candidate_b.time,
        "refining candidate pair"
    );

    let start = (anchor - window)
        .max(mission_a.start_time())
        .max(mission_b.start_time());
    let end = (anchor + window)
        .min(mission_a.end_time())
        .min(mission_b.end_time());

    let mut time = start;
    while time <= end {
        if let (Some(position_a), Some(position_b)) =
            (position_at(mission_a, time), position_at(mission_b, time))
        {
            if position_a.distance_to(&position_b) < safety_buffer {
                let location = Waypoint::new(
                    (position_a.x + position_b.x) / 2.0,
                    (position_a.y + position_b.y) / 2.0,
                    (position_a.z + position_b.z) / 2.0,
                )?
                .at_time(time);
                let description = format!(
                    "Spatio-temporal conflict between {} and {} at ({:.2}, {:.2}, {:.2}) at {}.",
                    mission_a.drone_id(),
                    mission_b.drone_id(),
                    location.x,
                    location.y,
                    location.z,
                    time.format("%H:%M:%S"),
                );
                let conflict = Conflict::new(
                    location,
                    time,
                    vec![
                        mission_a.drone_id().to_string(),
                        mission_b.drone_id().to_string(),
                    ],
                    description,
                )?;
                return Ok(Some(conflict));
            }
        }
        time += Duration::seconds(1);
    }

    Ok(None)
}

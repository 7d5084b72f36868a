//! Coarse spatial pruning over two sampled trajectories.

use crate::error::ValidationError;
use crate::models::{duration_to_secs, Waypoint};

/// Width of the temporal prune window, in buffer-distances per second.
///
/// The prune compares a time gap in seconds against `buffer * TIME_PRUNE_FACTOR`,
/// where the buffer is a distance; the units do not line up, but the behavior
/// is tuned and kept as-is. Treat this factor as the knob to revisit if the
/// prune ever needs to be speed-aware.
pub const TIME_PRUNE_FACTOR: f64 = 2.0;

/// Scan every sample pair across two trajectories and emit the ones that are
/// suspiciously close: a time gap under `buffer * TIME_PRUNE_FACTOR` seconds
/// and a Euclidean distance under `buffer`.
///
/// The output is intentionally over-inclusive: many near-duplicate candidates
/// can describe the same physical encounter, and all of them are handed to the
/// temporal refiner. What this stage must never do is drop a pair that
/// genuinely breaches the buffer at coincident times.
pub fn find_candidates(
    trajectory_a: &[Waypoint],
    trajectory_b: &[Waypoint],
    safety_buffer: f64,
) -> Result<Vec<(Waypoint, Waypoint)>, ValidationError> {
    if !safety_buffer.is_finite() || safety_buffer <= 0.0 {
        return Err(ValidationError::NonPositiveBuffer {
            value: safety_buffer,
        });
    }

    let mut candidates = Vec::new();
    for sample_a in trajectory_a {
        for sample_b in trajectory_b {
            let (Some(time_a), Some(time_b)) = (sample_a.time, sample_b.time) else {
                continue;
            };
            let gap_secs = duration_to_secs(time_a - time_b).abs();
            if gap_secs < safety_buffer * TIME_PRUNE_FACTOR
                && sample_a.distance_to(sample_b) < safety_buffer
            {
                candidates.push((*sample_a, *sample_b));
            }
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mission;
    use crate::trajectory::interpolate_trajectory;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn wp(x: f64, y: f64, z: f64) -> Waypoint {
        Waypoint::new(x, y, z).unwrap()
    }

    fn line_mission(id: &str, from: (f64, f64, f64), to: (f64, f64, f64), secs: i64) -> Mission {
        let end = t0() + Duration::seconds(secs);
        Mission::new(
            id,
            vec![
                wp(from.0, from.1, from.2).at_time(t0()),
                wp(to.0, to.1, to.2).at_time(end),
            ],
            t0(),
            end,
        )
        .unwrap()
    }

    fn sampled(mission: &Mission) -> Vec<Waypoint> {
        interpolate_trajectory(mission, 1.0).unwrap()
    }

    #[test]
    fn parallel_lines_beyond_buffer_produce_no_candidates() {
        let a = line_mission("A", (0.0, 0.0, 0.0), (100.0, 0.0, 0.0), 100);
        let b = line_mission("B", (0.0, 50.0, 0.0), (100.0, 50.0, 0.0), 100);
        let candidates = find_candidates(&sampled(&a), &sampled(&b), 10.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn head_on_paths_produce_candidates() {
        let a = line_mission("A", (0.0, 0.0, 0.0), (100.0, 0.0, 0.0), 100);
        let b = line_mission("B", (100.0, 0.0, 0.0), (0.0, 0.0, 0.0), 100);
        let candidates = find_candidates(&sampled(&a), &sampled(&b), 10.0).unwrap();
        assert!(!candidates.is_empty());
        for (sample_a, sample_b) in &candidates {
            assert!(sample_a.distance_to(sample_b) < 10.0);
        }
    }

    #[test]
    fn altitude_separation_prunes_candidates() {
        let a = line_mission("A", (0.0, 0.0, 0.0), (100.0, 0.0, 0.0), 100);
        let b = line_mission("B", (0.0, 0.0, 50.0), (100.0, 0.0, 50.0), 100);
        let candidates = find_candidates(&sampled(&a), &sampled(&b), 10.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn time_gap_prune_skips_distant_in_time_pairs() {
        // Same spot, but B passes through long after A left.
        let a = line_mission("A", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), 60);
        let b = Mission::new(
            "B",
            vec![
                wp(0.0, 0.0, 0.0).at_time(t0() + Duration::seconds(600)),
                wp(10.0, 0.0, 0.0).at_time(t0() + Duration::seconds(660)),
            ],
            t0() + Duration::seconds(600),
            t0() + Duration::seconds(660),
        )
        .unwrap();
        let candidates = find_candidates(&sampled(&a), &sampled(&b), 10.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn coincident_pairs_survive_the_prune() {
        // Identical paths: every aligned sample pair must be emitted.
        let a = line_mission("A", (0.0, 0.0, 0.0), (50.0, 0.0, 0.0), 50);
        let b = line_mission("B", (0.0, 0.0, 0.0), (50.0, 0.0, 0.0), 50);
        let samples = sampled(&a);
        let candidates = find_candidates(&samples, &sampled(&b), 5.0).unwrap();
        assert!(candidates.len() >= samples.len());
    }

    #[test]
    fn rejects_non_positive_buffer() {
        let a = line_mission("A", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), 10);
        let samples = sampled(&a);
        assert!(matches!(
            find_candidates(&samples, &samples, 0.0),
            Err(ValidationError::NonPositiveBuffer { .. })
        ));
        assert!(matches!(
            find_candidates(&samples, &samples, -3.0),
            Err(ValidationError::NonPositiveBuffer { .. })
        ));
    }
}

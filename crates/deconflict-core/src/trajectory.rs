//! Time-parameterized trajectory sampling.
//!
//! Both operations are built on one segment-cursor sampler: waypoint times and
//! sample times are non-decreasing, so the cursor only ever moves forward and
//! a full interpolation pass is a linear merge over samples and waypoints.

use chrono::{DateTime, Duration, Utc};

use crate::error::ValidationError;
use crate::models::{duration_to_secs, secs_to_duration, Mission, Waypoint};

/// Sampling step used by the deconfliction system's precomputed trajectories.
pub const DEFAULT_TIME_STEP_SECS: f64 = 1.0;

/// Densely sample a mission's path, one waypoint every `time_step_secs` from
/// `start_time` through `end_time` inclusive.
///
/// The final sample is forced to land exactly on `end_time` even when the
/// mission duration is not a multiple of the step.
pub fn interpolate_trajectory(
    mission: &Mission,
    time_step_secs: f64,
) -> Result<Vec<Waypoint>, ValidationError> {
    if !time_step_secs.is_finite() || time_step_secs <= 0.0 {
        return Err(ValidationError::NonPositiveTimeStep {
            value: time_step_secs,
        });
    }
    let step = secs_to_duration(time_step_secs);
    // Sub-microsecond steps round to a zero Duration and would stall the
    // sampling loop below.
    if step <= Duration::zero() {
        return Err(ValidationError::NonPositiveTimeStep {
            value: time_step_secs,
        });
    }

    let mut samples = Vec::new();
    let mut cursor = 0usize;
    let mut time = mission.start_time();
    while time <= mission.end_time() {
        samples.push(sample_at(mission, time, &mut cursor));
        time += step;
    }

    let needs_final = samples
        .last()
        .and_then(|wp| wp.time)
        .map_or(true, |t| t < mission.end_time());
    if needs_final {
        samples.push(sample_at(mission, mission.end_time(), &mut cursor));
    }

    Ok(samples)
}

/// Exact position of the mission at `query_time`, or `None` outside the
/// mission's `[start_time, end_time]` window.
///
/// The returned waypoint carries `query_time` as its timestamp.
pub fn position_at(mission: &Mission, query_time: DateTime<Utc>) -> Option<Waypoint> {
    if query_time < mission.start_time() || query_time > mission.end_time() {
        return None;
    }
    let mut cursor = 0usize;
    Some(sample_at(mission, query_time, &mut cursor))
}

/// Sample the mission at `time`, advancing `cursor` to the segment whose start
/// waypoint is the latest one at or before `time`.
///
/// A zero-duration segment is an instantaneous jump: the cursor steps through
/// it, so a sample at the shared timestamp takes the later waypoint's
/// coordinates.
fn sample_at(mission: &Mission, time: DateTime<Utc>, cursor: &mut usize) -> Waypoint {
    let waypoints = mission.waypoints();
    while *cursor + 1 < waypoints.len()
        && waypoints[*cursor + 1].time.is_some_and(|wt| wt <= time)
    {
        *cursor += 1;
    }

    let wp1 = &waypoints[*cursor];
    if *cursor == waypoints.len() - 1 {
        // At or past the last waypoint: hold its position through end_time.
        return pinned(wp1, time);
    }

    let wp2 = &waypoints[*cursor + 1];
    let (Some(t1), Some(t2)) = (wp1.time, wp2.time) else {
        return pinned(wp1, time);
    };

    let span = duration_to_secs(t2 - t1);
    if span <= 0.0 {
        return pinned(wp2, time);
    }

    let alpha = duration_to_secs(time - t1) / span;
    Waypoint {
        x: wp1.x + alpha * (wp2.x - wp1.x),
        y: wp1.y + alpha * (wp2.y - wp1.y),
        z: wp1.z + alpha * (wp2.z - wp1.z),
        time: Some(time),
    }
}

fn pinned(wp: &Waypoint, time: DateTime<Utc>) -> Waypoint {
    Waypoint {
        x: wp.x,
        y: wp.y,
        z: wp.z,
        time: Some(time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn wp(x: f64, y: f64, z: f64) -> Waypoint {
        Waypoint::new(x, y, z).unwrap()
    }

    fn straight_mission() -> Mission {
        Mission::new(
            "D1",
            vec![
                wp(0.0, 0.0, 0.0).at_time(t0()),
                wp(100.0, 0.0, 0.0).at_time(t0() + Duration::seconds(300)),
            ],
            t0(),
            t0() + Duration::seconds(300),
        )
        .unwrap()
    }

    #[test]
    fn interpolation_samples_linearly() {
        let trajectory = interpolate_trajectory(&straight_mission(), 60.0).unwrap();
        assert_eq!(trajectory.len(), 6);
        for (i, sample) in trajectory.iter().enumerate() {
            assert_eq!(sample.time, Some(t0() + Duration::seconds(60 * i as i64)));
            assert!((sample.x - 20.0 * i as f64).abs() < 1e-9);
            assert_eq!(sample.y, 0.0);
        }
    }

    #[test]
    fn interpolation_forces_final_sample_on_misaligned_step() {
        let trajectory = interpolate_trajectory(&straight_mission(), 7.0).unwrap();
        // 0, 7, ..., 294 plus the forced sample at 300.
        assert_eq!(trajectory.len(), 44);
        let last = trajectory.last().unwrap();
        assert_eq!(last.time, Some(t0() + Duration::seconds(300)));
        assert!((last.x - 100.0).abs() < 1e-9);

        let first = trajectory.first().unwrap();
        assert_eq!(first.time, Some(t0()));
        assert_eq!(first.x, 0.0);
    }

    #[test]
    fn interpolation_handles_3d_segments() {
        let end = t0() + Duration::seconds(100);
        let mission = Mission::new(
            "D1",
            vec![
                wp(0.0, 0.0, 0.0).at_time(t0()),
                wp(100.0, 50.0, 80.0).at_time(end),
            ],
            t0(),
            end,
        )
        .unwrap();

        let trajectory = interpolate_trajectory(&mission, 25.0).unwrap();
        let quarter = &trajectory[1];
        assert!((quarter.x - 25.0).abs() < 1e-9);
        assert!((quarter.y - 12.5).abs() < 1e-9);
        assert!((quarter.z - 20.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_waypoints_pin_all_samples() {
        let end = t0() + Duration::seconds(30);
        let mission = Mission::new(
            "D1",
            vec![wp(7.0, 7.0, 7.0), wp(7.0, 7.0, 7.0)],
            t0(),
            end,
        )
        .unwrap();
        let trajectory = interpolate_trajectory(&mission, 10.0).unwrap();
        assert_eq!(trajectory.len(), 4);
        assert!(trajectory
            .iter()
            .all(|s| s.x == 7.0 && s.y == 7.0 && s.z == 7.0));
        assert_eq!(trajectory.first().unwrap().time, Some(t0()));
        assert_eq!(trajectory.last().unwrap().time, Some(end));
    }

    #[test]
    fn zero_duration_segment_jumps_to_later_waypoint() {
        let jump = t0() + Duration::seconds(10);
        let end = t0() + Duration::seconds(20);
        let mission = Mission::new(
            "D1",
            vec![
                wp(0.0, 0.0, 0.0).at_time(t0()),
                wp(10.0, 10.0, 0.0).at_time(jump),
                wp(20.0, 20.0, 0.0).at_time(jump),
                wp(30.0, 30.0, 0.0).at_time(end),
            ],
            t0(),
            end,
        )
        .unwrap();

        let trajectory = interpolate_trajectory(&mission, 1.0).unwrap();
        let at_jump = trajectory
            .iter()
            .find(|s| s.time == Some(jump))
            .unwrap();
        assert_eq!((at_jump.x, at_jump.y), (20.0, 20.0));

        // The point query agrees with the sampled trajectory.
        let queried = position_at(&mission, jump).unwrap();
        assert_eq!((queried.x, queried.y), (20.0, 20.0));

        // Interpolation resumes normally after the jump.
        let after = position_at(&mission, jump + Duration::seconds(5)).unwrap();
        assert!((after.x - 25.0).abs() < 1e-9);
    }

    #[test]
    fn position_at_is_none_outside_window() {
        let mission = straight_mission();
        assert!(position_at(&mission, t0() - Duration::seconds(1)).is_none());
        assert!(position_at(&mission, t0() + Duration::seconds(301)).is_none());
    }

    #[test]
    fn position_at_boundaries_match_endpoint_waypoints() {
        let mission = straight_mission();
        let at_start = position_at(&mission, t0()).unwrap();
        assert_eq!((at_start.x, at_start.y), (0.0, 0.0));
        assert_eq!(at_start.time, Some(t0()));

        let end = t0() + Duration::seconds(300);
        let at_end = position_at(&mission, end).unwrap();
        assert_eq!((at_end.x, at_end.y), (100.0, 0.0));
        assert_eq!(at_end.time, Some(end));
    }

    #[test]
    fn position_at_midpoint_of_straight_segment() {
        let mission = straight_mission();
        let query = t0() + Duration::seconds(150);
        let position = position_at(&mission, query).unwrap();
        assert!((position.x - 50.0).abs() < 1e-9);
        assert_eq!(position.y, 0.0);
        assert_eq!(position.time, Some(query));
    }

    #[test]
    fn interpolation_rejects_bad_step() {
        let mission = straight_mission();
        assert!(matches!(
            interpolate_trajectory(&mission, 0.0),
            Err(ValidationError::NonPositiveTimeStep { .. })
        ));
        assert!(matches!(
            interpolate_trajectory(&mission, -1.0),
            Err(ValidationError::NonPositiveTimeStep { .. })
        ));
        assert!(matches!(
            interpolate_trajectory(&mission, f64::NAN),
            Err(ValidationError::NonPositiveTimeStep { .. })
        ));
    }

    #[test]
    fn interpolation_rejects_submicrosecond_step() {
        // Steps below clock resolution round to a zero Duration; they must
        // error rather than sample forever without advancing.
        let mission = straight_mission();
        assert!(matches!(
            interpolate_trajectory(&mission, 1e-7),
            Err(ValidationError::NonPositiveTimeStep { .. })
        ));
        assert!(matches!(
            interpolate_trajectory(&mission, 4e-7),
            Err(ValidationError::NonPositiveTimeStep { .. })
        ));
    }
}

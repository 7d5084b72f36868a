//! Pre-defined demo scenarios for the deconfliction pipeline.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use deconflict_core::{Mission, Waypoint};

/// A named scenario: one primary mission checked against simulated traffic.
pub struct Scenario {
    pub name: &'static str,
    pub primary: Mission,
    pub simulated: Vec<Mission>,
}

pub fn all_scenarios(start: DateTime<Utc>) -> Result<Vec<Scenario>> {
    Ok(vec![
        conflict_free(start)?,
        direct_conflict(start)?,
        climb_and_cross(start)?,
    ])
}

fn wp(x: f64, y: f64, z: f64) -> Result<Waypoint> {
    Ok(Waypoint::new(x, y, z)?)
}

/// Parallel traffic 50 units away, plus a crossing path ten minutes later.
fn conflict_free(start: DateTime<Utc>) -> Result<Scenario> {
    let primary = Mission::new(
        "DroneA",
        vec![
            wp(0.0, 0.0, 0.0)?.at_time(start),
            wp(100.0, 0.0, 0.0)?.at_time(start + Duration::minutes(5)),
        ],
        start,
        start + Duration::minutes(5),
    )?;

    let parallel = Mission::new(
        "DroneB",
        vec![
            wp(0.0, 50.0, 0.0)?.at_time(start),
            wp(100.0, 50.0, 0.0)?.at_time(start + Duration::minutes(5)),
        ],
        start,
        start + Duration::minutes(5),
    )?;

    let late_cross = Mission::new(
        "DroneC",
        vec![
            wp(50.0, -20.0, 0.0)?.at_time(start + Duration::minutes(10)),
            wp(50.0, 70.0, 0.0)?.at_time(start + Duration::minutes(15)),
        ],
        start + Duration::minutes(10),
        start + Duration::minutes(15),
    )?;

    Ok(Scenario {
        name: "conflict_free",
        primary,
        simulated: vec![parallel, late_cross],
    })
}

/// Two diagonals crossing mid-field at the same time; one bystander far away.
fn direct_conflict(start: DateTime<Utc>) -> Result<Scenario> {
    let primary = Mission::new(
        "DroneA",
        vec![
            wp(0.0, 0.0, 0.0)?.at_time(start),
            wp(100.0, 100.0, 0.0)?.at_time(start + Duration::minutes(5)),
        ],
        start,
        start + Duration::minutes(5),
    )?;

    let opposing = Mission::new(
        "DroneB",
        vec![
            wp(100.0, 0.0, 0.0)?.at_time(start),
            wp(0.0, 100.0, 0.0)?.at_time(start + Duration::minutes(5)),
        ],
        start,
        start + Duration::minutes(5),
    )?;

    let distant = Mission::new(
        "DroneC",
        vec![
            wp(-50.0, -50.0, 0.0)?.at_time(start),
            wp(-60.0, -60.0, 0.0)?.at_time(start + Duration::minutes(2)),
        ],
        start,
        start + Duration::minutes(2),
    )?;

    Ok(Scenario {
        name: "direct_conflict",
        primary,
        simulated: vec![opposing, distant],
    })
}

/// A climbing primary with crossing traffic 50 units below its cruise
/// altitude and a high-level transit overhead. Clear with the default buffer.
fn climb_and_cross(start: DateTime<Utc>) -> Result<Scenario> {
    let primary = Mission::new(
        "DroneA",
        vec![
            wp(0.0, 0.0, 0.0)?.at_time(start),
            wp(50.0, 50.0, 100.0)?.at_time(start + Duration::minutes(2)),
            wp(100.0, 100.0, 100.0)?.at_time(start + Duration::minutes(4)),
        ],
        start,
        start + Duration::minutes(4),
    )?;

    let crossing_below = Mission::new(
        "DroneB",
        vec![
            wp(100.0, 0.0, 50.0)?.at_time(start + Duration::minutes(1)),
            wp(0.0, 100.0, 50.0)?.at_time(start + Duration::minutes(3)),
        ],
        start + Duration::minutes(1),
        start + Duration::minutes(3),
    )?;

    let overhead = Mission::new(
        "DroneC",
        vec![
            wp(0.0, 0.0, 200.0)?.at_time(start),
            wp(100.0, 100.0, 200.0)?.at_time(start + Duration::minutes(4)),
        ],
        start,
        start + Duration::minutes(4),
    )?;

    Ok(Scenario {
        name: "climb_and_cross",
        primary,
        simulated: vec![crossing_below, overhead],
    })
}

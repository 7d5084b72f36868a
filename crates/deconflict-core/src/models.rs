//! Core data models for mission deconfliction.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ValidationError;

/// A point in 3-space with an optional timestamp.
///
/// Two waypoints are equal iff all four fields match exactly. Every public
/// construction path goes through [`Waypoint::new`], which rejects NaN and
/// infinite coordinates; hashing uses the raw float bits so it agrees with
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WaypointSpec")]
pub struct Waypoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) time: Option<DateTime<Utc>>,
}

/// Raw waypoint as submitted by an operator; `z` and `time` are optional.
#[derive(Debug, Clone, Copy, Deserialize)]
struct WaypointSpec {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
}

impl TryFrom<WaypointSpec> for Waypoint {
    type Error = ValidationError;

    fn try_from(spec: WaypointSpec) -> Result<Self, ValidationError> {
        let waypoint = Waypoint::new(spec.x, spec.y, spec.z)?;
        Ok(match spec.time {
            Some(time) => waypoint.at_time(time),
            None => waypoint,
        })
    }
}

impl Waypoint {
    /// Create an untimed waypoint. Rejects NaN and infinite coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ValidationError> {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate);
        }
        Ok(Self {
            x,
            y,
            z,
            time: None,
        })
    }

    /// Attach a timestamp.
    pub fn at_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Euclidean distance to another waypoint, ignoring time.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Eq for Waypoint {}

impl Hash for Waypoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.z.to_bits().hash(state);
        self.time.hash(state);
    }
}

/// A drone's planned path: an ordered, timed waypoint sequence between a
/// start and end time.
///
/// Built through [`Mission::new`], which back-fills missing waypoint times and
/// rejects inconsistent input; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionSpec")]
pub struct Mission {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

/// Raw mission definition as submitted by an operator.
#[derive(Debug, Clone, Deserialize)]
struct MissionSpec {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<MissionSpec> for Mission {
    type Error = ValidationError;

    fn try_from(spec: MissionSpec) -> Result<Self, ValidationError> {
        Mission::new(spec.drone_id, spec.waypoints, spec.start_time, spec.end_time)
    }
}

impl Mission {
    /// Validate and finalize a mission.
    ///
    /// If any waypoint arrives without a time, times are assigned to the whole
    /// sequence: proportionally to cumulative path length, or evenly by index
    /// when all waypoints coincide. The first waypoint then sits exactly at
    /// `start_time` and the last exactly at `end_time`. Caller-provided times
    /// must lie within the mission window and be non-decreasing.
    pub fn new(
        drone_id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let drone_id = drone_id.into();
        if drone_id.is_empty() {
            return Err(ValidationError::EmptyDroneId);
        }
        if waypoints.len() < 2 {
            return Err(ValidationError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        if start_time >= end_time {
            return Err(ValidationError::StartNotBeforeEnd);
        }

        let mut waypoints = waypoints;
        if waypoints.iter().any(|wp| wp.time.is_none()) {
            assign_waypoint_times(&mut waypoints, start_time, end_time);
        } else {
            let mut prev = start_time;
            for time in waypoints.iter().filter_map(|wp| wp.time) {
                if time < start_time || time > end_time {
                    return Err(ValidationError::WaypointTimeOutOfWindow { time });
                }
                if time < prev {
                    return Err(ValidationError::WaypointTimesNotOrdered);
                }
                prev = time;
            }
        }

        Ok(Self {
            drone_id,
            waypoints,
            start_time,
            end_time,
        })
    }

    pub fn drone_id(&self) -> &str {
        &self.drone_id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Total mission duration.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Total length of the waypoint polyline.
    pub fn path_length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

/// Distribute times across the whole sequence. The first waypoint is pinned
/// to the mission start and the last to the mission end.
fn assign_waypoint_times(
    waypoints: &mut [Waypoint],
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) {
    let total_secs = duration_to_secs(end_time - start_time);
    let total_path: f64 = waypoints
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();
    let count = waypoints.len();

    if total_path == 0.0 {
        // All waypoints coincide; fall back to even spacing by index.
        for (i, wp) in waypoints.iter_mut().enumerate() {
            let fraction = i as f64 / (count - 1) as f64;
            wp.time = Some(start_time + secs_to_duration(total_secs * fraction));
        }
    } else {
        waypoints[0].time = Some(start_time);
        let mut covered = 0.0;
        for i in 1..count {
            covered += waypoints[i - 1].distance_to(&waypoints[i]);
            let fraction = covered / total_path;
            waypoints[i].time = Some(start_time + secs_to_duration(total_secs * fraction));
        }
    }

    if let Some(last) = waypoints.last_mut() {
        last.time = Some(end_time);
    }
}

pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    Duration::microseconds((secs * 1e6).round() as i64)
}

pub(crate) fn duration_to_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => duration.num_milliseconds() as f64 / 1e3,
    }
}

/// A confirmed spatio-temporal conflict between two missions.
///
/// Produced only by the temporal refiner; `conflicting_ids` is stored
/// deduplicated and lexicographically sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    location: Waypoint,
    time: DateTime<Utc>,
    conflicting_ids: Vec<String>,
    description: String,
}

impl Conflict {
    pub fn new(
        location: Waypoint,
        time: DateTime<Utc>,
        conflicting_ids: Vec<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if conflicting_ids.iter().any(|id| id.is_empty()) {
            return Err(ValidationError::MalformedConflictingIds);
        }
        let mut conflicting_ids = conflicting_ids;
        conflicting_ids.sort();
        conflicting_ids.dedup();
        if conflicting_ids.len() < 2 {
            return Err(ValidationError::MalformedConflictingIds);
        }

        Ok(Self {
            location,
            time,
            conflicting_ids,
            description,
        })
    }

    pub fn location(&self) -> &Waypoint {
        &self.location
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn conflicting_ids(&self) -> &[String] {
        &self.conflicting_ids
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Export shape consumed by external tooling.
    pub fn to_record(&self) -> ConflictRecord {
        ConflictRecord {
            location: (
                self.location.x,
                self.location.y,
                self.location.z,
                self.location.time,
            ),
            time: self.time.to_rfc3339(),
            conflicting_ids: self.conflicting_ids.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict at ({:.2}, {:.2}, {:.2}) at {} between [{}]",
            self.location.x,
            self.location.y,
            self.location.z,
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.conflicting_ids.join(", "),
        )
    }
}

/// Serialized conflict: location tuple, ISO-8601 time, sorted drone ids.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictRecord {
    pub location: (f64, f64, f64, Option<DateTime<Utc>>),
    pub time: String,
    pub conflicting_ids: Vec<String>,
    pub description: String,
}

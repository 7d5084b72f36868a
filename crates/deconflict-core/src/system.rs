//! Mission verification against a set of simulated flight schedules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{Conflict, Mission, Waypoint};
use crate::spatial::find_candidates;
use crate::temporal::refine_candidate;
use crate::trajectory::{interpolate_trajectory, DEFAULT_TIME_STEP_SECS};

/// Aggregated verdict for a verified mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Clear,
    Conflict,
}

/// Outcome of [`DeconflictionSystem::verify`].
///
/// `conflicts` is the raw refiner output in deterministic order: several
/// entries can describe the same physical encounter, one per confirmed
/// candidate pair. Callers wanting one record per encounter can collapse on
/// `(conflicting_ids, time)`.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub status: VerificationStatus,
    pub conflicts: Vec<Conflict>,
}

/// Verifies primary missions against a fixed set of simulated missions.
///
/// Reference trajectories are interpolated once at construction and reused for
/// every `verify` call; the cache is never mutated afterwards.
pub struct DeconflictionSystem {
    simulated_missions: Vec<Mission>,
    safety_buffer: f64,
    time_step_secs: f64,
    cached_trajectories: HashMap<String, Vec<Waypoint>>,
}

impl DeconflictionSystem {
    pub fn new(
        simulated_missions: Vec<Mission>,
        safety_buffer: f64,
    ) -> Result<Self, ValidationError> {
        Self::with_step(simulated_missions, safety_buffer, DEFAULT_TIME_STEP_SECS)
    }

    /// Build a system sampling trajectories every `time_step_secs` instead of
    /// the default one-second step. Coarser steps trade candidate recall for
    /// cache size.
    pub fn with_step(
        simulated_missions: Vec<Mission>,
        safety_buffer: f64,
        time_step_secs: f64,
    ) -> Result<Self, ValidationError> {
        if !safety_buffer.is_finite() || safety_buffer <= 0.0 {
            return Err(ValidationError::NonPositiveBuffer {
                value: safety_buffer,
            });
        }

        let mut cached_trajectories = HashMap::with_capacity(simulated_missions.len());
        for mission in &simulated_missions {
            let trajectory = interpolate_trajectory(mission, time_step_secs)?;
            cached_trajectories.insert(mission.drone_id().to_string(), trajectory);
        }
        debug!(
            missions = simulated_missions.len(),
            safety_buffer, time_step_secs, "simulated trajectories cached"
        );

        Ok(Self {
            simulated_missions,
            safety_buffer,
            time_step_secs,
            cached_trajectories,
        })
    }

    pub fn safety_buffer(&self) -> f64 {
        self.safety_buffer
    }

    pub fn time_step_secs(&self) -> f64 {
        self.time_step_secs
    }

    pub fn simulated_missions(&self) -> &[Mission] {
        &self.simulated_missions
    }

    /// Check a primary mission for spatio-temporal conflicts against every
    /// simulated mission, in the order given at construction.
    pub fn verify(&self, primary_mission: &Mission) -> Result<VerificationReport, ValidationError> {
        let primary_trajectory = interpolate_trajectory(primary_mission, self.time_step_secs)?;

        let mut conflicts = Vec::new();
        for simulated in &self.simulated_missions {
            let Some(simulated_trajectory) = self.cached_trajectories.get(simulated.drone_id())
            else {
                continue;
            };

            let candidates =
                find_candidates(&primary_trajectory, simulated_trajectory, self.safety_buffer)?;
            debug!(
                primary = primary_mission.drone_id(),
                simulated = simulated.drone_id(),
                candidates = candidates.len(),
                "spatial prune complete"
            );

            for (candidate_primary, candidate_simulated) in &candidates {
                if let Some(conflict) = refine_candidate(
                    primary_mission,
                    simulated,
                    candidate_primary,
                    candidate_simulated,
                    self.safety_buffer,
                )? {
                    conflicts.push(conflict);
                }
            }
        }

        let status = if conflicts.is_empty() {
            VerificationStatus::Clear
        } else {
            VerificationStatus::Conflict
        };
        Ok(VerificationReport { status, conflicts })
    }
}

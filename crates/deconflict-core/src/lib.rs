//! Spatio-temporal deconfliction for planned UAV missions.
//!
//! The pipeline verifies a primary mission against a set of simulated
//! missions: dense trajectory interpolation, a coarse spatial prune over
//! sample pairs, then an exact per-second temporal refinement of each
//! surviving candidate.

pub mod error;
pub mod models;
pub mod spatial;
pub mod system;
pub mod temporal;
pub mod trajectory;

pub use error::ValidationError;
pub use models::{Conflict, ConflictRecord, Mission, Waypoint};
pub use spatial::{find_candidates, TIME_PRUNE_FACTOR};
pub use system::{DeconflictionSystem, VerificationReport, VerificationStatus};
pub use temporal::{refine_candidate, refine_candidate_with_window};
pub use trajectory::{interpolate_trajectory, position_at, DEFAULT_TIME_STEP_SECS};

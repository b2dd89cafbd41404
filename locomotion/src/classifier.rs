//! Maps a kinematic snapshot to a gait, gated by the minimum dwell time.

use crate::config::{GaitThresholds, LocomotionConfig};
use crate::gait::GaitState;
use crate::snapshot::KinematicSnapshot;
use crate::state::DwellTimer;

/// Velocity/acceleration alignment below which motion counts as braking.
pub const REVERSAL_ALIGNMENT: f32 = -0.5;

impl GaitThresholds {
    /// All three floors are inclusive.
    #[must_use]
    pub fn admits(&self, snapshot: &KinematicSnapshot) -> bool {
        self.min_ground_speed <= snapshot.ground_speed
            && self.min_max_speed <= snapshot.max_speed
            && self.min_input_magnitude <= snapshot.input_magnitude()
    }
}

/// Chooses this frame's gait.
///
/// Falling wins immediately. Otherwise `current` is kept until the dwell
/// timer exceeds `min_time_in_state`.
#[must_use]
pub fn classify(
    snapshot: &KinematicSnapshot,
    dwell: &DwellTimer,
    current: GaitState,
    config: &LocomotionConfig,
) -> GaitState {
    if snapshot.is_falling {
        return GaitState::Jump;
    }

    if !dwell.exceeds(config.min_time_in_state) {
        return current;
    }

    classify_ground(snapshot, config)
}

/// Ground classification without the dwell gate.
#[must_use]
pub fn classify_ground(snapshot: &KinematicSnapshot, config: &LocomotionConfig) -> GaitState {
    if snapshot.velocity_acceleration_alignment() < REVERSAL_ALIGNMENT {
        return GaitState::Idle;
    }

    let thresholds = &config.thresholds;
    if snapshot.is_crouching {
        if thresholds.crouch.admits(snapshot) {
            return GaitState::Crouch;
        }
    } else if thresholds.jog.admits(snapshot) {
        return GaitState::Jog;
    } else if thresholds.walk.admits(snapshot) {
        return GaitState::Walk;
    }

    GaitState::Idle
}

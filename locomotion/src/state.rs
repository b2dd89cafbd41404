//! Mutable per-instance record threaded through every stage of a frame.

use crate::clip::AnimSelection;
use crate::gait::GaitState;
use crate::rotation::RotationState;
use crate::snapshot::KinematicSnapshot;

/// Time spent since the current gait was entered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DwellTimer {
    elapsed: f32,
}

impl DwellTimer {
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Strictly greater: a dwell of exactly `min` still holds the gate closed.
    #[must_use]
    pub fn exceeds(&self, min: f32) -> bool {
        self.elapsed > min
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocomotionState {
    pub gait: GaitState,
    /// Gait at the start of the current frame, before classification.
    pub previous_gait: GaitState,
    /// Gait the hooks last saw; `None` until the first processed frame.
    pub tracked_gait: Option<GaitState>,
    pub dwell: DwellTimer,
    pub snapshot: KinematicSnapshot,
    pub rotation: RotationState,
    pub selection: AnimSelection,
    pub play_rate: f32,
    /// Rest pose the last stop clip settles into (Idle or Crouch).
    pub post_stop_gait: GaitState,
    pub delta_time: f32,
}

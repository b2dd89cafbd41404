//! Locomotion animation state for a playable character.
//!
//! Each frame the [`LocomotionAnimator`] samples the movement collaborator,
//! classifies the motion into a [`GaitState`], fires per-gait hooks that pick
//! start, transition and stop clips, and after pose evaluation steers the
//! character's yaw toward its movement or input direction.

pub mod animator;
pub mod classifier;
pub mod clip;
pub mod config;
pub mod gait;
pub mod planner;
pub mod rotation;
pub mod snapshot;
pub mod start_selector;
pub mod state;
pub mod tracker;

pub use glam;

pub use animator::{CharacterTransform, LocomotionAnimator, LocomotionCharacter, LocomotionOutputs};
pub use classifier::{REVERSAL_ALIGNMENT, classify, classify_ground};
pub use clip::{AnimSelection, ClipEntry, ClipRef, CurveSampler, NoCurves, SelectionKind};
pub use config::{
    ClipConfig, ConfigError, CurveNames, GaitThresholds, LocomotionConfig, TransitionEntry,
    TransitionTiming,
};
pub use gait::{GaitState, MovingGait, PerGait};
pub use planner::{LOCOMOTION_HOOKS, PLAY_RATE_EPSILON, safe_play_rate};
pub use rotation::{
    RotationSettings, RotationSource, RotationState, blend_rotation, normalize_yaw,
    yaw_from_direction, yaw_from_rotation, yaw_to_rotation,
};
pub use snapshot::{KinematicSnapshot, MovementSource};
pub use start_selector::{StartClipSet, StartDirection, select_start_clip, start_direction};
pub use state::{DwellTimer, LocomotionState};
pub use tracker::{GaitHooks, HookCall, HookContext, HookTable, track_states};

/// Returns the locomotion crate version string.
pub fn locomotion_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

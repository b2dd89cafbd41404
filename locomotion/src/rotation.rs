//! Facing-direction smoothing applied after pose evaluation.
//!
//! Yaw is in degrees, clockwise when seen from above, with 0 facing -Z.
//! Positive angles turn right, negative angles turn left.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::gait::GaitState;
use crate::snapshot::KinematicSnapshot;

const NEARLY_ZERO_YAW: f32 = 1.0e-4;
const DEGENERATE_DIRECTION_SQ: f32 = 1.0e-8;

/// Wraps a yaw into (-180, 180].
#[must_use]
pub fn normalize_yaw(yaw: f32) -> f32 {
    let wrapped = yaw % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Shortest signed turn from `from` to `to`.
#[must_use]
pub fn delta_yaw(to: f32, from: f32) -> f32 {
    normalize_yaw(to - from)
}

/// Heading of a direction on the ground plane, or `None` when it has no horizontal extent.
#[must_use]
pub fn yaw_from_direction(direction: Vec3) -> Option<f32> {
    if direction.x * direction.x + direction.z * direction.z < DEGENERATE_DIRECTION_SQ {
        return None;
    }
    Some(direction.x.atan2(-direction.z).to_degrees())
}

#[must_use]
pub fn yaw_to_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw.to_radians())
}

#[must_use]
pub fn yaw_from_rotation(rotation: Quat) -> f32 {
    yaw_from_direction(rotation * Vec3::NEG_Z).unwrap_or(0.0)
}

/// Moves `current` toward `target` by at most `speed * dt` degrees.
#[must_use]
pub fn interp_yaw_constant(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if dt == 0.0 || current == target {
        return current;
    }
    if speed <= 0.0 {
        return target;
    }

    let step = speed * dt;
    normalize_yaw(current + delta_yaw(target, current).clamp(-step, step))
}

/// Moves `current` toward `target` by the fraction `speed * dt` of the remaining turn.
#[must_use]
pub fn interp_yaw(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if dt == 0.0 || current == target {
        return current;
    }
    if speed <= 0.0 {
        return target;
    }

    let delta = delta_yaw(target, current);
    if delta.abs() < NEARLY_ZERO_YAW {
        return target;
    }
    normalize_yaw(current + delta * (speed * dt).clamp(0.0, 1.0))
}

/// Which kinematic vector the character turns to face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationSource {
    #[default]
    Input,
    Velocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub source: RotationSource,
    /// Hard turn-rate limit of the primary target, degrees per second.
    pub primary_interp_speed: f32,
    /// Exponential lag of the secondary target behind the primary.
    pub secondary_interp_speed: f32,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            source: RotationSource::Input,
            primary_interp_speed: 540.0,
            secondary_interp_speed: 10.0,
        }
    }
}

/// Target and start yaws tracked across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub primary_target_yaw: f32,
    pub secondary_target_yaw: f32,
    pub start_yaw: f32,
    /// Target minus start yaw at the last moving-gait entry, in (-180, 180].
    pub start_angle: f32,
}

impl RotationState {
    pub fn reset_targets(&mut self, world_yaw: f32) {
        self.primary_target_yaw = world_yaw;
        self.secondary_target_yaw = world_yaw;
    }

    /// Records the start yaw and the signed angle toward `desired_yaw`.
    ///
    /// A missing desired yaw means "straight ahead".
    pub fn record_start(&mut self, world_yaw: f32, desired_yaw: Option<f32>) {
        self.start_yaw = world_yaw;
        self.start_angle = delta_yaw(desired_yaw.unwrap_or(world_yaw), world_yaw);
    }
}

/// Desired facing yaw for the configured source.
#[must_use]
pub fn desired_yaw(snapshot: &KinematicSnapshot, source: RotationSource) -> Option<f32> {
    match source {
        RotationSource::Input => yaw_from_direction(snapshot.input_vector),
        RotationSource::Velocity => yaw_from_direction(snapshot.velocity),
    }
}

/// Runs the two-stage smoothing and returns the new world yaw.
///
/// Outside the moving gaits both targets snap to `world_yaw` and `None` is
/// returned: the character's rotation is left alone.
pub fn blend_rotation(
    rotation: &mut RotationState,
    gait: GaitState,
    snapshot: &KinematicSnapshot,
    settings: &RotationSettings,
    world_yaw: f32,
    rotation_delta: f32,
    dt: f32,
) -> Option<f32> {
    if !gait.is_moving() {
        rotation.reset_targets(world_yaw);
        return None;
    }

    // Degenerate direction: keep turning toward the last target.
    if let Some(target) = desired_yaw(snapshot, settings.source) {
        rotation.primary_target_yaw = interp_yaw_constant(
            rotation.primary_target_yaw,
            target,
            dt,
            settings.primary_interp_speed,
        );
    }
    rotation.secondary_target_yaw = interp_yaw(
        rotation.secondary_target_yaw,
        rotation.primary_target_yaw,
        dt,
        settings.secondary_interp_speed,
    );

    Some(normalize_yaw(rotation.secondary_target_yaw + rotation_delta))
}

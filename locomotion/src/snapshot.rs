//! Per-frame copy of the movement collaborator's kinematic state.
//!
//! World space is Y-up; the ground plane is XZ.

use glam::{Vec2, Vec3};

/// Read-only view of the physical movement simulation.
pub trait MovementSource {
    fn velocity(&self) -> Vec3;
    fn current_acceleration(&self) -> Vec3;
    fn max_speed(&self) -> f32;
    fn is_falling(&self) -> bool;
    fn is_crouching(&self) -> bool;
    /// Last normalized input direction; may be zero.
    fn last_input_vector(&self) -> Vec3;
}

/// Kinematic values captured once at the start of the pre-evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicSnapshot {
    pub velocity: Vec3,
    /// Horizontal speed, forced to zero while airborne.
    pub ground_speed: f32,
    pub max_speed: f32,
    pub is_falling: bool,
    pub is_crouching: bool,
    pub input_vector: Vec3,
    pub acceleration: Vec3,
}

impl KinematicSnapshot {
    /// Copies every field from the collaborator; nothing carries over from the last frame.
    pub fn sample<M: MovementSource + ?Sized>(movement: &M) -> Self {
        let velocity = movement.velocity();
        let is_falling = movement.is_falling();

        Self {
            velocity,
            ground_speed: if is_falling {
                0.0
            } else {
                horizontal_speed(velocity)
            },
            max_speed: movement.max_speed(),
            is_falling,
            is_crouching: movement.is_crouching(),
            input_vector: movement.last_input_vector(),
            acceleration: movement.current_acceleration(),
        }
    }

    #[must_use]
    pub fn input_magnitude(&self) -> f32 {
        self.input_vector.length()
    }

    /// Dot product of the unit velocity and unit acceleration directions.
    ///
    /// Zero when either vector is zero.
    #[must_use]
    pub fn velocity_acceleration_alignment(&self) -> f32 {
        self.velocity
            .normalize_or_zero()
            .dot(self.acceleration.normalize_or_zero())
    }
}

#[must_use]
pub fn horizontal_speed(velocity: Vec3) -> f32 {
    Vec2::new(velocity.x, velocity.z).length()
}

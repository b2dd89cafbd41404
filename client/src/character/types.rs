use bevy::prelude::*;
use locomotion::glam;
use locomotion::{CharacterTransform, CurveSampler, LocomotionAnimator, LocomotionCharacter, MovementSource};
use std::collections::HashMap;

/// Marker for the root entity of a playable character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CharacterRoot;

/// Kinematic state of a character, written by the character controller.
///
/// The locomotion systems only read it. `input` is the desired direction on the
/// XZ plane; its length is the input magnitude.
#[derive(Component, Debug, Clone, Default)]
pub struct CharacterMovement {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub max_speed: f32,
    pub input: Vec3,
    pub falling: bool,
    pub crouching: bool,
}

impl CharacterMovement {
    pub fn with_input(input: Vec3, max_speed: f32) -> Self {
        Self {
            input,
            max_speed,
            ..Default::default()
        }
    }
}

fn to_core(v: Vec3) -> glam::Vec3 {
    glam::Vec3::from_array(v.to_array())
}

impl MovementSource for CharacterMovement {
    fn velocity(&self) -> glam::Vec3 {
        to_core(self.velocity)
    }
    fn current_acceleration(&self) -> glam::Vec3 {
        to_core(self.acceleration)
    }
    fn max_speed(&self) -> f32 {
        self.max_speed
    }
    fn is_falling(&self) -> bool {
        self.falling
    }
    fn is_crouching(&self) -> bool {
        self.crouching
    }
    fn last_input_vector(&self) -> glam::Vec3 {
        to_core(self.input)
    }
}

/// Named float curves sampled from the currently evaluated pose.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationCurves {
    values: HashMap<String, f32>,
}

impl AnimationCurves {
    pub fn set(&mut self, name: &str, value: f32) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl CurveSampler for AnimationCurves {
    fn curve_value(&self, name: &str) -> f32 {
        self.values.curve_value(name)
    }
}

/// Locomotion animation instance. `owner` is the character root it reads from and steers.
#[derive(Component, Debug, Clone)]
pub struct CharacterLocomotion {
    pub owner: Option<Entity>,
    pub animator: LocomotionAnimator,
}

impl CharacterLocomotion {
    pub fn new(owner: Option<Entity>, animator: LocomotionAnimator) -> Self {
        Self { owner, animator }
    }
}

/// Read-only view of the owner used by the pre-evaluation pass.
pub(crate) struct OwnerView<'a> {
    pub movement: &'a CharacterMovement,
    pub transform: &'a Transform,
}

impl LocomotionCharacter for OwnerView<'_> {
    fn movement(&self) -> &dyn MovementSource {
        self.movement
    }
    fn world_yaw(&self) -> f32 {
        transform_yaw(self.transform)
    }
}

/// Mutable root transform used by the post-evaluation pass.
pub(crate) struct RootTransform<'a>(pub &'a mut Transform);

impl CharacterTransform for RootTransform<'_> {
    fn world_yaw(&self) -> f32 {
        transform_yaw(self.0)
    }
    fn set_world_yaw(&mut self, yaw: f32) {
        let rotation = locomotion::yaw_to_rotation(yaw);
        self.0.rotation = Quat::from_array(rotation.to_array());
    }
}

/// Facing of `transform` in degrees, clockwise from above with 0 looking down -Z.
pub fn transform_yaw(transform: &Transform) -> f32 {
    locomotion::yaw_from_rotation(glam::Quat::from_array(transform.rotation.to_array()))
}

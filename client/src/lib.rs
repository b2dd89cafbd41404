//! Bevy integration of the locomotion animation state machine.

pub mod character;
pub mod plugin;

pub use plugin::{LocomotionPlugin, LocomotionSettings, LocomotionSystems};

//! Gait classifications tracked by the locomotion state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutually exclusive locomotion classification of the character.
///
/// Declaration order is the hook dispatch order: Idle, Walk, Jog, Crouch, Jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitState {
    #[default]
    Idle,
    Walk,
    Jog,
    Crouch,
    Jump,
}

impl GaitState {
    pub const COUNT: usize = 5;

    pub const ALL: [GaitState; GaitState::COUNT] = [
        GaitState::Idle,
        GaitState::Walk,
        GaitState::Jog,
        GaitState::Crouch,
        GaitState::Jump,
    ];

    /// Position of this state in dispatch tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for the ground gaits that drive start/transition clips and rotation.
    #[must_use]
    pub const fn is_moving(self) -> bool {
        matches!(self, GaitState::Walk | GaitState::Jog | GaitState::Crouch)
    }

    #[must_use]
    pub const fn moving(self) -> Option<MovingGait> {
        match self {
            GaitState::Walk => Some(MovingGait::Walk),
            GaitState::Jog => Some(MovingGait::Jog),
            GaitState::Crouch => Some(MovingGait::Crouch),
            GaitState::Idle | GaitState::Jump => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GaitState::Idle => "Idle",
            GaitState::Walk => "Walk",
            GaitState::Jog => "Jog",
            GaitState::Crouch => "Crouch",
            GaitState::Jump => "Jump",
        }
    }
}

impl fmt::Display for GaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The subset of [`GaitState`] with start clips, transitions and a play-rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovingGait {
    Walk,
    Jog,
    Crouch,
}

impl MovingGait {
    pub const ALL: [MovingGait; 3] = [MovingGait::Walk, MovingGait::Jog, MovingGait::Crouch];

    #[must_use]
    pub const fn gait(self) -> GaitState {
        match self {
            MovingGait::Walk => GaitState::Walk,
            MovingGait::Jog => GaitState::Jog,
            MovingGait::Crouch => GaitState::Crouch,
        }
    }
}

/// One value per moving gait, used for thresholds and clip sets.
///
/// Deserializing fills missing gaits from the `Default` of the concrete `PerGait<T>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerGait<T> {
    pub walk: T,
    pub jog: T,
    pub crouch: T,
}

impl<T> PerGait<T> {
    pub const fn new(walk: T, jog: T, crouch: T) -> Self {
        Self { walk, jog, crouch }
    }

    pub fn get(&self, gait: MovingGait) -> &T {
        match gait {
            MovingGait::Walk => &self.walk,
            MovingGait::Jog => &self.jog,
            MovingGait::Crouch => &self.crouch,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MovingGait, &T)> {
        MovingGait::ALL.into_iter().map(move |gait| (gait, self.get(gait)))
    }
}

pub mod animation;
pub mod types;

pub use animation::{
    LocomotionAnimationBound, LocomotionClipLibrary, bind_locomotion_animation_players,
    initialize_locomotion_clip_library, play_selected_locomotion_clips,
};
pub use types::{
    AnimationCurves, CharacterLocomotion, CharacterMovement, CharacterRoot, transform_yaw,
};

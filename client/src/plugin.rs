use crate::character::types::{OwnerView, RootTransform};
use crate::character::{
    AnimationCurves, CharacterLocomotion, CharacterMovement, CharacterRoot, LocomotionClipLibrary,
    bind_locomotion_animation_players, initialize_locomotion_clip_library,
    play_selected_locomotion_clips,
};
use bevy::app::AnimationSystems;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use locomotion::{CurveSampler, LocomotionAnimator, LocomotionConfig, NoCurves};
use std::path::PathBuf;

/// Tuning file shipped with the `locomotion` crate.
pub const DEFAULT_CONFIG_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../locomotion/config/locomotion.yaml");

#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum LocomotionSystems {
    /// Samples, classifies and fires gait hooks (Update).
    PreEvaluate,
    /// Starts selected clips on animation players (PostUpdate, before animation).
    ApplyClips,
    /// Blends root yaw and clears one-frame pulses (PostUpdate, after animation).
    PostEvaluate,
}

/// Config handed to every locomotion instance attached by the plugin.
#[derive(Resource, Debug, Clone, Default)]
pub struct LocomotionSettings {
    pub config: LocomotionConfig,
}

pub struct LocomotionPlugin {
    config: Option<LocomotionConfig>,
    config_path: PathBuf,
}

impl Default for LocomotionPlugin {
    fn default() -> Self {
        Self {
            config: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}

impl LocomotionPlugin {
    pub fn with_config(config: LocomotionConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn with_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: None,
            config_path: path.into(),
        }
    }
}

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => LocomotionConfig::load_or_default(&self.config_path),
        };

        app.insert_resource(LocomotionSettings { config })
            .configure_sets(
                PostUpdate,
                (
                    LocomotionSystems::ApplyClips.before(AnimationSystems),
                    LocomotionSystems::PostEvaluate
                        .after(AnimationSystems)
                        .before(TransformSystems::Propagate),
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (attach_locomotion_to_characters, pre_evaluate_locomotion)
                    .chain()
                    .in_set(LocomotionSystems::PreEvaluate),
            )
            .add_systems(
                Update,
                (
                    initialize_locomotion_clip_library,
                    bind_locomotion_animation_players,
                )
                    .chain()
                    .run_if(resource_exists::<LocomotionClipLibrary>),
            )
            .add_systems(
                PostUpdate,
                play_selected_locomotion_clips
                    .in_set(LocomotionSystems::ApplyClips)
                    .run_if(resource_exists::<LocomotionClipLibrary>),
            )
            .add_systems(
                PostUpdate,
                post_evaluate_locomotion.in_set(LocomotionSystems::PostEvaluate),
            );
    }
}

/// Give every moving character root its own locomotion instance.
pub fn attach_locomotion_to_characters(
    mut commands: Commands,
    settings: Res<LocomotionSettings>,
    characters: Query<
        Entity,
        (
            With<CharacterRoot>,
            With<CharacterMovement>,
            Without<CharacterLocomotion>,
        ),
    >,
) {
    for entity in &characters {
        let animator = LocomotionAnimator::new(settings.config.clone());
        commands
            .entity(entity)
            .insert(CharacterLocomotion::new(Some(entity), animator))
            .insert_if_new(AnimationCurves::default());
    }
}

fn curve_source(curves: Option<&AnimationCurves>) -> &dyn CurveSampler {
    match curves {
        Some(curves) => curves,
        None => &NoCurves,
    }
}

pub fn pre_evaluate_locomotion(
    time: Res<Time>,
    mut instances: Query<(&mut CharacterLocomotion, Option<&AnimationCurves>)>,
    owners: Query<(&CharacterMovement, &Transform)>,
) {
    let dt = time.delta_secs();

    for (mut instance, curves) in &mut instances {
        let view = instance
            .owner
            .and_then(|entity| owners.get(entity).ok())
            .map(|(movement, transform)| OwnerView {
                movement,
                transform,
            });

        instance
            .animator
            .update(view.as_ref(), curve_source(curves), dt);
    }
}

pub fn post_evaluate_locomotion(
    mut instances: Query<(&mut CharacterLocomotion, Option<&AnimationCurves>)>,
    mut owners: Query<&mut Transform>,
) {
    for (mut instance, curves) in &mut instances {
        let mut root = instance
            .owner
            .and_then(|entity| owners.get_mut(entity).ok())
            .map(|transform| RootTransform(transform.into_inner()));

        instance
            .animator
            .post_evaluate(root.as_mut(), curve_source(curves));
    }
}

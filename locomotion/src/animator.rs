//! Per-frame driver: the pre-evaluation and post-evaluation passes.

use log::debug;

use crate::classifier::classify;
use crate::clip::{AnimSelection, CurveSampler};
use crate::config::LocomotionConfig;
use crate::gait::GaitState;
use crate::planner::LOCOMOTION_HOOKS;
use crate::rotation::blend_rotation;
use crate::snapshot::{KinematicSnapshot, MovementSource};
use crate::state::LocomotionState;
use crate::tracker::{HookContext, track_states};

/// World-facing of the owning character.
pub trait CharacterTransform {
    fn world_yaw(&self) -> f32;
    fn set_world_yaw(&mut self, yaw: f32);
}

/// The owning character as seen by the pre-evaluation pass.
pub trait LocomotionCharacter {
    fn movement(&self) -> &dyn MovementSource;
    fn world_yaw(&self) -> f32;
}

/// Values the blend collaborator reads after the pre-evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct LocomotionOutputs<'a> {
    pub gait: GaitState,
    pub previous_gait: GaitState,
    pub play_rate: f32,
    pub ground_speed: f32,
    pub selection: &'a AnimSelection,
    pub post_stop_gait: GaitState,
    pub start_angle: f32,
    pub snapshot: &'a KinematicSnapshot,
}

/// Owns the locomotion state of one character.
#[derive(Debug, Clone)]
pub struct LocomotionAnimator {
    config: LocomotionConfig,
    state: LocomotionState,
}

impl Default for LocomotionAnimator {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

impl LocomotionAnimator {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            state: LocomotionState::default(),
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn gait(&self) -> GaitState {
        self.state.gait
    }

    /// Pre-evaluation pass: sample, classify, dispatch hooks.
    ///
    /// Skips the frame and returns `false` when `character` is missing.
    pub fn update<C>(
        &mut self,
        character: Option<&C>,
        curves: &dyn CurveSampler,
        delta_seconds: f32,
    ) -> bool
    where
        C: LocomotionCharacter + ?Sized,
    {
        let Some(character) = character else {
            return false;
        };

        let state = &mut self.state;
        state.delta_time = delta_seconds;
        state.snapshot = KinematicSnapshot::sample(character.movement());

        state.previous_gait = state.gait;
        if !state.snapshot.is_falling {
            state.dwell.advance(delta_seconds);
        }
        state.gait = classify(&state.snapshot, &state.dwell, state.gait, &self.config);

        let mut ctx = HookContext {
            state,
            config: &self.config,
            curves,
            world_yaw: character.world_yaw(),
        };
        if track_states(&LOCOMOTION_HOOKS, &mut ctx) {
            debug!(
                "locomotion {} -> {}",
                self.state.previous_gait, self.state.gait
            );
        }
        true
    }

    /// Post-evaluation pass: rotation blending, then the one-frame pulses are cleared.
    ///
    /// Skips the frame and returns `false` when `character` is missing.
    pub fn post_evaluate<C>(&mut self, character: Option<&mut C>, curves: &dyn CurveSampler) -> bool
    where
        C: CharacterTransform + ?Sized,
    {
        let Some(character) = character else {
            return false;
        };

        let state = &mut self.state;
        let rotation_delta = curves.curve_value(&self.config.curves.rotation);
        if let Some(yaw) = blend_rotation(
            &mut state.rotation,
            state.gait,
            &state.snapshot,
            &self.config.rotation,
            character.world_yaw(),
            rotation_delta,
            state.delta_time,
        ) {
            character.set_world_yaw(yaw);
        }

        state.selection.clear_pulses();
        true
    }

    pub fn outputs(&self) -> LocomotionOutputs<'_> {
        LocomotionOutputs {
            gait: self.state.gait,
            previous_gait: self.state.previous_gait,
            play_rate: self.state.play_rate,
            ground_speed: self.state.snapshot.ground_speed,
            selection: &self.state.selection,
            post_stop_gait: self.state.post_stop_gait,
            start_angle: self.state.rotation.start_angle,
            snapshot: &self.state.snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::NoCurves;
    use glam::Vec3;

    #[derive(Default)]
    struct Body {
        velocity: Vec3,
        falling: bool,
        yaw: f32,
    }

    impl MovementSource for Body {
        fn velocity(&self) -> Vec3 {
            self.velocity
        }
        fn current_acceleration(&self) -> Vec3 {
            self.velocity
        }
        fn max_speed(&self) -> f32 {
            2.0
        }
        fn is_falling(&self) -> bool {
            self.falling
        }
        fn is_crouching(&self) -> bool {
            false
        }
        fn last_input_vector(&self) -> Vec3 {
            self.velocity.normalize_or_zero()
        }
    }

    impl LocomotionCharacter for Body {
        fn movement(&self) -> &dyn MovementSource {
            self
        }
        fn world_yaw(&self) -> f32 {
            self.yaw
        }
    }

    impl CharacterTransform for Body {
        fn world_yaw(&self) -> f32 {
            self.yaw
        }
        fn set_world_yaw(&mut self, yaw: f32) {
            self.yaw = yaw;
        }
    }

    #[test]
    fn missing_character_skips_both_passes() {
        let mut animator = LocomotionAnimator::default();

        assert!(!animator.update(None::<&Body>, &NoCurves, 0.1));
        assert!(!animator.post_evaluate(None::<&mut Body>, &NoCurves));
        assert_eq!(animator.state(), &LocomotionState::default());
    }

    #[test]
    fn first_frame_enters_idle_with_stop_selection() {
        let mut animator = LocomotionAnimator::default();
        let body = Body::default();

        assert!(animator.update(Some(&body), &NoCurves, 0.0));
        assert_eq!(animator.gait(), GaitState::Idle);
        assert_eq!(animator.state().tracked_gait, Some(GaitState::Idle));
        assert_eq!(
            animator.state().selection.clip.as_ref().map(|c| c.name()),
            Some("walk_stop")
        );
    }

    #[test]
    fn falling_does_not_advance_dwell() {
        let mut animator = LocomotionAnimator::default();
        let body = Body {
            falling: true,
            ..Default::default()
        };

        animator.update(Some(&body), &NoCurves, 0.1);
        animator.update(Some(&body), &NoCurves, 0.1);

        assert_eq!(animator.gait(), GaitState::Jump);
        assert_eq!(animator.state().dwell.elapsed(), 0.0);
    }

    #[test]
    fn pulses_last_exactly_one_frame() {
        let mut animator = LocomotionAnimator::default();
        let mut body = Body {
            velocity: Vec3::new(0.0, 0.0, -1.0),
            ..Default::default()
        };

        animator.update(Some(&body), &NoCurves, 0.0);
        animator.post_evaluate(Some(&mut body), &NoCurves);
        animator.update(Some(&body), &NoCurves, 0.2);
        assert_eq!(animator.gait(), GaitState::Walk);
        assert!(animator.outputs().selection.play_start_anim);

        animator.post_evaluate(Some(&mut body), &NoCurves);
        assert!(!animator.outputs().selection.any_pulse());

        animator.update(Some(&body), &NoCurves, 0.016);
        assert_eq!(animator.gait(), GaitState::Walk);
        assert!(!animator.outputs().selection.any_pulse());
    }
}

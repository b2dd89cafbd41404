//! Gait hooks: start, transition and stop clip selection plus play-rate.

use log::debug;

use crate::clip::SelectionKind;
use crate::config::TransitionTiming;
use crate::gait::{GaitState, MovingGait};
use crate::rotation::yaw_from_direction;
use crate::start_selector::select_start_clip;
use crate::tracker::{GaitHooks, HookContext, HookTable};

/// Speed-curve samples at or below this magnitude yield a zero play-rate.
pub const PLAY_RATE_EPSILON: f32 = 1.0e-4;

/// Dispatch table used by the animator, in [`GaitState::ALL`] order.
pub const LOCOMOTION_HOOKS: HookTable<'static> = [
    &IdleHooks,
    &MovingGaitHooks(MovingGait::Walk),
    &MovingGaitHooks(MovingGait::Jog),
    &MovingGaitHooks(MovingGait::Crouch),
    &JumpHooks,
];

/// Ground speed over the authored clip speed; zero for a vanishing divisor.
#[must_use]
pub fn safe_play_rate(ground_speed: f32, speed_curve: f32) -> f32 {
    if speed_curve.abs() <= PLAY_RATE_EPSILON {
        0.0
    } else {
        ground_speed / speed_curve
    }
}

pub struct IdleHooks;

impl GaitHooks for IdleHooks {
    fn on_enter(&self, ctx: &mut HookContext<'_>) {
        ctx.state.rotation.reset_targets(ctx.world_yaw);
        select_stop(ctx);
    }
}

pub struct MovingGaitHooks(pub MovingGait);

impl GaitHooks for MovingGaitHooks {
    fn on_enter(&self, ctx: &mut HookContext<'_>) {
        plan_entry(self.0, ctx);
    }

    fn while_active(&self, ctx: &mut HookContext<'_>) {
        let speed_curve = ctx.curves.curve_value(&ctx.config.curves.speed);
        ctx.state.play_rate = safe_play_rate(ctx.state.snapshot.ground_speed, speed_curve);
    }
}

pub struct JumpHooks;

impl GaitHooks for JumpHooks {}

fn plan_entry(gait: MovingGait, ctx: &mut HookContext<'_>) {
    let config = ctx.config;
    let state = &mut *ctx.state;
    let desired = yaw_from_direction(state.snapshot.input_vector);
    state.rotation.record_start(ctx.world_yaw, desired);

    let previous = state.previous_gait;
    let eligible_for_start =
        state.snapshot.ground_speed < *config.start_anim_max_speed.get(gait);

    if previous == GaitState::Idle || eligible_for_start {
        let target = desired.unwrap_or(ctx.world_yaw);
        state.rotation.primary_target_yaw = target;
        state.rotation.secondary_target_yaw = target;

        let entry = select_start_clip(config.clips.start.get(gait), state.rotation.start_angle);
        state.selection.select_entry(entry, SelectionKind::Start);
        state.selection.play_start_anim = true;
        debug!(
            "start clip {} at {:.2}s for {} (start angle {:.1})",
            entry.clip,
            entry.start_time,
            gait.gait(),
            state.rotation.start_angle
        );
        return;
    }

    state.selection.play_gait_transition_anim = true;
    let Some(transition) = config.clips.transition(previous, gait.gait()) else {
        debug!("no transition clip from {} to {}", previous, gait.gait());
        return;
    };

    let start_time = match &transition.timing {
        TransitionTiming::Fixed { seconds } => *seconds,
        TransitionTiming::Curve { name } => ctx.curves.curve_value(name),
    };
    state
        .selection
        .select(&transition.clip, start_time, SelectionKind::GaitTransition);
    debug!(
        "transition clip {} at {:.2}s for {} -> {}",
        transition.clip,
        start_time,
        previous,
        gait.gait()
    );
}

// Leaving Crouch is checked before the speed split.
fn select_stop(ctx: &mut HookContext<'_>) {
    let clips = &ctx.config.clips;
    let state = &mut *ctx.state;

    let (entry, rest) = if state.previous_gait == GaitState::Crouch {
        (&clips.crouch_stop, GaitState::Crouch)
    } else if state.snapshot.ground_speed > ctx.config.jog_stop_speed_limit {
        (&clips.jog_stop, GaitState::Idle)
    } else {
        (&clips.walk_stop, GaitState::Idle)
    };

    state.selection.select_entry(entry, SelectionKind::Stop);
    state.post_stop_gait = rest;
    debug!("stop clip {} at {:.2}s", entry.clip, entry.start_time);
}

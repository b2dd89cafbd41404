//! Edge-triggered dispatch of per-gait hooks.
//!
//! Every frame each gait receives exactly one call, in [`GaitState::ALL`]
//! order: `on_enter` or `while_active` for the chosen gait, `on_exit` for the
//! gait that was just left, `while_inactive` for the rest.

use crate::clip::CurveSampler;
use crate::config::LocomotionConfig;
use crate::gait::GaitState;
use crate::state::LocomotionState;

/// Everything a hook may read or write during the pre-evaluation pass.
pub struct HookContext<'a> {
    pub state: &'a mut LocomotionState,
    pub config: &'a LocomotionConfig,
    pub curves: &'a dyn CurveSampler,
    pub world_yaw: f32,
}

pub trait GaitHooks {
    fn on_enter(&self, _ctx: &mut HookContext<'_>) {}
    fn on_exit(&self, _ctx: &mut HookContext<'_>) {}
    fn while_active(&self, _ctx: &mut HookContext<'_>) {}
    fn while_inactive(&self, _ctx: &mut HookContext<'_>) {}
}

/// Hooks indexed by [`GaitState::index`].
pub type HookTable<'a> = [&'a dyn GaitHooks; GaitState::COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCall {
    Enter,
    Exit,
    WhileActive,
    WhileInactive,
}

/// Which hook `gait` receives when `current` is chosen and `tracked` was last seen.
#[must_use]
pub fn hook_call(gait: GaitState, current: GaitState, tracked: Option<GaitState>) -> HookCall {
    let changed = tracked != Some(current);
    if gait == current {
        if changed {
            HookCall::Enter
        } else {
            HookCall::WhileActive
        }
    } else if tracked == Some(gait) {
        HookCall::Exit
    } else {
        HookCall::WhileInactive
    }
}

/// Dispatches one frame of hooks. Returns whether the gait changed.
///
/// The dwell timer is reset right after the entering gait's `on_enter`.
pub fn track_states(table: &HookTable<'_>, ctx: &mut HookContext<'_>) -> bool {
    let current = ctx.state.gait;
    let tracked = ctx.state.tracked_gait;

    for gait in GaitState::ALL {
        let hooks = table[gait.index()];
        match hook_call(gait, current, tracked) {
            HookCall::Enter => {
                hooks.on_enter(ctx);
                ctx.state.dwell.reset();
            }
            HookCall::Exit => hooks.on_exit(ctx),
            HookCall::WhileActive => hooks.while_active(ctx),
            HookCall::WhileInactive => hooks.while_inactive(ctx),
        }
    }

    ctx.state.tracked_gait = Some(current);
    tracked != Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::NoCurves;
    use std::cell::RefCell;

    struct Recorder<'a> {
        gait: GaitState,
        log: &'a RefCell<Vec<(GaitState, HookCall)>>,
    }

    impl GaitHooks for Recorder<'_> {
        fn on_enter(&self, _ctx: &mut HookContext<'_>) {
            self.log.borrow_mut().push((self.gait, HookCall::Enter));
        }
        fn on_exit(&self, _ctx: &mut HookContext<'_>) {
            self.log.borrow_mut().push((self.gait, HookCall::Exit));
        }
        fn while_active(&self, _ctx: &mut HookContext<'_>) {
            self.log.borrow_mut().push((self.gait, HookCall::WhileActive));
        }
        fn while_inactive(&self, _ctx: &mut HookContext<'_>) {
            self.log.borrow_mut().push((self.gait, HookCall::WhileInactive));
        }
    }

    fn run_frame(
        state: &mut LocomotionState,
        gait: GaitState,
    ) -> (bool, Vec<(GaitState, HookCall)>) {
        let log = RefCell::new(Vec::new());
        let config = LocomotionConfig::default();
        state.gait = gait;

        let changed = {
            let recorders = GaitState::ALL.map(|gait| Recorder { gait, log: &log });
            let table: HookTable<'_> = [
                &recorders[0],
                &recorders[1],
                &recorders[2],
                &recorders[3],
                &recorders[4],
            ];
            let mut ctx = HookContext {
                state,
                config: &config,
                curves: &NoCurves,
                world_yaw: 0.0,
            };
            track_states(&table, &mut ctx)
        };
        (changed, log.into_inner())
    }

    fn count(log: &[(GaitState, HookCall)], call: HookCall) -> usize {
        log.iter().filter(|(_, c)| *c == call).count()
    }

    #[test]
    fn first_frame_enters_current_gait() {
        let mut state = LocomotionState::default();
        let (changed, log) = run_frame(&mut state, GaitState::Idle);

        assert!(changed);
        assert_eq!(log[0], (GaitState::Idle, HookCall::Enter));
        assert_eq!(count(&log, HookCall::Exit), 0);
        assert_eq!(count(&log, HookCall::WhileInactive), 4);
    }

    #[test]
    fn transition_fires_one_exit_and_one_enter_in_order() {
        let mut state = LocomotionState::default();
        run_frame(&mut state, GaitState::Jog);
        let (changed, log) = run_frame(&mut state, GaitState::Walk);

        assert!(changed);
        assert_eq!(
            log,
            vec![
                (GaitState::Idle, HookCall::WhileInactive),
                (GaitState::Walk, HookCall::Enter),
                (GaitState::Jog, HookCall::Exit),
                (GaitState::Crouch, HookCall::WhileInactive),
                (GaitState::Jump, HookCall::WhileInactive),
            ]
        );
    }

    #[test]
    fn steady_frame_fires_no_edges() {
        let mut state = LocomotionState::default();
        run_frame(&mut state, GaitState::Crouch);
        let (changed, log) = run_frame(&mut state, GaitState::Crouch);

        assert!(!changed);
        assert_eq!(count(&log, HookCall::Enter), 0);
        assert_eq!(count(&log, HookCall::Exit), 0);
        assert_eq!(log[3], (GaitState::Crouch, HookCall::WhileActive));
        assert_eq!(count(&log, HookCall::WhileInactive), 4);
    }

    #[test]
    fn entry_resets_dwell() {
        let mut state = LocomotionState::default();
        run_frame(&mut state, GaitState::Idle);
        state.dwell.advance(1.0);

        run_frame(&mut state, GaitState::Idle);
        assert_eq!(state.dwell.elapsed(), 1.0);

        run_frame(&mut state, GaitState::Walk);
        assert_eq!(state.dwell.elapsed(), 0.0);
        assert_eq!(state.tracked_gait, Some(GaitState::Walk));
    }

    #[test]
    fn hook_call_matches_edge_flag_semantics() {
        use GaitState::*;

        assert_eq!(hook_call(Walk, Walk, Some(Idle)), HookCall::Enter);
        assert_eq!(hook_call(Walk, Walk, Some(Walk)), HookCall::WhileActive);
        assert_eq!(hook_call(Idle, Walk, Some(Idle)), HookCall::Exit);
        assert_eq!(hook_call(Jog, Walk, Some(Idle)), HookCall::WhileInactive);
        assert_eq!(hook_call(Idle, Idle, None), HookCall::Enter);
        assert_eq!(hook_call(Jump, Idle, None), HookCall::WhileInactive);
    }
}

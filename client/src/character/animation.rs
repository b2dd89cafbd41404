use super::types::{CharacterLocomotion, CharacterRoot};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use locomotion::{GaitState, LocomotionOutputs};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const CLIP_BLEND: Duration = Duration::from_millis(150);

/// Locomotion clips of a character glTF, keyed by animation name.
#[derive(Resource)]
pub struct LocomotionClipLibrary {
    pub gltf_handle: Handle<Gltf>,
    pub graph_handle: Option<Handle<AnimationGraph>>,
    pub nodes: HashMap<String, AnimationNodeIndex>,
    pub initialized: bool,
}

impl LocomotionClipLibrary {
    pub fn new(gltf_handle: Handle<Gltf>) -> Self {
        Self {
            gltf_handle,
            graph_handle: None,
            nodes: HashMap::new(),
            initialized: false,
        }
    }

    pub fn node(&self, clip: &str) -> Option<AnimationNodeIndex> {
        self.nodes.get(clip).copied()
    }
}

/// Build the animation graph once the glTF asset is loaded.
pub fn initialize_locomotion_clip_library(
    mut library: ResMut<LocomotionClipLibrary>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    if library.initialized {
        return;
    }

    let Some(gltf) = gltfs.get(&library.gltf_handle) else {
        return;
    };

    library.initialized = true;

    if gltf.named_animations.is_empty() {
        info!("Locomotion glTF loaded but has no named animations.");
        return;
    }

    let mut graph = AnimationGraph::new();
    let mut nodes = HashMap::with_capacity(gltf.named_animations.len());
    for (name, handle) in &gltf.named_animations {
        let node = graph.add_clip(handle.clone(), 1.0, graph.root);
        nodes.insert(name.to_string(), node);
    }

    info!("LocomotionClipLibrary: {} clip(s) loaded", nodes.len());

    library.graph_handle = Some(graphs.add(graph));
    library.nodes = nodes;
}

/// Marker for animation players already bound to the locomotion graph.
#[derive(Component)]
pub struct LocomotionAnimationBound;

/// Attach the shared graph to animation players spawned under a character root.
pub fn bind_locomotion_animation_players(
    mut commands: Commands,
    library: Res<LocomotionClipLibrary>,
    parents: Query<&ChildOf>,
    roots: Query<(), With<CharacterRoot>>,
    players: Query<Entity, (With<AnimationPlayer>, Without<LocomotionAnimationBound>)>,
) {
    let Some(graph_handle) = library.graph_handle.clone() else {
        return;
    };

    for player_entity in &players {
        let under_character = parents
            .iter_ancestors(player_entity)
            .any(|ancestor| roots.contains(ancestor));
        if !under_character {
            // Scene hierarchy can be attached asynchronously; retry on next frames.
            continue;
        }

        commands.entity(player_entity).insert((
            AnimationGraphHandle(graph_handle.clone()),
            AnimationTransitions::new(),
            LocomotionAnimationBound,
        ));
    }
}

/// Clip to start this frame, if any: pulses or a fresh stop.
fn clip_to_start<'a>(outputs: &LocomotionOutputs<'a>) -> Option<(&'a str, f32)> {
    let selection = outputs.selection;
    let stopped = outputs.gait == GaitState::Idle && outputs.previous_gait != GaitState::Idle;
    if !selection.any_pulse() && !stopped {
        return None;
    }
    let clip = selection.clip.as_ref()?;
    Some((clip.name(), selection.start_time))
}

/// Play the selected start, transition or stop clip and keep moving gaits at the play-rate.
pub fn play_selected_locomotion_clips(
    library: Res<LocomotionClipLibrary>,
    instances: Query<&CharacterLocomotion>,
    children_query: Query<&Children>,
    mut players: Query<
        (&mut AnimationPlayer, &mut AnimationTransitions),
        With<LocomotionAnimationBound>,
    >,
    mut missing: Local<HashSet<String>>,
) {
    for instance in &instances {
        let Some(owner) = instance.owner else {
            continue;
        };
        let outputs = instance.animator.outputs();

        let start = match clip_to_start(&outputs) {
            Some((name, start_time)) => match library.node(name) {
                Some(node) => Some((node, start_time)),
                None => {
                    if missing.insert(name.to_string()) {
                        warn!("Locomotion clip '{}' is not in the clip library", name);
                    }
                    None
                }
            },
            None => None,
        };

        let speed = if outputs.gait.is_moving() && outputs.play_rate > 0.0 {
            Some(outputs.play_rate)
        } else {
            None
        };

        if start.is_none() && speed.is_none() {
            continue;
        }

        for player_entity in children_query.iter_descendants(owner) {
            let Ok((mut player, mut transitions)) = players.get_mut(player_entity) else {
                continue;
            };

            if let Some((node, start_time)) = start {
                transitions
                    .play(&mut player, node, CLIP_BLEND)
                    .seek_to(start_time);
            }
            if let Some(speed) = speed {
                for (_, active) in player.playing_animations_mut() {
                    active.set_speed(speed);
                }
            }
        }
    }
}

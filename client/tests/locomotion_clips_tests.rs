use bevy::asset::AssetPlugin;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use client::LocomotionPlugin;
use client::character::{
    AnimationCurves, CharacterLocomotion, CharacterMovement, CharacterRoot,
    LocomotionAnimationBound, LocomotionClipLibrary,
};
use locomotion::{GaitState, LocomotionConfig};

const CLIPS: [&str; 3] = ["walk_start_f", "walk_start_90_l", "walk_stop"];

fn clip_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()))
        .init_asset::<Gltf>()
        .init_asset::<AnimationClip>()
        .init_asset::<AnimationGraph>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .add_plugins(LocomotionPlugin::with_config(LocomotionConfig::default()));
    app
}

/// Library with one graph node per clip name, already past glTF loading.
fn insert_library(app: &mut App) {
    let mut graph = AnimationGraph::new();
    let mut library = LocomotionClipLibrary::new(Handle::default());
    for name in CLIPS {
        let node = graph.add_clip(Handle::<AnimationClip>::default(), 1.0, graph.root);
        library.nodes.insert(name.to_string(), node);
    }

    let graph_handle = app
        .world_mut()
        .resource_mut::<Assets<AnimationGraph>>()
        .add(graph);
    library.graph_handle = Some(graph_handle);
    library.initialized = true;
    app.insert_resource(library);
}

fn clip_node(app: &App, name: &str) -> AnimationNodeIndex {
    app.world()
        .resource::<LocomotionClipLibrary>()
        .node(name)
        .expect("clip node in library")
}

fn spawn_character(app: &mut App, direction: Vec3, clip_speed: f32) -> (Entity, Entity) {
    let mut curves = AnimationCurves::default();
    curves.set("move_speed", clip_speed);

    let root = app
        .world_mut()
        .spawn((
            CharacterRoot,
            CharacterMovement {
                velocity: direction * 1.6,
                acceleration: direction,
                ..CharacterMovement::with_input(direction, 1.6)
            },
            curves,
            Transform::default(),
        ))
        .id();
    let player = app
        .world_mut()
        .spawn((AnimationPlayer::default(), ChildOf(root)))
        .id();
    (root, player)
}

#[test]
fn player_under_character_root_is_bound_to_graph() {
    let mut app = clip_app();
    insert_library(&mut app);
    let (_, player) = spawn_character(&mut app, Vec3::NEG_Z, 1.6);
    let stray = app.world_mut().spawn(AnimationPlayer::default()).id();

    app.update();

    let graph = app
        .world()
        .get::<AnimationGraphHandle>(player)
        .expect("graph handle inserted");
    let library = app.world().resource::<LocomotionClipLibrary>();
    assert_eq!(Some(&graph.0), library.graph_handle.as_ref());
    assert!(app.world().get::<LocomotionAnimationBound>(player).is_some());
    assert!(app.world().get::<AnimationTransitions>(player).is_some());
    assert!(app.world().get::<LocomotionAnimationBound>(stray).is_none());
}

#[test]
fn left_start_plays_at_offset_with_gait_play_rate() {
    let mut app = clip_app();
    insert_library(&mut app);
    let (root, player) = spawn_character(&mut app, Vec3::NEG_X, 0.8);

    for _ in 0..5 {
        app.update();
    }

    let locomotion = app
        .world()
        .get::<CharacterLocomotion>(root)
        .expect("locomotion attached");
    let outputs = locomotion.animator.outputs();
    assert_eq!(outputs.gait, GaitState::Walk);
    assert!((outputs.play_rate - 2.0).abs() < 1e-4);

    let node = clip_node(&app, "walk_start_90_l");
    let animation_player = app
        .world()
        .get::<AnimationPlayer>(player)
        .expect("animation player");
    assert!(animation_player.is_playing_animation(node));
    for name in ["walk_start_f", "walk_stop"] {
        let other = clip_node(&app, name);
        assert!(!animation_player.is_playing_animation(other));
    }

    let active = animation_player.animation(node).expect("active start clip");
    assert!((active.speed() - outputs.play_rate).abs() < 1e-4);

    let offset = LocomotionConfig::default().clips.start.walk.left_90.start_time;
    assert!((active.seek_time() - offset).abs() < 1e-4);
}

#[test]
fn braking_starts_walk_stop() {
    let mut app = clip_app();
    insert_library(&mut app);
    let (root, player) = spawn_character(&mut app, Vec3::NEG_Z, 1.6);

    for _ in 0..10 {
        app.update();
    }
    app.world_mut()
        .get_mut::<CharacterMovement>(root)
        .expect("movement")
        .acceleration = Vec3::Z;
    for _ in 0..5 {
        app.update();
    }

    let locomotion = app
        .world()
        .get::<CharacterLocomotion>(root)
        .expect("locomotion attached");
    assert_eq!(locomotion.animator.gait(), GaitState::Idle);

    let stop = clip_node(&app, "walk_stop");
    let animation_player = app
        .world()
        .get::<AnimationPlayer>(player)
        .expect("animation player");
    assert!(animation_player.is_playing_animation(stop));
}

use locomotion::{ConfigError, GaitState, LocomotionConfig, TransitionTiming};
use std::path::PathBuf;

fn shipped_config_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/locomotion.yaml"))
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("locomotion-{}-{}", std::process::id(), name))
}

#[test]
fn shipped_config_matches_defaults() {
    let loaded = LocomotionConfig::load_from_file(shipped_config_path())
        .expect("shipped config should load");
    assert_eq!(loaded, LocomotionConfig::default());
}

#[test]
fn shipped_config_keeps_jog_to_crouch_reusing_jog_to_walk() {
    let loaded = LocomotionConfig::load_from_file(shipped_config_path())
        .expect("shipped config should load");
    let entry = loaded
        .clips
        .transition(GaitState::Jog, GaitState::Crouch)
        .expect("jog to crouch entry");

    assert_eq!(entry.clip.name(), "jog_to_walk");
    assert_eq!(entry.timing, TransitionTiming::Fixed { seconds: 0.2 });
}

#[test]
fn missing_file_is_a_read_error() {
    let result = LocomotionConfig::load_from_file(scratch_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn load_or_default_falls_back_on_missing_and_broken_files() {
    let missing = LocomotionConfig::load_or_default(scratch_path("absent.yaml"));
    assert_eq!(missing, LocomotionConfig::default());

    let broken = scratch_path("broken.yaml");
    std::fs::write(&broken, "min_time_in_state: [not, a, number]").expect("write scratch file");
    let fallback = LocomotionConfig::load_or_default(&broken);
    let _ = std::fs::remove_file(&broken);

    assert_eq!(fallback, LocomotionConfig::default());
}

#[test]
fn saved_config_loads_back_with_edits() {
    let path = scratch_path("saved.yaml");
    let mut config = LocomotionConfig::default();
    config.min_time_in_state = 0.3;
    config.jog_stop_speed_limit = 2.75;

    config.save_to_file(&path).expect("save config");
    let loaded = LocomotionConfig::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.expect("load saved config"), config);
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let path = scratch_path("invalid.yaml");
    std::fs::write(&path, "jog_stop_speed_limit: -1.0\n").expect("write scratch file");
    let result = LocomotionConfig::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    match result {
        Err(ConfigError::Invalid(message)) => assert!(message.contains("jog_stop_speed_limit")),
        other => panic!("expected invalid config error, got {other:?}"),
    }
}

//! Tunables of the locomotion state machine, loaded from YAML.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::clip::{ClipEntry, ClipRef};
use crate::gait::{GaitState, PerGait};
use crate::rotation::RotationSettings;
use crate::start_selector::StartClipSet;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read locomotion config: {0}")]
    Read(std::io::Error),
    #[error("failed to write locomotion config: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML locomotion config: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML locomotion config: {0}")]
    Serialize(serde_yaml::Error),
    #[error("invalid locomotion config: {0}")]
    Invalid(String),
}

/// Inclusive floors a snapshot must reach to be classified as a gait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitThresholds {
    pub min_ground_speed: f32,
    pub min_max_speed: f32,
    pub min_input_magnitude: f32,
}

impl GaitThresholds {
    pub const fn new(min_ground_speed: f32, min_max_speed: f32, min_input_magnitude: f32) -> Self {
        Self {
            min_ground_speed,
            min_max_speed,
            min_input_magnitude,
        }
    }

    pub const WALK: Self = Self::new(0.1, 0.0, 0.5);
    pub const JOG: Self = Self::new(2.2, 3.0, 0.5);
    pub const CROUCH: Self = Self::new(0.1, 0.0, 0.5);
}

impl Default for GaitThresholds {
    fn default() -> Self {
        Self::WALK
    }
}

const WALK_START_OFFSETS: [f32; 5] = [0.0, 0.1, 0.15, 0.1, 0.15];
const JOG_START_OFFSETS: [f32; 5] = [0.0, 0.12, 0.2, 0.12, 0.2];

impl Default for PerGait<GaitThresholds> {
    fn default() -> Self {
        Self::new(
            GaitThresholds::WALK,
            GaitThresholds::JOG,
            GaitThresholds::CROUCH,
        )
    }
}

/// Start-anim eligibility speeds; crouch shares the walk value.
impl Default for PerGait<f32> {
    fn default() -> Self {
        Self::new(1.0, 2.5, 1.0)
    }
}

impl Default for StartClipSet {
    fn default() -> Self {
        Self::named("walk", WALK_START_OFFSETS)
    }
}

impl Default for PerGait<StartClipSet> {
    fn default() -> Self {
        Self::new(
            StartClipSet::named("walk", WALK_START_OFFSETS),
            StartClipSet::named("jog", JOG_START_OFFSETS),
            StartClipSet::named("crouch", WALK_START_OFFSETS),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveNames {
    /// Authored root speed of the blended clips; divides ground speed into a play-rate.
    pub speed: String,
    /// Per-frame yaw delta baked into the blended clips.
    pub rotation: String,
}

impl Default for CurveNames {
    fn default() -> Self {
        Self {
            speed: "move_speed".to_string(),
            rotation: "move_rotation".to_string(),
        }
    }
}

/// Where a transition clip's start offset comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionTiming {
    Fixed { seconds: f32 },
    Curve { name: String },
}

/// Clip played when moving directly from one gait to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub from: GaitState,
    pub to: GaitState,
    pub clip: ClipRef,
    pub timing: TransitionTiming,
}

impl TransitionEntry {
    fn fixed(from: GaitState, to: GaitState, clip: &str, seconds: f32) -> Self {
        Self {
            from,
            to,
            clip: ClipRef::new(clip),
            timing: TransitionTiming::Fixed { seconds },
        }
    }

    fn curve(from: GaitState, to: GaitState, clip: &str, curve: &str) -> Self {
        Self {
            from,
            to,
            clip: ClipRef::new(clip),
            timing: TransitionTiming::Curve {
                name: curve.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub start: PerGait<StartClipSet>,
    pub walk_stop: ClipEntry,
    pub jog_stop: ClipEntry,
    pub crouch_stop: ClipEntry,
    pub transitions: Vec<TransitionEntry>,
}

impl Default for ClipConfig {
    fn default() -> Self {
        use GaitState::{Crouch, Jog, Walk};

        Self {
            start: PerGait::default(),
            walk_stop: ClipEntry::new("walk_stop", 0.0),
            jog_stop: ClipEntry::new("jog_stop", 0.1),
            crouch_stop: ClipEntry::new("crouch_stop", 0.0),
            transitions: vec![
                TransitionEntry::fixed(Walk, Jog, "walk_to_jog", 0.25),
                TransitionEntry::curve(Crouch, Jog, "crouch_to_jog", "transition_walk_to_jog"),
                TransitionEntry::fixed(Jog, Walk, "jog_to_walk", 0.2),
                TransitionEntry::curve(Crouch, Walk, "crouch_to_walk", "transition_walk_to_crouch"),
                TransitionEntry::curve(Walk, Crouch, "walk_to_crouch", "transition_walk_to_crouch"),
                // Jog into crouch reuses the jog-to-walk clip.
                TransitionEntry::fixed(Jog, Crouch, "jog_to_walk", 0.2),
            ],
        }
    }
}

impl ClipConfig {
    pub fn transition(&self, from: GaitState, to: GaitState) -> Option<&TransitionEntry> {
        self.transitions
            .iter()
            .find(|entry| entry.from == from && entry.to == to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Minimum dwell, in seconds, before a ground gait may change.
    pub min_time_in_state: f32,
    pub rotation: RotationSettings,
    pub thresholds: PerGait<GaitThresholds>,
    /// Idle entries faster than this pick the jog stop clip.
    pub jog_stop_speed_limit: f32,
    /// Gait-to-gait entries slower than this play a start clip instead of a transition.
    pub start_anim_max_speed: PerGait<f32>,
    pub curves: CurveNames,
    pub clips: ClipConfig,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            min_time_in_state: 0.15,
            rotation: RotationSettings::default(),
            thresholds: PerGait::default(),
            jog_stop_speed_limit: 2.0,
            start_anim_max_speed: PerGait::default(),
            curves: CurveNames::default(),
            clips: ClipConfig::default(),
        }
    }
}

impl LocomotionConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_yaml_str(&raw)
    }

    /// Parses `raw` as an override of the defaults: nested sections only replace
    /// the keys they name, lists replace the whole default list.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let overrides =
            serde_yaml::from_str::<serde_yaml::Value>(raw).map_err(ConfigError::Deserialize)?;
        let mut merged =
            serde_yaml::to_value(Self::default()).map_err(ConfigError::Serialize)?;
        overlay(&mut merged, overrides);

        let config =
            serde_yaml::from_value::<LocomotionConfig>(merged).map_err(ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is absent or unusable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    "Failed to load locomotion config from '{}': {}. Falling back to defaults.",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let encoded = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;
        fs::write(path, encoded).map_err(ConfigError::Write)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("min_time_in_state", self.min_time_in_state)?;
        non_negative(
            "rotation.primary_interp_speed",
            self.rotation.primary_interp_speed,
        )?;
        non_negative(
            "rotation.secondary_interp_speed",
            self.rotation.secondary_interp_speed,
        )?;
        non_negative("jog_stop_speed_limit", self.jog_stop_speed_limit)?;

        for (gait, thresholds) in self.thresholds.iter() {
            let gait = gait.gait();
            non_negative(
                &format!("thresholds.{gait}.min_ground_speed"),
                thresholds.min_ground_speed,
            )?;
            non_negative(
                &format!("thresholds.{gait}.min_max_speed"),
                thresholds.min_max_speed,
            )?;
            non_negative(
                &format!("thresholds.{gait}.min_input_magnitude"),
                thresholds.min_input_magnitude,
            )?;
        }

        for (gait, speed) in self.start_anim_max_speed.iter() {
            non_negative(&format!("start_anim_max_speed.{}", gait.gait()), *speed)?;
        }

        if self.curves.speed.is_empty() || self.curves.rotation.is_empty() {
            return Err(ConfigError::Invalid("curve names must not be empty".into()));
        }

        for (gait, set) in self.clips.start.iter() {
            for entry in set.entries() {
                clip_entry(&format!("clips.start.{}", gait.gait()), entry)?;
            }
        }
        clip_entry("clips.walk_stop", &self.clips.walk_stop)?;
        clip_entry("clips.jog_stop", &self.clips.jog_stop)?;
        clip_entry("clips.crouch_stop", &self.clips.crouch_stop)?;

        for entry in &self.clips.transitions {
            if !entry.from.is_moving() || !entry.to.is_moving() || entry.from == entry.to {
                return Err(ConfigError::Invalid(format!(
                    "transition {} -> {} must join two different moving gaits",
                    entry.from, entry.to
                )));
            }
            match &entry.timing {
                TransitionTiming::Fixed { seconds } => non_negative(
                    &format!("transition {} -> {} offset", entry.from, entry.to),
                    *seconds,
                )?,
                TransitionTiming::Curve { name } if name.is_empty() => {
                    return Err(ConfigError::Invalid(format!(
                        "transition {} -> {} has an empty curve name",
                        entry.from, entry.to
                    )));
                }
                TransitionTiming::Curve { .. } => {}
            }
        }

        Ok(())
    }
}

fn overlay(base: &mut serde_yaml::Value, overrides: serde_yaml::Value) {
    use serde_yaml::Value;

    match (base, overrides) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be a finite non-negative number, got {value}"
        )))
    }
}

fn clip_entry(field: &str, entry: &ClipEntry) -> Result<(), ConfigError> {
    if entry.clip.name().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} has an empty clip name")));
    }
    non_negative(&format!("{field}.{} start_time", entry.clip), entry.start_time)
}

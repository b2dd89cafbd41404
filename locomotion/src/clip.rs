//! Clip references, the per-frame clip selection and curve sampling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of a clip owned by the blend collaborator. Cloning never allocates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipRef(Arc<str>);

impl ClipRef {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClipRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A clip plus the time, in seconds, at which playback should begin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipEntry {
    pub clip: ClipRef,
    #[serde(default)]
    pub start_time: f32,
}

impl ClipEntry {
    pub fn new(clip: &str, start_time: f32) -> Self {
        Self {
            clip: ClipRef::new(clip),
            start_time,
        }
    }
}

/// Why the current clip was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Start,
    GaitTransition,
    Stop,
}

/// Clip chosen by the transition planner for the blend collaborator.
///
/// `play_start_anim` and `play_gait_transition_anim` are one-frame pulses:
/// they are cleared at the end of every post-evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimSelection {
    pub clip: Option<ClipRef>,
    pub start_time: f32,
    pub kind: Option<SelectionKind>,
    pub play_start_anim: bool,
    pub play_gait_transition_anim: bool,
}

impl AnimSelection {
    pub fn select(&mut self, clip: &ClipRef, start_time: f32, kind: SelectionKind) {
        self.clip = Some(clip.clone());
        self.start_time = start_time;
        self.kind = Some(kind);
    }

    pub fn select_entry(&mut self, entry: &ClipEntry, kind: SelectionKind) {
        self.select(&entry.clip, entry.start_time, kind);
    }

    pub fn clear_pulses(&mut self) {
        self.play_start_anim = false;
        self.play_gait_transition_anim = false;
    }

    #[must_use]
    pub fn any_pulse(&self) -> bool {
        self.play_start_anim || self.play_gait_transition_anim
    }
}

/// Samples a named scalar curve from whatever clips are currently blended.
///
/// Unknown curves read as zero.
pub trait CurveSampler {
    fn curve_value(&self, name: &str) -> f32;
}

impl<F> CurveSampler for F
where
    F: Fn(&str) -> f32,
{
    fn curve_value(&self, name: &str) -> f32 {
        self(name)
    }
}

impl CurveSampler for HashMap<String, f32> {
    fn curve_value(&self, name: &str) -> f32 {
        self.get(name).copied().unwrap_or(0.0)
    }
}

/// Sampler for setups without baked curves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCurves;

impl CurveSampler for NoCurves {
    fn curve_value(&self, _name: &str) -> f32 {
        0.0
    }
}

//! Directional start clip selection from the signed start angle.

use serde::{Deserialize, Serialize};

use crate::clip::ClipEntry;

/// Angle bucket of a start animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartDirection {
    Forward,
    Left90,
    Left180,
    Right90,
    Right180,
}

/// Buckets a start angle in degrees (negative is a left turn).
///
/// Edges: (-135, -45) left-90, [-180, -135] left-180, [45, 135) right-90,
/// [135, 180] right-180, anything else forward.
#[must_use]
pub fn start_direction(angle: f32) -> StartDirection {
    if angle > -135.0 && angle < -45.0 {
        StartDirection::Left90
    } else if (-180.0..=-135.0).contains(&angle) {
        StartDirection::Left180
    } else if (45.0..135.0).contains(&angle) {
        StartDirection::Right90
    } else if (135.0..=180.0).contains(&angle) {
        StartDirection::Right180
    } else {
        StartDirection::Forward
    }
}

/// Start clips of one gait, one per direction bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartClipSet {
    pub forward: ClipEntry,
    pub left_90: ClipEntry,
    pub left_180: ClipEntry,
    pub right_90: ClipEntry,
    pub right_180: ClipEntry,
}

impl StartClipSet {
    /// Clip set named `<prefix>_start_{f,90_l,180_l,90_r,180_r}`.
    pub fn named(prefix: &str, offsets: [f32; 5]) -> Self {
        let [forward, left_90, left_180, right_90, right_180] = offsets;
        Self {
            forward: ClipEntry::new(&format!("{prefix}_start_f"), forward),
            left_90: ClipEntry::new(&format!("{prefix}_start_90_l"), left_90),
            left_180: ClipEntry::new(&format!("{prefix}_start_180_l"), left_180),
            right_90: ClipEntry::new(&format!("{prefix}_start_90_r"), right_90),
            right_180: ClipEntry::new(&format!("{prefix}_start_180_r"), right_180),
        }
    }

    pub fn entry(&self, direction: StartDirection) -> &ClipEntry {
        match direction {
            StartDirection::Forward => &self.forward,
            StartDirection::Left90 => &self.left_90,
            StartDirection::Left180 => &self.left_180,
            StartDirection::Right90 => &self.right_90,
            StartDirection::Right180 => &self.right_180,
        }
    }

    pub fn entries(&self) -> [&ClipEntry; 5] {
        [
            &self.forward,
            &self.left_90,
            &self.left_180,
            &self.right_90,
            &self.right_180,
        ]
    }
}

/// Start clip and offset for a start angle.
pub fn select_start_clip(clips: &StartClipSet, angle: f32) -> &ClipEntry {
    clips.entry(start_direction(angle))
}

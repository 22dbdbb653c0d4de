//! Keyframe channel data model.
//!
//! Channels are authored in the avatar's model file and sampled by the host's
//! transform applier at the current frame time; the scheduler stores them and
//! never evaluates the curves.

use serde::{Deserialize, Serialize};

/// Which transform of a model part a channel drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    Position,
    Rotation,
    Scale,
}

/// Timing function between a keyframe and the next one.
/// Evaluated by the transform applier, not by the scheduler.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Linear,
    CatmullRom,
    Bezier,
    Step,
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Linear
    }
}

/// A single timed key on a channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    pub value: [f32; 3],
}

/// Ordered keyframes driving one transform of one model part.
///
/// Immutable after construction. Key order is significant within a channel;
/// the order of channels across parts is not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationChannel {
    transform: TransformType,
    keyframes: Vec<Keyframe>,
}

impl AnimationChannel {
    pub fn new(transform: TransformType, keyframes: Vec<Keyframe>) -> Self {
        Self {
            transform,
            keyframes,
        }
    }

    #[inline]
    pub fn transform(&self) -> TransformType {
        self.transform
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

//! Stored animation definitions.
//!
//! Avatars ship their animations inside the model file; this module parses
//! that JSON shape and instantiates ready-to-register [`Animation`]s. Timing
//! fields all default, so a minimal definition is just a name and a model.

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, AnimationCfg, LoopMode};
use crate::data::{AnimationChannel, Keyframe, TransformType};
use crate::error::AnimationError;
use crate::ids::{AvatarId, PartId};
use crate::time::SharedClock;

/// Maps authored part names to runtime part identities.
///
/// Binding is the model loader's concern; the scheduler only needs the
/// resolved key. Channels naming parts the resolver does not know are
/// skipped at instantiation time rather than failing the avatar load.
pub trait PartResolver {
    fn resolve(&mut self, part: &str) -> Option<PartId>;
}

/// Parse a stored-animation JSON document.
///
/// The loop-mode name is validated here so a bad definition fails at parse
/// time rather than at instantiation.
pub fn parse_stored_animation_json(s: &str) -> Result<StoredAnimation, AnimationError> {
    let stored: StoredAnimation = serde_json::from_str(s)?;
    stored.loop_mode()?;
    Ok(stored)
}

/// A complete animation definition as authored in the model file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnimation {
    pub name: String,
    pub model: String,
    #[serde(rename = "loop", default = "default_loop")]
    pub loop_name: String,
    #[serde(rename = "override", default)]
    pub overrides: bool,
    #[serde(default = "default_length")]
    pub length: f32,
    #[serde(default)]
    pub offset: f32,
    #[serde(default = "default_blend")]
    pub blend: f32,
    #[serde(default)]
    pub start_delay: f32,
    #[serde(default)]
    pub loop_delay: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub channels: Vec<StoredChannel>,
    #[serde(default)]
    pub code: Vec<StoredCodeEvent>,
}

fn default_loop() -> String {
    "once".to_string()
}

fn default_length() -> f32 {
    1.0
}

fn default_blend() -> f32 {
    1.0
}

fn default_speed() -> f32 {
    1.0
}

/// One channel definition: a part name plus the keyframes for one transform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredChannel {
    pub part: String,
    pub transform: TransformType,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

/// One code event: script source bound to a timeline timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredCodeEvent {
    pub time: f32,
    pub source: String,
}

impl StoredAnimation {
    /// Parsed loop mode; fails when the stored name is not loop/once/hold.
    pub fn loop_mode(&self) -> Result<LoopMode, AnimationError> {
        self.loop_name.parse()
    }

    /// Build the runtime animation for `avatar`, resolving authored part
    /// names through `resolver`.
    pub fn instantiate(
        &self,
        avatar: AvatarId,
        clock: SharedClock,
        resolver: &mut dyn PartResolver,
    ) -> Result<Animation, AnimationError> {
        let cfg = AnimationCfg {
            loop_mode: self.loop_mode()?,
            overrides: self.overrides,
            length: self.length,
            offset: self.offset,
            blend: self.blend,
            start_delay: self.start_delay,
            loop_delay: self.loop_delay,
            speed: self.speed,
            priority: self.priority,
        };
        let mut animation =
            Animation::new(avatar, self.model.clone(), self.name.clone(), cfg, clock);

        for channel in &self.channels {
            match resolver.resolve(&channel.part) {
                Some(part) => {
                    animation.add_channel(
                        part,
                        AnimationChannel::new(channel.transform, channel.keyframes.clone()),
                    );
                }
                None => log::warn!(
                    "skipping channel for unknown part {:?} in animation {:?}",
                    channel.part,
                    self.name
                ),
            }
        }

        for event in &self.code {
            animation.add_code(event.time, event.source.clone());
        }

        Ok(animation)
    }
}

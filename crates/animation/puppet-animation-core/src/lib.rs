//! Puppet Animation Core (host-agnostic)
//!
//! Avatar animation playback and code-event scheduling: per-tick timeline
//! advancement, loop/once/hold semantics, clamped frame-time derivation for
//! external transform sampling, and exactly-once dispatch of time-indexed
//! script callbacks, including across loop seams.
//!
//! The crate does not sample keyframes, apply transforms or execute scripts;
//! those live behind the [`script::ScriptHost`], [`stored::PartResolver`] and
//! frame-time boundaries. Hosts drive the engine through
//! [`registry::AnimationRegistry`], once per simulation step.

pub mod animation;
pub mod data;
pub mod error;
pub mod events;
pub mod ids;
pub mod registry;
pub mod script;
pub mod stored;
pub mod surface;
pub mod time;

// Re-exports for consumers (embedding layers)
pub use animation::{Animation, AnimationCfg, LoopMode, PlayState};
pub use data::{AnimationChannel, Interpolation, Keyframe, TransformType};
pub use error::AnimationError;
pub use events::CodeEventTable;
pub use ids::{AvatarId, PartId, PartIdAllocator};
pub use registry::AnimationRegistry;
pub use script::{NullScriptHost, ScriptHost};
pub use stored::{parse_stored_animation_json, PartResolver, StoredAnimation};
pub use surface::{Property, PropertyValue};
pub use time::{Clock, ManualClock, MonotonicClock, SharedClock, TimeController};

/// Animation scheduler result type.
pub type Result<T> = core::result::Result<T, AnimationError>;

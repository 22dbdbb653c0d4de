//! Error types for the animation scheduler.

use serde::{Deserialize, Serialize};

use crate::ids::AvatarId;

/// Errors surfaced by configuration and load operations.
///
/// Runtime scripting failures are deliberately absent: a missing or errored
/// script runtime suppresses code-event firing instead of failing the tick.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Loop-mode name outside {loop, once, hold}.
    #[error("invalid loop mode: {name:?}")]
    InvalidLoopMode { name: String },

    /// Unknown property name on the scripting surface.
    #[error("unknown property: {name:?}")]
    UnknownProperty { name: String },

    /// Attempted write to a read-only property.
    #[error("property {property:?} is read-only")]
    ReadOnlyProperty { property: String },

    /// Property write carrying the wrong value kind.
    #[error("value type mismatch for {property:?}: expected {expected}, got {actual}")]
    ValueTypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    /// Operation addressed an avatar the registry does not hold.
    #[error("avatar not loaded: {id}")]
    AvatarNotLoaded { id: AvatarId },

    /// Stored-definition parse failure.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}

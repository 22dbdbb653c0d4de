//! Named property access for embedding layers.
//!
//! Replaces reflective string-keyed lookup with a fixed enumeration:
//! embedders resolve a name to a [`Property`] once at registration time and
//! then read and write through a match, keeping the external surface intact
//! without runtime reflection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::error::AnimationError;

/// Exposed animation properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Name,
    Time,
    PlayState,
    Blend,
    Offset,
    StartDelay,
    LoopDelay,
    Length,
    Overrides,
    Loop,
    Priority,
    Speed,
}

impl Property {
    pub const ALL: &'static [Property] = &[
        Property::Name,
        Property::Time,
        Property::PlayState,
        Property::Blend,
        Property::Offset,
        Property::StartDelay,
        Property::LoopDelay,
        Property::Length,
        Property::Overrides,
        Property::Loop,
        Property::Priority,
        Property::Speed,
    ];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Time => "time",
            Self::PlayState => "play_state",
            Self::Blend => "blend",
            Self::Offset => "offset",
            Self::StartDelay => "start_delay",
            Self::LoopDelay => "loop_delay",
            Self::Length => "length",
            Self::Overrides => "override",
            Self::Loop => "loop",
            Self::Priority => "priority",
            Self::Speed => "speed",
        }
    }

    /// Value kind a write to this property must carry.
    fn expected_kind(&self) -> &'static str {
        match self {
            Self::Name | Self::PlayState | Self::Loop => "text",
            Self::Overrides => "bool",
            Self::Priority => "int",
            _ => "float",
        }
    }
}

impl FromStr for Property {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| AnimationError::UnknownProperty {
                name: s.to_string(),
            })
    }
}

/// Value carried across the property surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
        }
    }
}

impl Animation {
    /// Read a property by tag.
    pub fn property(&self, property: Property) -> PropertyValue {
        match property {
            Property::Name => PropertyValue::Text(self.name().to_string()),
            Property::Time => PropertyValue::Float(self.time()),
            Property::PlayState => PropertyValue::Text(self.play_state().name().to_string()),
            Property::Blend => PropertyValue::Float(self.blend()),
            Property::Offset => PropertyValue::Float(self.offset()),
            Property::StartDelay => PropertyValue::Float(self.start_delay()),
            Property::LoopDelay => PropertyValue::Float(self.loop_delay()),
            Property::Length => PropertyValue::Float(self.length()),
            Property::Overrides => PropertyValue::Bool(self.overrides()),
            Property::Loop => PropertyValue::Text(self.loop_mode().name().to_string()),
            Property::Priority => PropertyValue::Int(self.priority()),
            Property::Speed => PropertyValue::Float(self.speed()),
        }
    }

    /// Write a property by tag. Read-only targets and mismatched value kinds
    /// are rejected without mutating; `time` stays read-only here because
    /// mutation must go through [`Animation::set_time`] so event semantics
    /// hold.
    pub fn set_property(
        &mut self,
        property: Property,
        value: PropertyValue,
    ) -> Result<(), AnimationError> {
        match (property, value) {
            (Property::Name | Property::Time | Property::PlayState, _) => {
                Err(AnimationError::ReadOnlyProperty {
                    property: property.name().to_string(),
                })
            }
            (Property::Blend, PropertyValue::Float(v)) => {
                self.set_blend(v);
                Ok(())
            }
            (Property::Offset, PropertyValue::Float(v)) => {
                self.set_offset(v);
                Ok(())
            }
            (Property::StartDelay, PropertyValue::Float(v)) => {
                self.set_start_delay(v);
                Ok(())
            }
            (Property::LoopDelay, PropertyValue::Float(v)) => {
                self.set_loop_delay(v);
                Ok(())
            }
            (Property::Length, PropertyValue::Float(v)) => {
                self.set_length(v);
                Ok(())
            }
            (Property::Speed, PropertyValue::Float(v)) => {
                self.set_speed(v);
                Ok(())
            }
            (Property::Overrides, PropertyValue::Bool(v)) => {
                self.set_overrides(v);
                Ok(())
            }
            (Property::Priority, PropertyValue::Int(v)) => {
                self.set_priority(v);
                Ok(())
            }
            (Property::Loop, PropertyValue::Text(v)) => {
                self.set_loop_mode_str(&v)?;
                Ok(())
            }
            (property, value) => Err(AnimationError::ValueTypeMismatch {
                property: property.name().to_string(),
                expected: property.expected_kind().to_string(),
                actual: value.kind().to_string(),
            }),
        }
    }
}

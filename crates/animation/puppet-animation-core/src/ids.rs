//! Identifiers for avatars and model parts.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a loaded avatar. Wraps the host's player/entity UUID.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AvatarId(pub Uuid);

impl AvatarId {
    /// Fresh random identity, for hosts that do not reuse an entity UUID.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for AvatarId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AvatarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one model part within an avatar. The scheduler only uses it as
/// a channel-table key; resolution from authored part names happens at load
/// time (see `stored::PartResolver`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PartId(pub u32);

/// Monotonic allocator for PartId.
/// Dense indices improve cache locality; IDs are opaque externally.
#[derive(Default, Debug)]
pub struct PartIdAllocator {
    next_part: u32,
}

impl PartIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> PartId {
        let id = PartId(self.next_part);
        self.next_part = self.next_part.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

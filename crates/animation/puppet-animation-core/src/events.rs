//! Time-indexed script callbacks ("code events") attached to an animation.

use serde::{Deserialize, Serialize};

/// Sparse timestamp -> script-source table, scanned once per tick for
/// crossings.
///
/// Timestamps are clamped to `>= 0` on insertion, and a later insertion at an
/// equal timestamp replaces the stored source (last write wins). Entries keep
/// insertion order, but no cross-timestamp firing order is guaranteed to
/// callers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeEventTable {
    entries: Vec<(f32, String)>,
}

impl CodeEventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `source` at `max(time, 0)`, replacing any entry already at that
    /// timestamp.
    pub fn insert(&mut self, time: f32, source: impl Into<String>) {
        let time = time.max(0.0);
        match self.entries.iter_mut().find(|(at, _)| *at == time) {
            Some(entry) => entry.1 = source.into(),
            None => self.entries.push((time, source.into())),
        }
    }

    /// Iterate `(timestamp, source)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, &str)> + '_ {
        self.entries.iter().map(|(at, source)| (*at, source.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! # Vertex Deduplication
//!
//! Two regimes:
//!
//! - **Exact keys** ([`ExactIndex`]): endpoints compared by exact coordinate
//!   value while walking bones, so a joint is emitted once.
//! - **Tolerance weld** ([`weld`]): after fragments are unioned, vertices
//!   connected by a chain of distances `<= tolerance` collapse to one.

pub mod weld;

pub use weld::{weld_mesh, WeldMap};

use glam::DVec3;
use std::collections::HashMap;
use std::hash::Hash;

/// Bit pattern of a coordinate, hashable and compared by value.
///
/// `-0.0` is folded into `+0.0` so the two compare equal as they do as
/// floats. NaN never reaches this type; skeletons are validated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey([u64; 3]);

impl PointKey {
    /// Key of an exact position.
    pub fn new(position: DVec3) -> Self {
        // -0.0 + 0.0 == +0.0 under round-to-nearest
        let bits = |c: f64| (c + 0.0).to_bits();
        Self([bits(position.x), bits(position.y), bits(position.z)])
    }
}

impl From<DVec3> for PointKey {
    fn from(position: DVec3) -> Self {
        Self::new(position)
    }
}

/// Position plus radius; two endpoints match only if both agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    point: PointKey,
    radius: u64,
}

impl EndpointKey {
    /// Key of a sized endpoint.
    pub fn new(position: DVec3, radius: f64) -> Self {
        Self {
            point: PointKey::new(position),
            radius: (radius + 0.0).to_bits(),
        }
    }
}

/// Maps exact keys to sequential ids in first-seen order.
///
/// # Example
///
/// ```rust
/// use armature_skin::dedup::{ExactIndex, PointKey};
/// use glam::DVec3;
///
/// let mut index = ExactIndex::new();
/// assert_eq!(index.lookup_or_insert(PointKey::new(DVec3::Z)), (0, true));
/// assert_eq!(index.lookup_or_insert(PointKey::new(DVec3::X)), (1, true));
/// assert_eq!(index.lookup_or_insert(PointKey::new(DVec3::Z)), (0, false));
/// assert_eq!(index.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ExactIndex<K> {
    ids: HashMap<K, u32>,
}

impl<K: Eq + Hash> ExactIndex<K> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }

    /// Creates an index sized for `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the id of `key`, assigning the next id if unseen.
    /// The flag is true when the id was just assigned.
    pub fn lookup_or_insert(&mut self, key: K) -> (u32, bool) {
        let next = self.ids.len() as u32;
        match self.ids.entry(key) {
            std::collections::hash_map::Entry::Occupied(e) => (*e.get(), false),
            std::collections::hash_map::Entry::Vacant(e) => (*e.insert(next), true),
        }
    }

    /// Returns the id of `key` if present.
    pub fn get(&self, key: &K) -> Option<u32> {
        self.ids.get(key).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no key was inserted.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K: Eq + Hash> Default for ExactIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

//! Per-step collision pair bookkeeping.
//!
//! [`Contacts`] holds the collision set produced by the narrow phase this
//! step (pairs plus their penetration data) and the previous step's pair set.
//! Diffing the two is what turns a per-step recomputation into edge-triggered
//! begin/end notifications: a pair is either ABSENT or COLLIDING, and only
//! the transitions fire events.

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

/// An unordered pair of entities, canonicalized so the smaller id comes
/// first. Two pairs built from the same entities in either order are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    first: Entity,
    second: Entity,
}

impl CollisionPair {
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> Entity {
        self.first
    }

    pub fn second(&self) -> Entity {
        self.second
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.first == entity || self.second == entity
    }

    /// The other participant, if `entity` is part of this pair.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.first == entity {
            Some(self.second)
        } else if self.second == entity {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Narrow-phase result for one colliding pair, valid for the current step
/// only. The normal points from the pair's first entity toward its second.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Depth of overlap along the minimum-translation axis.
    pub penetration: f32,
    /// Unit separation normal, first entity toward second.
    pub normal: Vec2,
    /// Approximate contact point in world space.
    pub point: Vec2,
}

/// This step's collision set plus the previous step's pair set.
#[derive(Resource, Debug, Default)]
pub struct Contacts {
    pub(crate) current: FxHashMap<CollisionPair, Contact>,
    pub(crate) previous: FxHashSet<CollisionPair>,
}

impl Contacts {
    /// Penetration data for a pair colliding this step.
    pub fn get(&self, pair: CollisionPair) -> Option<&Contact> {
        self.current.get(&pair)
    }

    /// Whether two entities are colliding this step.
    pub fn are_colliding(&self, a: Entity, b: Entity) -> bool {
        self.current.contains_key(&CollisionPair::new(a, b))
    }

    /// Iterate over this step's colliding pairs and their contact data.
    pub fn iter(&self) -> impl Iterator<Item = (&CollisionPair, &Contact)> {
        self.current.iter()
    }

    /// Number of pairs colliding this step.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

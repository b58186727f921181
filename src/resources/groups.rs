//! Collision group table.
//!
//! Collision groups are named buckets with a symmetric collidability matrix
//! deciding whether two groups interact at all. Group filtering is purely
//! permission-based and independent of geometry: pairs in mutually
//! non-collidable groups are skipped before any narrow-phase test runs.
//!
//! The `"default"` group always exists and every new group starts collidable
//! with every existing group (and vice versa) until told otherwise with
//! [`CollisionGroups::set_collidable`].

use bevy_ecs::prelude::Resource;
use log::{debug, error, warn};
use rustc_hash::FxHashMap;

/// Name of the group that always exists and that unknown names fall back to.
pub const DEFAULT_COLLISION_GROUP: &str = "default";

/// Stable identifier of a registered collision group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionGroupId(u32);

/// Registry of named collision groups and their pairwise collidability.
#[derive(Resource, Debug, Clone)]
pub struct CollisionGroups {
    ids: FxHashMap<String, CollisionGroupId>,
    /// Symmetric square matrix indexed by group id; `matrix[a][b]` and
    /// `matrix[b][a]` are always written together.
    matrix: Vec<Vec<bool>>,
}

impl Default for CollisionGroups {
    fn default() -> Self {
        let mut groups = Self {
            ids: FxHashMap::default(),
            matrix: Vec::new(),
        };
        groups.create_group(DEFAULT_COLLISION_GROUP);
        groups
    }
}

impl CollisionGroups {
    /// Register a new group, collidable by default with every existing group.
    ///
    /// Creating a group that already exists logs a warning and returns the
    /// existing id unchanged.
    pub fn create_group(&mut self, name: impl Into<String>) -> CollisionGroupId {
        let name = name.into();
        if let Some(&id) = self.ids.get(&name) {
            warn!("Collision group '{name}' already exists");
            return id;
        }

        let id = CollisionGroupId(self.matrix.len() as u32);
        for row in self.matrix.iter_mut() {
            row.push(true);
        }
        self.matrix.push(vec![true; self.matrix.len() + 1]);
        self.ids.insert(name.clone(), id);
        debug!("Created collision group '{name}' with id {}", id.0);
        id
    }

    /// Set whether two groups may collide. Both groups must already exist;
    /// otherwise this logs an error and leaves the matrix untouched.
    pub fn set_collidable(&mut self, group1: &str, group2: &str, collidable: bool) {
        let Some(&a) = self.ids.get(group1) else {
            error!("Collision group '{group1}' does not exist");
            return;
        };
        let Some(&b) = self.ids.get(group2) else {
            error!("Collision group '{group2}' does not exist");
            return;
        };

        self.matrix[a.0 as usize][b.0 as usize] = collidable;
        self.matrix[b.0 as usize][a.0 as usize] = collidable;
        debug!(
            "Collision group '{group1}' is {} collidable with '{group2}'",
            if collidable { "now" } else { "no longer" }
        );
    }

    /// Whether two groups may collide. Pure lookup.
    pub fn is_collidable(&self, a: CollisionGroupId, b: CollisionGroupId) -> bool {
        self.matrix[a.0 as usize][b.0 as usize]
    }

    /// Whether a group with this name has been registered.
    pub fn is_group(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Id of the always-present default group.
    pub fn default_group(&self) -> CollisionGroupId {
        self.ids[DEFAULT_COLLISION_GROUP]
    }

    /// Resolve a group name to its id. Unknown names fall back to the
    /// default group with a logged warning.
    pub fn resolve(&self, name: &str) -> CollisionGroupId {
        match self.ids.get(name) {
            Some(&id) => id,
            None => {
                warn!(
                    "Collision group '{name}' does not exist. Defaulting to '{DEFAULT_COLLISION_GROUP}'"
                );
                self.default_group()
            }
        }
    }

    /// Name of a group id, if it is still registered.
    pub fn name_of(&self, id: CollisionGroupId) -> Option<&str> {
        self.ids
            .iter()
            .find(|&(_, &candidate)| candidate == id)
            .map(|(name, _)| name.as_str())
    }
}

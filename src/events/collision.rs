//! Collision transition events.
//!
//! The collision system diffs this step's surviving pairs against the
//! previous step's and emits exactly one event per transition:
//! [`CollisionBegan`] on the step an overlap appears, [`CollisionEnded`] on
//! the step it ceases (including when one participant was despawned
//! mid-overlap). Observers subscribe with `world.add_observer` and react in
//! a decoupled manner (damage, sound, despawn, etc.).
//!
//! Each transition is reported twice, once per participant, so an observer
//! filtering on `event.entity` sees the collision from that entity's
//! perspective: `other` is the opposing entity and `normal` points away from
//! `entity`. The two normals reported for one transition are anti-parallel.

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Event fired on the step two collidable entities begin overlapping.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionBegan {
    /// The participant this notification is addressed to.
    pub entity: Entity,
    /// The entity it collided with.
    pub other: Entity,
    /// Overlap depth along the separation normal.
    pub penetration: f32,
    /// Unit separation normal, pointing from `entity` toward `other`.
    pub normal: Vec2,
    /// Approximate world-space contact point.
    pub contact: Vec2,
}

/// Event fired on the step two previously overlapping entities separate.
///
/// `other` may no longer exist if the overlap ended because it was
/// despawned; observers should not assume it can still be looked up.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionEnded {
    /// The participant this notification is addressed to.
    pub entity: Entity,
    /// The entity it is no longer colliding with.
    pub other: Entity,
}

//! Oriented rectangular collider component.
//!
//! A [`Collider`] caches the world-space vertices and edge normals of the
//! oriented rectangle spanned by its entity's
//! [`Transform`](crate::components::transform::Transform) bounding box and
//! rotation. The cache is refreshed by the transform flush pass whenever the
//! transform changed, so narrow-phase tests always see current geometry.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::transform::Bounding;
use crate::resources::groups::{CollisionGroupId, CollisionGroups};

/// Collidable-rectangle component for an entity with a `Transform`.
#[derive(Component, Clone, Debug)]
pub struct Collider {
    /// Whether this collider participates in collision detection at all.
    /// Non-collidable entities are never inserted into the broad phase.
    pub is_collidable: bool,
    group: CollisionGroupId,
    vertices: SmallVec<[Vec2; 4]>,
    axes: SmallVec<[Vec2; 2]>,
}

impl Collider {
    /// Create a collidable collider in the named group.
    ///
    /// Unknown group names fall back to the default group (logged by
    /// [`CollisionGroups::resolve`]).
    pub fn new(group: &str, groups: &CollisionGroups) -> Self {
        Self {
            is_collidable: true,
            group: groups.resolve(group),
            vertices: SmallVec::new(),
            axes: SmallVec::new(),
        }
    }

    pub fn with_collidable(mut self, is_collidable: bool) -> Self {
        self.is_collidable = is_collidable;
        self
    }

    pub fn group(&self) -> CollisionGroupId {
        self.group
    }

    /// Reassign the collision group by name, with the same unknown-name
    /// fallback as [`new`](Self::new).
    pub fn set_group(&mut self, group: &str, groups: &CollisionGroups) {
        self.group = groups.resolve(group);
    }

    /// World-space corners of the oriented rectangle (empty until the first
    /// refresh, or when the bounding box has no area).
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// The two unique unit edge normals of the oriented rectangle.
    pub fn axes(&self) -> &[Vec2] {
        &self.axes
    }

    /// Rebuild vertices and axes from a bounding box and rotation.
    ///
    /// The rectangle is rotated about the bounding origin. A degenerate
    /// bounding box (the entity was created but never sized) clears the
    /// cache, leaving the collider inert.
    pub fn refresh(&mut self, bounding: Bounding, rotation_degrees: f32) {
        self.vertices.clear();
        self.axes.clear();

        if bounding.w <= 0.0 || bounding.h <= 0.0 {
            return;
        }

        let origin = bounding.min();
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        let local = [
            Vec2::ZERO,
            Vec2::new(bounding.w, 0.0),
            Vec2::new(bounding.w, bounding.h),
            Vec2::new(0.0, bounding.h),
        ];

        for corner in local {
            self.vertices.push(Vec2::new(
                origin.x + corner.x * cos - corner.y * sin,
                origin.y + corner.x * sin + corner.y * cos,
            ));
        }

        // A rectangle has two unique edge directions; the other two edges
        // are parallel and contribute the same normals.
        for index in 0..2 {
            let edge = self.vertices[index + 1] - self.vertices[index];
            let length = edge.length();
            if length == 0.0 {
                continue;
            }
            self.axes.push(Vec2::new(edge.y, -edge.x) / length);
        }
    }
}

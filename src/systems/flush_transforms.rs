//! Dirty-transform flush for the whole entity tree.
//!
//! Walks root entities (no [`ChildOf`]) and recurses depth-first so a
//! parent's bounding box is final before any child resolves against it.
//! A parent's pending POSITION/SIZE bits are inherited by its children on
//! the way down, which makes a parent mutation cascade through the whole
//! subtree within the same step.
//!
//! # Schedule position
//!
//! Must run **before** collision detection and integration: both read
//! bounding boxes and collider geometry, and this pass is what brings those
//! in sync with the most recent setter calls.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::collider::Collider;
use crate::components::transform::{Bounding, DirtyFlags, Transform};
use crate::resources::config::PhysicsConfig;
use crate::resources::screensize::ScreenSize;

/// Flush every dirty [`Transform`], parents before children, refreshing the
/// cached geometry of any [`Collider`] whose transform changed.
pub fn flush_transforms(
    roots: Query<Entity, (With<Transform>, Without<ChildOf>)>,
    children_query: Query<&Children>,
    mut transforms: Query<(&mut Transform, Option<&mut Collider>)>,
    screen: Res<ScreenSize>,
    config: Res<PhysicsConfig>,
) {
    let screen = screen.as_vec2();
    for root in roots.iter() {
        flush_recursive(
            root,
            None,
            DirtyFlags::empty(),
            &children_query,
            &mut transforms,
            screen,
            config.tile_size,
        );
    }
}

fn flush_recursive(
    entity: Entity,
    parent: Option<Bounding>,
    inherited: DirtyFlags,
    children_query: &Query<&Children>,
    transforms: &mut Query<(&mut Transform, Option<&mut Collider>)>,
    screen: Vec2,
    tile_size: f32,
) {
    let mut child_parent = parent;
    let mut cascade = inherited;

    if let Ok((mut transform, collider)) = transforms.get_mut(entity) {
        transform.inherit(inherited);
        let flushed = transform.flush(parent, screen, tile_size);

        if !flushed.is_empty()
            && let Some(mut collider) = collider
        {
            collider.refresh(transform.bounding(), transform.rotation());
        }

        child_parent = Some(transform.bounding());
        cascade = flushed;
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            flush_recursive(
                child,
                child_parent,
                cascade,
                children_query,
                transforms,
                screen,
                tile_size,
            );
        }
    }
}

//! Collision detection: broad-phase grid, SAT narrow phase, event diffing.
//!
//! Runs once per step, after the transform flush. The broad phase rebuilds
//! the [`SpatialGrid`] from every collidable entity's bounding box; only
//! entities sharing a cell are candidate pairs. Candidates whose collision
//! groups permit contact go through the Separating Axis Theorem test, and
//! surviving pairs land in [`Contacts`] with penetration, normal and an
//! approximate contact point.
//!
//! Finally the step's pair set is diffed against the previous step's to emit
//! [`CollisionBegan`]/[`CollisionEnded`] exactly once per transition — pairs
//! orphaned by a despawn included.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::components::collider::Collider;
use crate::components::transform::Transform;
use crate::events::collision::{CollisionBegan, CollisionEnded};
use crate::resources::config::PhysicsConfig;
use crate::resources::contacts::{CollisionPair, Contact, Contacts};
use crate::resources::grid::SpatialGrid;
use crate::resources::groups::CollisionGroups;

/// Axes whose projections are this close to parallel are treated as
/// duplicates and tested once.
const PARALLEL_AXIS_EPSILON: f32 = 1e-4;

/// Produce this step's collision set and fire transition events.
pub fn detect_collisions(
    mut commands: Commands,
    colliders: Query<(Entity, &Collider, &Transform)>,
    entities: Query<Entity>,
    groups: Res<CollisionGroups>,
    config: Res<PhysicsConfig>,
    mut grid: ResMut<SpatialGrid>,
    mut contacts: ResMut<Contacts>,
) {
    // Broad phase: full rebuild, O(n) insertion.
    grid.set_cell_size(config.cell_size);
    grid.clear();
    for (entity, collider, transform) in colliders.iter() {
        if collider.is_collidable {
            grid.insert(entity, transform.bounding());
        }
    }

    // Narrow phase over candidate pairs. A pair spanning several shared
    // cells is tested once.
    let contacts = &mut *contacts;
    contacts.current.clear();
    let mut tested: FxHashSet<CollisionPair> = FxHashSet::default();

    for bucket in grid.buckets() {
        for (index, &a) in bucket.iter().enumerate() {
            for &b in &bucket[index + 1..] {
                let pair = CollisionPair::new(a, b);
                if !tested.insert(pair) {
                    continue;
                }

                let Ok((_, collider_a, transform_a)) = colliders.get(pair.first()) else {
                    continue;
                };
                let Ok((_, collider_b, transform_b)) = colliders.get(pair.second()) else {
                    continue;
                };

                // Group permission is checked before any geometry.
                if !groups.is_collidable(collider_a.group(), collider_b.group()) {
                    continue;
                }

                if let Some(contact) = sat_test(collider_a, transform_a, collider_b, transform_b) {
                    contacts.current.insert(pair, contact);
                }
            }
        }
    }

    // Edge-triggered notifications, one per participant per transition.
    for (&pair, contact) in contacts.current.iter() {
        if contacts.previous.contains(&pair) {
            continue;
        }
        commands.trigger(CollisionBegan {
            entity: pair.first(),
            other: pair.second(),
            penetration: contact.penetration,
            normal: contact.normal,
            contact: contact.point,
        });
        commands.trigger(CollisionBegan {
            entity: pair.second(),
            other: pair.first(),
            penetration: contact.penetration,
            normal: -contact.normal,
            contact: contact.point,
        });
    }

    for &pair in contacts.previous.iter() {
        if contacts.current.contains_key(&pair) {
            continue;
        }
        // A participant may have been despawned mid-overlap; only survivors
        // are notified.
        if entities.contains(pair.first()) {
            commands.trigger(CollisionEnded {
                entity: pair.first(),
                other: pair.second(),
            });
        }
        if entities.contains(pair.second()) {
            commands.trigger(CollisionEnded {
                entity: pair.second(),
                other: pair.first(),
            });
        }
    }

    contacts.previous = contacts.current.keys().copied().collect();
}

/// Oriented-rectangle intersection test via the Separating Axis Theorem.
///
/// Tests the unique edge normals of both rectangles (at most 4 axes; fewer
/// when edges are parallel, as with two axis-aligned boxes). Any axis with a
/// projection gap proves separation. Otherwise the axis with the smallest
/// overlap — first encountered on ties — yields penetration depth and the
/// separation normal, oriented from `a` toward `b`.
///
/// The contact point is the midpoint between the two centers along the
/// normal, a deliberate single-point approximation of the contact manifold.
pub(crate) fn sat_test(
    a: &Collider,
    transform_a: &Transform,
    b: &Collider,
    transform_b: &Transform,
) -> Option<Contact> {
    let mut axes: SmallVec<[Vec2; 4]> = SmallVec::new();
    for &axis in a.axes().iter().chain(b.axes().iter()) {
        let duplicate = axes
            .iter()
            .any(|known| known.dot(axis).abs() >= 1.0 - PARALLEL_AXIS_EPSILON);
        if !duplicate {
            axes.push(axis);
        }
    }

    // A collider with degenerate geometry never collides.
    if axes.is_empty() {
        return None;
    }

    let mut min_overlap = f32::INFINITY;
    let mut best_axis = Vec2::ZERO;

    for &axis in &axes {
        let (min_a, max_a) = project(axis, a.vertices());
        let (min_b, max_b) = project(axis, b.vertices());

        if min_a > max_b || min_b > max_a {
            return None;
        }

        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap < min_overlap {
            min_overlap = overlap;
            best_axis = axis;
        }
    }

    let mut normal = best_axis;
    let delta = transform_b.center() - transform_a.center();
    if delta.dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(Contact {
        penetration: min_overlap,
        normal,
        point: transform_a.center() + normal * (delta.dot(normal) * 0.5),
    })
}

/// Project vertices onto a unit axis, returning the `[min, max]` interval.
fn project(axis: Vec2, vertices: &[Vec2]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for vertex in vertices {
        let dot = vertex.dot(axis);
        min = min.min(dot);
        max = max.max(dot);
    }

    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::Coord;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn rect(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> (Collider, Transform) {
        let groups = CollisionGroups::default();
        let mut transform =
            Transform::new(Coord::pixels(x, y), Coord::pixels(w, h)).with_rotation(rotation);
        transform.flush(None, SCREEN, 32.0);
        let mut collider = Collider::new("default", &groups);
        collider.refresh(transform.bounding(), transform.rotation());
        (collider, transform)
    }

    // ==================== SAT TESTS ====================

    #[test]
    fn separated_rectangles_do_not_collide() {
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(5.0, 0.0, 2.0, 2.0, 0.0);
        assert!(sat_test(&ca, &ta, &cb, &tb).is_none());
    }

    #[test]
    fn touching_edges_count_as_contact_with_zero_depth() {
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(2.0, 0.0, 2.0, 2.0, 0.0);
        let contact = sat_test(&ca, &ta, &cb, &tb).unwrap();
        assert!(approx_eq(contact.penetration, 0.0));
    }

    #[test]
    fn known_overlap_reports_exact_penetration_and_normal() {
        // The canonical scenario: A at (0,0), B at (1,0), both 2x2.
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(1.0, 0.0, 2.0, 2.0, 0.0);

        let contact = sat_test(&ca, &ta, &cb, &tb).unwrap();
        assert!(approx_eq(contact.penetration, 1.0));
        assert!(approx_eq(contact.normal.length(), 1.0));
        assert!(approx_eq(contact.normal.x, 1.0));
        assert!(approx_eq(contact.normal.y, 0.0));
    }

    #[test]
    fn normal_is_antiparallel_when_order_swaps() {
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(1.0, 0.0, 2.0, 2.0, 0.0);

        let forward = sat_test(&ca, &ta, &cb, &tb).unwrap();
        let backward = sat_test(&cb, &tb, &ca, &ta).unwrap();
        assert!(approx_eq(forward.normal.x, -backward.normal.x));
        assert!(approx_eq(forward.normal.y, -backward.normal.y));
        assert!(approx_eq(forward.penetration, backward.penetration));
    }

    #[test]
    fn axis_aligned_pair_dedupes_to_two_axes() {
        // Both rectangles share the same two edge normals, so a diagonal
        // overlap ties on both axes; the first axis enumerated must win.
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(1.0, 1.0, 2.0, 2.0, 0.0);

        let contact = sat_test(&ca, &ta, &cb, &tb).unwrap();
        assert!(approx_eq(contact.penetration, 1.0));
        // First axis in enumeration order is the top-edge normal.
        assert!(approx_eq(contact.normal.x, 0.0));
        assert!(approx_eq(contact.normal.y, 1.0));
    }

    #[test]
    fn rotation_invariance_same_pivot() {
        for angle in [0.0, 15.0, 45.0, 90.0, 137.0] {
            // Identical rectangles rotated identically always overlap.
            let (ca, ta) = rect(10.0, 10.0, 2.0, 2.0, angle);
            let (cb, tb) = rect(10.0, 10.0, 2.0, 2.0, angle);
            assert!(
                sat_test(&ca, &ta, &cb, &tb).is_some(),
                "coincident rects at {angle} degrees must collide"
            );

            // Distant rectangles rotated identically never do.
            let (cc, tc) = rect(100.0, 100.0, 2.0, 2.0, angle);
            assert!(
                sat_test(&ca, &ta, &cc, &tc).is_none(),
                "distant rects at {angle} degrees must not collide"
            );
        }
    }

    #[test]
    fn rotated_corner_overlap_detected() {
        // B's fixed corner at (1,1) stays inside A for moderate rotations
        // of both rectangles about their own origins.
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 30.0);
        let (cb, tb) = rect(1.0, 1.0, 2.0, 2.0, 30.0);
        assert!(sat_test(&ca, &ta, &cb, &tb).is_some());
    }

    #[test]
    fn zero_area_collider_never_collides() {
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(0.0, 0.0, 0.0, 2.0, 0.0);
        assert!(sat_test(&ca, &ta, &cb, &tb).is_none());
        assert!(sat_test(&cb, &tb, &ca, &ta).is_none());
    }

    #[test]
    fn contact_point_lies_between_centers() {
        let (ca, ta) = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let (cb, tb) = rect(1.0, 0.0, 2.0, 2.0, 0.0);
        let contact = sat_test(&ca, &ta, &cb, &tb).unwrap();
        // Centers at (1,1) and (2,1): midpoint along the x normal.
        assert!(approx_eq(contact.point.x, 1.5));
        assert!(approx_eq(contact.point.y, 1.0));
    }
}

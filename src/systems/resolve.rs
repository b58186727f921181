//! Sequential impulse resolution with positional correction.
//!
//! Runs after integration, over the collision set the narrow phase produced
//! this step. Each overlapping pair is first separated positionally — the
//! penetration split along the contact normal proportionally to inverse
//! mass — then, if the bodies are approaching at the contact point, an
//! impulse along the normal is exchanged with opposite signs, including the
//! angular contribution of off-center contacts.
//!
//! Anchored and non-dynamic bodies never move and never receive impulses;
//! pairs inside the penetration slop are left alone to avoid jitter.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::resources::config::PhysicsConfig;
use crate::resources::contacts::Contacts;

/// Resolve every colliding pair from this step's contact set.
pub fn resolve_collisions(
    contacts: Res<Contacts>,
    mut bodies: Query<(&mut PhysicsBody, &mut Transform)>,
    config: Res<PhysicsConfig>,
) {
    for (&pair, contact) in contacts.iter() {
        if contact.penetration <= config.penetration_slop {
            continue;
        }

        // Skipped defensively when either side lost its body mid-frame.
        let Ok([(mut body_a, mut transform_a), (mut body_b, mut transform_b)]) =
            bodies.get_many_mut([pair.first(), pair.second()])
        else {
            continue;
        };

        let a_dynamic = body_a.is_dynamic();
        let b_dynamic = body_b.is_dynamic();
        if !a_dynamic && !b_dynamic {
            continue;
        }

        let total_inverse_mass = body_a.inverse_mass() + body_b.inverse_mass();
        if total_inverse_mass == 0.0 {
            continue;
        }

        // Positional correction: push each dynamic body out along the
        // normal, weighted by its share of the total inverse mass.
        let correction =
            contact.normal * (contact.penetration * config.penetration_correction);
        if a_dynamic {
            transform_a.translate(-correction * (body_a.inverse_mass() / total_inverse_mass));
        }
        if b_dynamic {
            transform_b.translate(correction * (body_b.inverse_mass() / total_inverse_mass));
        }

        // Relative velocity at the contact point, rotational terms included.
        // Lever arms are measured from the pre-correction bounding centers.
        let lever_a = contact.point - transform_a.center();
        let lever_b = contact.point - transform_b.center();
        let velocity_a =
            body_a.velocity + Vec2::new(-lever_a.y, lever_a.x) * body_a.angular_velocity;
        let velocity_b =
            body_b.velocity + Vec2::new(-lever_b.y, lever_b.x) * body_b.angular_velocity;
        let along_normal = (velocity_b - velocity_a).dot(contact.normal);

        // Only approaching bodies exchange an impulse.
        if along_normal >= -config.impulse_epsilon {
            continue;
        }

        let restitution = body_a.restitution.min(body_b.restitution);
        let inertia_a = rectangle_inertia(body_a.mass(), transform_a.actual_size());
        let inertia_b = rectangle_inertia(body_b.mass(), transform_b.actual_size());
        let lever_a_cross = lever_a.perp_dot(contact.normal);
        let lever_b_cross = lever_b.perp_dot(contact.normal);

        let mut effective_mass = total_inverse_mass;
        if inertia_a > 0.0 {
            effective_mass += lever_a_cross * lever_a_cross / inertia_a;
        }
        if inertia_b > 0.0 {
            effective_mass += lever_b_cross * lever_b_cross / inertia_b;
        }

        let magnitude = -(1.0 + restitution) * along_normal / effective_mass;
        let impulse = contact.normal * magnitude;

        if a_dynamic {
            let inverse_mass = body_a.inverse_mass();
            body_a.velocity -= impulse * inverse_mass;
            if inertia_a > 0.0 {
                body_a.angular_velocity -= magnitude * lever_a_cross / inertia_a;
            }
        }
        if b_dynamic {
            let inverse_mass = body_b.inverse_mass();
            body_b.velocity += impulse * inverse_mass;
            if inertia_b > 0.0 {
                body_b.angular_velocity += magnitude * lever_b_cross / inertia_b;
            }
        }
    }
}

/// Moment of inertia of a solid rectangle about its center.
fn rectangle_inertia(mass: f32, size: Vec2) -> f32 {
    mass / 12.0 * (size.x * size.x + size.y * size.y)
}

//! Force/impulse integration into velocity and position.
//!
//! Once per step, each dynamic body drains its queued forces (decayed by the
//! global damping factor, dropped once negligible) and one-shot impulses
//! (consumed whole, never decayed) into linear and angular velocity, then
//! writes the resulting position and rotation deltas back through the
//! [`Transform`] setters — re-dirtying it for the next step's flush.
//!
//! Speeds that fall under the configured epsilon snap to exactly zero so
//! damped bodies come to rest instead of drifting forever.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::resources::config::PhysicsConfig;
use crate::resources::worldtime::WorldTime;

/// Integrate queued forces and impulses for every dynamic body.
pub fn integrate_bodies(
    mut query: Query<(&mut PhysicsBody, &mut Transform)>,
    time: Res<WorldTime>,
    config: Res<PhysicsConfig>,
) {
    let delta = time.delta;
    let decay = (1.0 - config.damping * delta).max(0.0);

    for (mut body, mut transform) in query.iter_mut() {
        // Anchored, static and kinematic bodies are never integrated.
        if !body.is_dynamic() {
            continue;
        }

        let inverse_mass = body.inverse_mass();
        let force_epsilon = config.velocity_epsilon;
        let mut net_force = Vec2::ZERO;
        let mut net_torque = 0.0;

        body.forces.retain_mut(|force| {
            force.vector *= decay;
            if force.vector.length() <= force_epsilon {
                return false;
            }
            net_force += force.vector;
            if force.offset != Vec2::ZERO {
                net_torque += force.offset.perp_dot(force.vector);
            }
            true
        });

        let mut net_impulse = Vec2::ZERO;
        let mut impulse_torque = 0.0;
        for impulse in body.impulses.drain(..) {
            net_impulse += impulse.vector;
            if impulse.offset != Vec2::ZERO {
                impulse_torque += impulse.offset.perp_dot(impulse.vector);
            }
        }

        body.velocity += net_force * inverse_mass * delta + net_impulse * inverse_mass;
        body.angular_velocity += net_torque * inverse_mass * delta + impulse_torque * inverse_mass;

        let speed = body.velocity.length();
        if speed > 0.0 && speed <= config.velocity_epsilon {
            body.velocity = Vec2::ZERO;
        } else if speed > config.velocity_epsilon {
            body.velocity *= decay;
            let step = body.velocity * delta;
            transform.translate(step);
        }

        let spin = body.angular_velocity.abs();
        if spin > 0.0 && spin <= config.angular_epsilon {
            body.angular_velocity = 0.0;
        } else if spin > config.angular_epsilon {
            body.angular_velocity *= decay;
            transform.rotate(body.angular_velocity.to_degrees() * delta);
        }
    }
}

//! Rigid-body component: mass, velocity, and queued forces/impulses.
//!
//! A [`PhysicsBody`] accumulates continuous forces and one-shot impulses
//! between steps; the
//! [`integrate_bodies`](crate::systems::movement::integrate_bodies) system
//! drains them into velocity and position once per step, and the impulse
//! resolver exchanges collision impulses afterwards.
//!
//! The `inverse_mass` invariant is maintained by the setters: it is `1/mass`
//! for free bodies and exactly `0` for anchored ones, which is what lets the
//! resolver treat immovable bodies uniformly (they absorb no correction).

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::{error, warn};

use crate::resources::config::DEFAULT_RESTITUTION;

/// How a body participates in integration and resolution.
///
/// Only `Dynamic` bodies are moved by the integrator or receive resolved
/// impulses. `Kinematic` bodies are driven externally through their
/// transform; `Static` bodies never move at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    #[default]
    Dynamic,
    Static,
    Kinematic,
}

/// A force or impulse vector plus its application point, stored as an offset
/// from the body center in bounding-size fractions (`-0.5..=0.5` per axis).
#[derive(Clone, Copy, Debug)]
pub struct AppliedForce {
    pub vector: Vec2,
    pub offset: Vec2,
}

/// Rigid-body state for an entity with a `Transform`.
#[derive(Component, Clone, Debug)]
pub struct PhysicsBody {
    mass: f32,
    inverse_mass: f32,
    /// Bounciness of collision responses, conventionally in `0.0..=1.0`.
    /// The resolver uses the lesser restitution of the two participants.
    pub restitution: f32,
    /// Linear velocity in pixels per second.
    pub velocity: Vec2,
    /// Angular velocity in radians per second.
    pub angular_velocity: f32,
    pub(crate) forces: Vec<AppliedForce>,
    pub(crate) impulses: Vec<AppliedForce>,
    is_anchored: bool,
    body_type: BodyType,
}

impl PhysicsBody {
    /// Create a dynamic, unanchored body.
    ///
    /// Mass must be positive; a non-positive mass is rejected with a logged
    /// error and replaced by `1.0`.
    pub fn new(mass: f32) -> Self {
        let mass = if mass > 0.0 {
            mass
        } else {
            error!("PhysicsBody mass must be positive, got {mass}; using 1.0");
            1.0
        };

        Self {
            mass,
            inverse_mass: 1.0 / mass,
            restitution: DEFAULT_RESTITUTION,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            forces: Vec::new(),
            impulses: Vec::new(),
            is_anchored: false,
            body_type: BodyType::default(),
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    /// Builder shorthand for an immovable body.
    pub fn anchored(mut self) -> Self {
        self.set_anchored(true);
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Change the mass, keeping `inverse_mass` consistent. Non-positive
    /// masses are rejected and the prior mass kept.
    pub fn set_mass(&mut self, mass: f32) {
        if mass <= 0.0 {
            error!("PhysicsBody mass must be positive, got {mass}; keeping {}", self.mass);
            return;
        }
        self.mass = mass;
        self.refresh_inverse_mass();
    }

    /// `1/mass`, or `0` while anchored.
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn is_anchored(&self) -> bool {
        self.is_anchored
    }

    /// Anchor or release the body. Anchoring kills all motion: velocity and
    /// angular velocity are zeroed and queued forces dropped.
    pub fn set_anchored(&mut self, is_anchored: bool) {
        self.is_anchored = is_anchored;
        self.refresh_inverse_mass();

        if is_anchored {
            self.velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
            self.clear_forces();
        }
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Whether the integrator and resolver may move this body.
    pub fn is_dynamic(&self) -> bool {
        !self.is_anchored && self.body_type == BodyType::Dynamic
    }

    /// Queue a continuous force through the body center.
    pub fn add_force(&mut self, force: Vec2) {
        self.add_force_at(force, Vec2::new(0.5, 0.5));
    }

    /// Queue a continuous force applied at `point`, given in bounding-box
    /// fractions (`(0.5, 0.5)` is the center). Off-center points contribute
    /// torque. Zero-magnitude forces are ignored with a warning.
    pub fn add_force_at(&mut self, force: Vec2, point: Vec2) {
        if force.length_squared() == 0.0 {
            warn!("Applying a force with a magnitude of 0 has no effect");
            return;
        }

        self.forces.push(AppliedForce {
            vector: force,
            offset: point - Vec2::new(0.5, 0.5),
        });
    }

    /// Queue an instantaneous velocity change through the body center.
    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.add_impulse_at(impulse, Vec2::new(0.5, 0.5));
    }

    /// Queue an instantaneous velocity change at `point` (bounding-box
    /// fractions). Consumed whole on the next step, never decayed.
    pub fn add_impulse_at(&mut self, impulse: Vec2, point: Vec2) {
        if impulse.length_squared() == 0.0 {
            warn!("Applying an impulse with a magnitude of 0 has no effect");
            return;
        }

        self.impulses.push(AppliedForce {
            vector: impulse,
            offset: point - Vec2::new(0.5, 0.5),
        });
    }

    /// Drop all queued forces.
    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }

    /// Number of forces currently queued.
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    fn refresh_inverse_mass(&mut self) {
        self.inverse_mass = if self.is_anchored { 0.0 } else { 1.0 / self.mass };
    }
}

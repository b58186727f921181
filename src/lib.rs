//! Impetus: real-time 2D collision detection and rigid-body physics.
//!
//! This crate is the collision/physics core of a retained-mode 2D engine:
//! oriented-rectangle bodies with lazily flushed transforms, a spatial-hash
//! broad phase, a Separating-Axis-Theorem narrow phase with collision-group
//! filtering, edge-triggered begin/end collision events, and a force/impulse
//! integrator with a sequential impulse resolver.
//!
//! Everything lives in a `bevy_ecs` [`World`](bevy_ecs::world::World);
//! see [`step::PhysicsStep`] for driving one simulation step in the fixed
//! phase order.

pub mod components;
pub mod events;
pub mod resources;
pub mod step;
pub mod systems;

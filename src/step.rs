//! Step driver: fixed-order execution of one simulation step.
//!
//! The surrounding frame loop calls [`PhysicsStep::run`] once per frame with
//! the elapsed seconds. Every step executes the four phases to completion,
//! single-threaded, in the mandated order:
//!
//! 1. flush dirty transforms (parents before children),
//! 2. broad phase + SAT narrow phase, producing this step's collision set
//!    and firing begin/end events,
//! 3. integrate forces/impulses into velocities and positions,
//! 4. resolve collisions, correcting positions and velocities.
//!
//! Phases 3 and 4 re-dirty transforms; the next step's flush picks that up.

use bevy_ecs::prelude::*;

use crate::resources::config::PhysicsConfig;
use crate::resources::contacts::Contacts;
use crate::resources::grid::SpatialGrid;
use crate::resources::groups::CollisionGroups;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::detect_collisions;
use crate::systems::flush_transforms::flush_transforms;
use crate::systems::movement::integrate_bodies;
use crate::systems::resolve::resolve_collisions;

/// Insert every resource the physics schedule expects, where missing.
///
/// Call once when setting up the world; existing resources (a tuned
/// [`PhysicsConfig`], a populated [`CollisionGroups`]) are left alone.
pub fn init_physics(world: &mut World) {
    world.init_resource::<WorldTime>();
    world.init_resource::<ScreenSize>();
    world.init_resource::<PhysicsConfig>();
    world.init_resource::<CollisionGroups>();
    world.init_resource::<SpatialGrid>();
    world.init_resource::<Contacts>();
}

/// Owns the physics schedule and runs it one step at a time.
pub struct PhysicsStep {
    schedule: Schedule,
}

impl Default for PhysicsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsStep {
    pub fn new() -> Self {
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                flush_transforms,
                detect_collisions,
                integrate_bodies,
                resolve_collisions,
            )
                .chain(),
        );
        Self { schedule }
    }

    /// Advance the simulation by `delta` seconds of unscaled frame time.
    pub fn run(&mut self, world: &mut World, delta: f32) {
        update_world_time(world, delta);
        self.schedule.run(world);
    }
}

/// Update elapsed and delta seconds on the [`WorldTime`] resource.
///
/// `delta` is the unscaled frame delta; the current `time_scale` is applied
/// before it reaches the integration systems.
pub fn update_world_time(world: &mut World, delta: f32) {
    let mut time = world.resource_mut::<WorldTime>();
    let scaled = delta * time.time_scale;
    time.elapsed += scaled;
    time.delta = scaled;
    time.frame_count += 1;
}

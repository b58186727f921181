//! Integration tests for force integration and impulse resolution.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test physics_step_integration
//! ```

use approx::assert_abs_diff_eq;
use bevy_ecs::prelude::*;
use glam::Vec2;

use impetus::components::collider::Collider;
use impetus::components::physicsbody::{BodyType, PhysicsBody};
use impetus::components::transform::{Coord, Transform};
use impetus::resources::config::PhysicsConfig;
use impetus::resources::groups::CollisionGroups;
use impetus::step::{PhysicsStep, init_physics};

const DT: f32 = 1.0 / 60.0;

/// World with damping disabled so velocities stay analytic.
fn make_world() -> (World, PhysicsStep) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut world = World::new();
    init_physics(&mut world);
    world.resource_mut::<PhysicsConfig>().damping = 0.0;
    (world, PhysicsStep::new())
}

fn spawn_body(
    world: &mut World,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    body: PhysicsBody,
) -> Entity {
    let groups = world.resource::<CollisionGroups>().clone();
    world
        .spawn((
            Transform::new(Coord::pixels(x, y), Coord::pixels(w, h)),
            Collider::new("default", &groups),
            body,
        ))
        .id()
}

// ==================== INTEGRATOR TESTS ====================

#[test]
fn force_accelerates_and_moves_body() {
    let (mut world, mut step) = make_world();
    let mut body = PhysicsBody::new(2.0);
    body.add_force(Vec2::new(4.0, 0.0));
    let entity = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body);

    step.run(&mut world, 1.0);

    let body = world.get::<PhysicsBody>(entity).unwrap();
    // a = F/m = 2, dt = 1: v = 2, moved 2.
    assert_abs_diff_eq!(body.velocity.x, 2.0, epsilon = 1e-4);

    step.run(&mut world, 0.0);
    let bounding = world.get::<Transform>(entity).unwrap().bounding();
    assert_abs_diff_eq!(bounding.x, 2.0, epsilon = 1e-4);
}

#[test]
fn impulse_is_consumed_once() {
    let (mut world, mut step) = make_world();
    let mut body = PhysicsBody::new(1.0);
    body.add_impulse(Vec2::new(3.0, 0.0));
    let entity = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body);

    step.run(&mut world, DT);
    assert_abs_diff_eq!(
        world.get::<PhysicsBody>(entity).unwrap().velocity.x,
        3.0,
        epsilon = 1e-4
    );

    // No re-application on later steps, and no decay with damping off.
    step.run(&mut world, DT);
    assert_abs_diff_eq!(
        world.get::<PhysicsBody>(entity).unwrap().velocity.x,
        3.0,
        epsilon = 1e-4
    );
}

#[test]
fn decayed_forces_are_dropped() {
    let (mut world, mut step) = make_world();
    world.resource_mut::<PhysicsConfig>().damping = 0.8;
    let mut body = PhysicsBody::new(1.0);
    body.add_force(Vec2::new(0.02, 0.0));
    let entity = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body);

    // decay = 1 - 0.8 = 0.2 at dt=1: 0.02 * 0.2 falls under the epsilon.
    step.run(&mut world, 1.0);

    assert_eq!(world.get::<PhysicsBody>(entity).unwrap().force_count(), 0);
}

#[test]
fn tiny_velocity_snaps_to_zero() {
    let (mut world, mut step) = make_world();
    let mut body = PhysicsBody::new(1.0);
    body.velocity = Vec2::new(0.005, 0.0);
    let entity = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body);

    step.run(&mut world, DT);

    let body = world.get::<PhysicsBody>(entity).unwrap();
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[test]
fn off_center_force_spins_body() {
    let (mut world, mut step) = make_world();
    let mut body = PhysicsBody::new(1.0);
    // Upward force on the right edge: positive torque, counterclockwise in
    // screen coordinates.
    body.add_force_at(Vec2::new(0.0, 10.0), Vec2::new(1.0, 0.5));
    let entity = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body);

    step.run(&mut world, 1.0);

    let body = world.get::<PhysicsBody>(entity).unwrap();
    // torque = 0.5 * 10 = 5, over mass 1 and dt 1.
    assert_abs_diff_eq!(body.angular_velocity, 5.0, epsilon = 1e-4);

    step.run(&mut world, 0.0);
    assert!(world.get::<Transform>(entity).unwrap().rotation() > 0.0);
}

#[test]
fn kinematic_and_static_bodies_are_not_integrated() {
    let (mut world, mut step) = make_world();
    let mut kinematic = PhysicsBody::new(1.0).with_body_type(BodyType::Kinematic);
    kinematic.velocity = Vec2::new(10.0, 0.0);
    let mut fixed = PhysicsBody::new(1.0).with_body_type(BodyType::Static);
    fixed.velocity = Vec2::new(10.0, 0.0);

    let k = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, kinematic);
    let s = spawn_body(&mut world, 100.0, 0.0, 2.0, 2.0, fixed);

    for _ in 0..3 {
        step.run(&mut world, DT);
    }

    assert_abs_diff_eq!(
        world.get::<Transform>(k).unwrap().bounding().x,
        0.0,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        world.get::<Transform>(s).unwrap().bounding().x,
        100.0,
        epsilon = 1e-5
    );
}

// ==================== RESOLVER TESTS ====================

#[test]
fn equal_mass_head_on_elastic_collision_exchanges_velocities() {
    let (mut world, mut step) = make_world();
    let mut body_a = PhysicsBody::new(1.0).with_restitution(1.0);
    body_a.velocity = Vec2::new(10.0, 0.0);
    let mut body_b = PhysicsBody::new(1.0).with_restitution(1.0);
    body_b.velocity = Vec2::new(-10.0, 0.0);

    let a = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body_a);
    let b = spawn_body(&mut world, 1.0, 0.0, 2.0, 2.0, body_b);

    step.run(&mut world, DT);

    let body_a = world.get::<PhysicsBody>(a).unwrap();
    let body_b = world.get::<PhysicsBody>(b).unwrap();
    assert_abs_diff_eq!(body_a.velocity.x, -10.0, epsilon = 1e-3);
    assert_abs_diff_eq!(body_b.velocity.x, 10.0, epsilon = 1e-3);
    // Head-on contact through the centers imparts no spin.
    assert_abs_diff_eq!(body_a.angular_velocity, 0.0, epsilon = 1e-4);
}

#[test]
fn anchored_body_is_never_moved_by_resolution() {
    let (mut world, mut step) = make_world();
    let mut moving = PhysicsBody::new(1.0);
    moving.velocity = Vec2::new(5.0, 0.0);
    let a = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, moving);
    let b = spawn_body(&mut world, 1.0, 0.0, 2.0, 2.0, PhysicsBody::new(1.0).anchored());

    for _ in 0..5 {
        step.run(&mut world, DT);
    }

    let anchored = world.get::<PhysicsBody>(b).unwrap();
    assert_eq!(anchored.velocity, Vec2::ZERO);
    let bounding = world.get::<Transform>(b).unwrap().bounding();
    assert_abs_diff_eq!(bounding.x, 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(bounding.y, 0.0, epsilon = 1e-5);

    // The dynamic body took the entire separation.
    let mover = world.get::<Transform>(a).unwrap().bounding();
    assert!(mover.x < 0.0);
}

#[test]
fn overlapping_pair_is_pushed_apart_symmetrically() {
    let (mut world, mut step) = make_world();
    let a = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, PhysicsBody::new(1.0));
    let b = spawn_body(&mut world, 1.0, 0.0, 2.0, 2.0, PhysicsBody::new(1.0));

    // First step corrects the overlap; second flushes the moved transforms
    // and verifies the configuration is stable.
    step.run(&mut world, DT);
    step.run(&mut world, DT);

    let bounding_a = world.get::<Transform>(a).unwrap().bounding();
    let bounding_b = world.get::<Transform>(b).unwrap().bounding();
    // Penetration of 1.0 split evenly between equal masses.
    assert_abs_diff_eq!(bounding_a.x, -0.5, epsilon = 1e-3);
    assert_abs_diff_eq!(bounding_b.x, 1.5, epsilon = 1e-3);

    // Residual overlap is within the slop; nothing moves further.
    step.run(&mut world, DT);
    let settled = world.get::<Transform>(a).unwrap().bounding();
    assert_abs_diff_eq!(settled.x, bounding_a.x, epsilon = 1e-5);
}

#[test]
fn shallow_overlap_within_slop_is_left_alone() {
    let (mut world, mut step) = make_world();
    let a = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, PhysicsBody::new(1.0));
    let b = spawn_body(&mut world, 1.96, 0.0, 2.0, 2.0, PhysicsBody::new(1.0));

    step.run(&mut world, DT);
    step.run(&mut world, DT);

    assert_abs_diff_eq!(
        world.get::<Transform>(a).unwrap().bounding().x,
        0.0,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        world.get::<Transform>(b).unwrap().bounding().x,
        1.96,
        epsilon = 1e-5
    );
}

#[test]
fn separating_bodies_receive_no_impulse() {
    let (mut world, mut step) = make_world();
    let mut body_a = PhysicsBody::new(1.0);
    body_a.velocity = Vec2::new(-5.0, 0.0);
    let mut body_b = PhysicsBody::new(1.0);
    body_b.velocity = Vec2::new(5.0, 0.0);

    let a = spawn_body(&mut world, 0.0, 0.0, 2.0, 2.0, body_a);
    let b = spawn_body(&mut world, 1.0, 0.0, 2.0, 2.0, body_b);

    step.run(&mut world, DT);

    // Already separating: positions get corrected but velocities stand.
    assert_abs_diff_eq!(
        world.get::<PhysicsBody>(a).unwrap().velocity.x,
        -5.0,
        epsilon = 1e-4
    );
    assert_abs_diff_eq!(
        world.get::<PhysicsBody>(b).unwrap().velocity.x,
        5.0,
        epsilon = 1e-4
    );
}

#[test]
fn bodies_without_collider_ignore_each_other() {
    let (mut world, mut step) = make_world();
    // Overlapping transforms, but no Collider components: the pair never
    // enters the broad phase and the resolver sees no contacts.
    let a = world
        .spawn((
            Transform::new(Coord::pixels(0.0, 0.0), Coord::pixels(2.0, 2.0)),
            PhysicsBody::new(1.0),
        ))
        .id();
    world.spawn((
        Transform::new(Coord::pixels(1.0, 0.0), Coord::pixels(2.0, 2.0)),
        PhysicsBody::new(1.0),
    ));

    step.run(&mut world, DT);
    step.run(&mut world, DT);

    assert_abs_diff_eq!(
        world.get::<Transform>(a).unwrap().bounding().x,
        0.0,
        epsilon = 1e-5
    );
}

//! Shared setup helpers for keel benchmarks.
//!
//! ## Running
//!
//! Wall-clock time (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//!
//! iai-callgrind (instruction counts, requires valgrind):
//!   cargo install iai-callgrind-runner
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics_iai
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- solver
//!
//! Every helper is deterministic so both suites measure identical
//! workloads.

use glam::Vec3;
use keel::physics::narrowphase::collide;
use keel::{
    Aabb, Collider, Constraint, ContactManifold, PhysicsBridge, PhysicsConfig, PhysicsWorld,
    RigidBody,
};

// ---------------------------------------------------------------------------
// Body fields (broadphase input)
// ---------------------------------------------------------------------------

/// Positions filling a cube-shaped grid, `spacing` apart on every axis.
pub fn grid_positions(n: usize, spacing: f32) -> Vec<Vec3> {
    let side = (n as f32).cbrt().ceil() as usize;
    let mut positions = Vec::with_capacity(n);
    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                if positions.len() == n {
                    return positions;
                }
                positions.push(Vec3::new(x as f32, y as f32, z as f32) * spacing);
            }
        }
    }
    positions
}

fn field(
    n: usize,
    spacing: f32,
    mut collider_for: impl FnMut(usize) -> Collider,
) -> (Vec<RigidBody>, Vec<Option<Aabb>>) {
    let mut bodies = Vec::with_capacity(n);
    let mut aabbs = Vec::with_capacity(n);
    for (i, position) in grid_positions(n, spacing).into_iter().enumerate() {
        bodies.push(RigidBody::new_dynamic(1.0, position));
        aabbs.push(Some(collider_for(i).aabb().translated(position)));
    }
    (bodies, aabbs)
}

/// Dynamic unit spheres packed so that grid neighbors overlap.
pub fn setup_dense_field(n: usize) -> (Vec<RigidBody>, Vec<Option<Aabb>>) {
    field(n, 1.5, |_| Collider::Sphere {
        center: Vec3::ZERO,
        radius: 1.0,
    })
}

/// Alternating spheres, boxes, and capsules on a tight grid.
pub fn setup_mixed_field(n: usize) -> (Vec<RigidBody>, Vec<Option<Aabb>>) {
    field(n, 1.5, |i| match i % 3 {
        0 => Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        },
        1 => Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::splat(0.8),
        },
        _ => Collider::Capsule {
            center: Vec3::ZERO,
            radius: 0.5,
            height: 1.0,
        },
    })
}

/// Dynamic unit spheres spread too far apart for any AABB overlap.
pub fn setup_sparse_field(n: usize) -> (Vec<RigidBody>, Vec<Option<Aabb>>) {
    field(n, 5.0, |_| Collider::Sphere {
        center: Vec3::ZERO,
        radius: 1.0,
    })
}

// ---------------------------------------------------------------------------
// Solver setup
// ---------------------------------------------------------------------------

/// A vertical stack of slightly interpenetrating spheres with
/// ready-made contact manifolds. Each body falls a little faster than
/// the one below it so every contact is approaching.
pub fn setup_contact_stack(n: usize) -> (Vec<RigidBody>, Vec<ContactManifold>) {
    let collider = Collider::Sphere {
        center: Vec3::ZERO,
        radius: 1.0,
    };
    let mut bodies = Vec::with_capacity(n);
    for i in 0..n {
        bodies.push(
            RigidBody::new_dynamic(1.0, Vec3::new(0.0, i as f32 * 1.8, 0.0))
                .with_velocity(Vec3::new(0.0, -0.1 * i as f32, 0.0)),
        );
    }

    let mut manifolds = Vec::with_capacity(n.saturating_sub(1));
    for i in 1..n {
        let below = collider.translated(bodies[i - 1].position);
        let above = collider.translated(bodies[i].position);
        if let Some(contact) = collide(&below, &above) {
            manifolds.push(ContactManifold::new(i - 1, i, contact));
        }
    }
    (bodies, manifolds)
}

// ---------------------------------------------------------------------------
// Full scenes
// ---------------------------------------------------------------------------

/// Ground plane + a cube of dynamic bodies raining onto it (mixed
/// spheres and boxes).
pub fn setup_scene(n: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysicsConfig::default());

    let ground = world.create_body(RigidBody::new_static(Vec3::new(0.0, -0.5, 0.0)));
    world
        .attach_collider(
            ground,
            Collider::Box {
                center: Vec3::ZERO,
                half_extents: Vec3::new(100.0, 0.5, 100.0),
            },
        )
        .expect("valid handle");

    for (i, position) in grid_positions(n, 1.5).into_iter().enumerate() {
        let handle = world.create_body(RigidBody::new_dynamic(
            1.0,
            position + Vec3::new(0.0, 2.0, 0.0),
        ));
        let collider = if i % 2 == 0 {
            Collider::Sphere {
                center: Vec3::ZERO,
                radius: 0.5,
            }
        } else {
            Collider::Box {
                center: Vec3::ZERO,
                half_extents: Vec3::splat(0.4),
            }
        };
        world.attach_collider(handle, collider).expect("valid handle");
    }
    world
}

/// A chain of distance joints hanging from a static anchor.
pub fn setup_joint_chain(n: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysicsConfig::default());

    let mut previous = world.create_body(RigidBody::new_static(Vec3::new(0.0, n as f32, 0.0)));
    for i in (0..n).rev() {
        let link = world.create_body(RigidBody::new_dynamic(1.0, Vec3::new(0.0, i as f32, 0.0)));
        world.add_constraint(Constraint::distance(previous, link, 1.0));
        previous = link;
    }
    world
}

/// A hecs world and physics bridge with `n` dynamic sphere entities
/// over a ground plane.
pub fn setup_bridge_scene(n: usize) -> (hecs::World, PhysicsBridge) {
    let mut ecs = hecs::World::new();
    let mut bridge = PhysicsBridge::new(PhysicsConfig::default());

    let ground = ecs.spawn(());
    bridge
        .add_rigid_body(
            &mut ecs,
            ground,
            RigidBody::new_static(Vec3::new(0.0, -0.5, 0.0)),
            Some(Collider::Box {
                center: Vec3::ZERO,
                half_extents: Vec3::new(100.0, 0.5, 100.0),
            }),
        )
        .expect("valid handle");

    for position in grid_positions(n, 1.5) {
        let entity = ecs.spawn(());
        bridge
            .add_rigid_body(
                &mut ecs,
                entity,
                RigidBody::new_dynamic(1.0, position + Vec3::new(0.0, 2.0, 0.0)),
                Some(Collider::Sphere {
                    center: Vec3::ZERO,
                    radius: 0.5,
                }),
            )
            .expect("valid handle");
    }
    (ecs, bridge)
}

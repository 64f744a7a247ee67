//! Keel rigid body physics
//!
//! A 3D rigid body simulation library with collision detection, joint
//! constraints, and a hecs ECS bridge.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Inertia tensors and orientation integration
//! 2. **physics** - Bodies, colliders, broadphase/narrowphase, solver,
//!    and the `PhysicsWorld` stepping loop
//! 3. **ecs** - hecs integration keyed by entity (feature = "ecs")
//!
//! # Quick start
//!
//! ```
//! use keel::{Collider, PhysicsConfig, PhysicsWorld, RigidBody};
//! use keel::glam::Vec3;
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let ball = world.create_body(RigidBody::new_dynamic(1.0, Vec3::new(0.0, 5.0, 0.0)));
//! world
//!     .attach_collider(
//!         ball,
//!         Collider::Sphere {
//!             center: Vec3::ZERO,
//!             radius: 0.5,
//!         },
//!     )
//!     .unwrap();
//!
//! let ground = world.create_body(RigidBody::new_static(Vec3::new(0.0, -0.5, 0.0)));
//! world
//!     .attach_collider(
//!         ground,
//!         Collider::Box {
//!             center: Vec3::ZERO,
//!             half_extents: Vec3::new(50.0, 0.5, 50.0),
//!         },
//!     )
//!     .unwrap();
//!
//! // Once per frame:
//! world.step(1.0 / 60.0);
//! ```

pub mod math;
pub mod physics;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use math::InertiaTensor;

pub use physics::collider::{Aabb, Collider, Ray, RayHit};
pub use physics::constraint::{Constraint, ConstraintKind};
pub use physics::contact::{Contact, ContactManifold};
pub use physics::rigid_body::{BodyType, Material, RigidBody};
pub use physics::{
    BodyHandle, PhysicsConfig, PhysicsError, PhysicsStats, PhysicsWorld, RaycastHit,
};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;

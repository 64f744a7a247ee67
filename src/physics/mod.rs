//! Rigid body simulation: bodies, collision detection, and solving.
//!
//! # Architecture
//!
//! [`PhysicsWorld`] owns all simulation state in index-aligned parallel
//! arrays and advances it with `step(dt)`, internally split into fixed
//! substeps. Each substep runs in a fixed order:
//!
//! 1. Recompute world-space AABBs
//! 2. Broadphase collision detection (AABB overlap)
//! 3. Narrowphase collision detection (specialized pair tests)
//! 4. Integrate velocities (gravity, damping, orientation)
//! 5. Solve contact and joint velocity constraints
//! 6. Integrate positions
//! 7. Baumgarte position correction
//! 8. Put sleeping bodies to rest

pub mod broadphase;
pub mod collider;
pub mod constraint;
pub mod contact;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;

use std::time::{Duration, Instant};

use glam::Vec3;
use thiserror::Error;
use tracing::trace;

use self::broadphase::BroadPhase;
use self::collider::{Aabb, Collider, Ray};
use self::constraint::Constraint;
use self::contact::ContactManifold;
use self::rigid_body::RigidBody;

/// Errors from handle-validated world operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("handle does not name a live body")]
    InvalidHandle,

    #[error("constraint body A has no physics body")]
    InvalidBodyA,

    #[error("constraint body B has no physics body")]
    InvalidBodyB,
}

/// Generation-tagged handle to a body.
///
/// Destroying a body swap-removes its slot, so a plain index would
/// silently alias whatever body gets swapped in. The generation makes
/// every lookup through a stale handle fail cleanly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Fixed substep duration in seconds. Default: 1/60.
    pub fixed_timestep: f32,
    /// Maximum substeps per `step` call; time beyond the cap is
    /// silently dropped, so sustained overload slows the simulation
    /// rather than spiraling. Default: 10.
    pub max_substeps: u32,
    /// Velocity solver rounds per substep. Default: 4.
    pub velocity_iterations: u32,
    /// Position correction rounds per substep. Default: 8.
    pub position_iterations: u32,
    /// AABB pruning before the narrowphase; when false every pair is
    /// tested. Default: true.
    pub broad_phase_enabled: bool,
    /// Combined linear + angular speed below which a body accrues
    /// sleep time. Default: 0.1.
    pub sleep_threshold: f32,
    /// Fraction of remaining penetration corrected per position pass.
    /// Default: 0.2.
    pub baumgarte_factor: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            velocity_iterations: 4,
            position_iterations: 8,
            broad_phase_enabled: true,
            sleep_threshold: 0.1,
            baumgarte_factor: 0.2,
        }
    }
}

/// Observational counters for the most recent `step` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsStats {
    /// Live body count.
    pub bodies: usize,
    /// Joint constraint count.
    pub constraints: usize,
    /// Candidate pairs produced by the broadphase.
    pub potential_collisions: usize,
    /// Contact manifolds produced by the narrowphase.
    pub actual_collisions: usize,
    /// Wall time spent inside the last `step` call.
    pub solve_time: Duration,
}

/// Result of a world raycast: the nearest hit across all bodies.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub body: BodyHandle,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// The physics world. Owns every body, collider, and joint.
///
/// `bodies`, `colliders`, `generations`, and the AABB cache are
/// index-aligned; slot `i` denotes one logical body across all of them.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: Vec<RigidBody>,
    colliders: Vec<Option<Collider>>,
    generations: Vec<u32>,
    next_generation: u32,
    constraints: Vec<Constraint>,
    broad_phase: BroadPhase,
    aabbs: Vec<Option<Aabb>>,
    manifolds: Vec<ContactManifold>,
    stats: PhysicsStats,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            colliders: Vec::new(),
            generations: Vec::new(),
            next_generation: 0,
            constraints: Vec::new(),
            broad_phase: BroadPhase::new(),
            aabbs: Vec::new(),
            manifolds: Vec::new(),
            stats: PhysicsStats::default(),
        }
    }

    /// Add a body to the world and return its handle.
    pub fn create_body(&mut self, body: RigidBody) -> BodyHandle {
        let index = self.bodies.len() as u32;
        let generation = self.next_generation;
        self.next_generation += 1;

        self.bodies.push(body);
        self.colliders.push(None);
        self.generations.push(generation);

        BodyHandle { index, generation }
    }

    /// Remove a body. The last body is swapped into the freed slot, so
    /// its previously issued handle also stops resolving; only handles
    /// returned after this call are valid for the swapped body's slot.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        let slot = self.resolve(handle).ok_or(PhysicsError::InvalidHandle)?;
        self.bodies.swap_remove(slot);
        self.colliders.swap_remove(slot);
        self.generations.swap_remove(slot);
        Ok(())
    }

    /// Attach a collision shape to a body, replacing any existing one.
    pub fn attach_collider(
        &mut self,
        handle: BodyHandle,
        collider: Collider,
    ) -> Result<(), PhysicsError> {
        let slot = self.resolve(handle).ok_or(PhysicsError::InvalidHandle)?;
        self.colliders[slot] = Some(collider);
        Ok(())
    }

    /// Add a joint constraint. Handles are not validated here; joints
    /// whose handles go stale are skipped by the solver.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Look up a body. Returns `None` for stale handles.
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.resolve(handle).map(|slot| &self.bodies[slot])
    }

    /// Mutable body lookup. Returns `None` for stale handles.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.resolve(handle).map(|slot| &mut self.bodies[slot])
    }

    /// Look up the collider attached to a body, if any.
    pub fn collider(&self, handle: BodyHandle) -> Option<&Collider> {
        let slot = self.resolve(handle)?;
        self.colliders[slot].as_ref()
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of joint constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Iterate over all bodies with their current handles.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter().enumerate().map(|(slot, body)| {
            (
                BodyHandle {
                    index: slot as u32,
                    generation: self.generations[slot],
                },
                body,
            )
        })
    }

    /// The configured gravity vector.
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Counters from the most recent `step` call.
    pub fn stats(&self) -> PhysicsStats {
        self.stats
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Runs `ceil(dt / fixed_timestep)` substeps of exactly
    /// `fixed_timestep`, capped at `max_substeps`. `step(0.0)` runs no
    /// substeps and changes nothing.
    pub fn step(&mut self, dt: f32) {
        let started = Instant::now();

        let mut substeps = 0;
        if dt > 0.0 {
            let target = (dt / self.config.fixed_timestep).ceil() as u32;
            substeps = target.min(self.config.max_substeps);
            for _ in 0..substeps {
                self.fixed_step(self.config.fixed_timestep);
            }
        }

        self.stats.bodies = self.bodies.len();
        self.stats.constraints = self.constraints.len();
        self.stats.solve_time = started.elapsed();
        trace!(
            "stepped physics: {} substeps, {} bodies, {} contacts",
            substeps,
            self.stats.bodies,
            self.stats.actual_collisions
        );
    }

    /// Find the nearest ray hit across all collidered bodies.
    pub fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        let mut best: Option<RaycastHit> = None;

        for (slot, collider) in self.colliders.iter().enumerate() {
            let Some(collider) = collider else {
                continue;
            };
            let shape = collider.translated(self.bodies[slot].position);
            if let Some(hit) = shape.raycast(ray) {
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(RaycastHit {
                        body: BodyHandle {
                            index: slot as u32,
                            generation: self.generations[slot],
                        },
                        distance: hit.distance,
                        point: hit.point,
                        normal: hit.normal,
                    });
                }
            }
        }

        best
    }

    /// Map a handle to its slot, failing on range or generation
    /// mismatch.
    fn resolve(&self, handle: BodyHandle) -> Option<usize> {
        let slot = handle.index as usize;
        if slot < self.bodies.len() && self.generations[slot] == handle.generation {
            Some(slot)
        } else {
            None
        }
    }

    /// Joints with both handles resolved to live slots.
    fn resolve_joints(&self) -> Vec<(usize, usize, Constraint)> {
        self.constraints
            .iter()
            .filter_map(|constraint| {
                let slot_a = self.resolve(constraint.body_a)?;
                let slot_b = self.resolve(constraint.body_b)?;
                Some((slot_a, slot_b, *constraint))
            })
            .collect()
    }

    fn fixed_step(&mut self, dt: f32) {
        // 1. World-space AABBs from each collider at its body's pose.
        //    Boxes stay axis-aligned; orientation is not applied.
        self.aabbs.clear();
        for (slot, collider) in self.colliders.iter().enumerate() {
            self.aabbs.push(
                collider
                    .as_ref()
                    .map(|c| c.aabb().translated(self.bodies[slot].position)),
            );
        }

        // 2. Broadphase candidate pairs
        let pairs = if self.config.broad_phase_enabled {
            self.broad_phase.find_pairs(&self.bodies, &self.aabbs)
        } else {
            self.broad_phase.all_pairs(self.bodies.len())
        };
        self.stats.potential_collisions = pairs.len();

        // 3. Narrowphase on pairs with both colliders present
        self.manifolds.clear();
        for &(slot_a, slot_b) in &pairs {
            let (Some(collider_a), Some(collider_b)) =
                (&self.colliders[slot_a], &self.colliders[slot_b])
            else {
                continue;
            };
            let shape_a = collider_a.translated(self.bodies[slot_a].position);
            let shape_b = collider_b.translated(self.bodies[slot_b].position);
            if let Some(contact) = narrowphase::collide(&shape_a, &shape_b) {
                self.manifolds
                    .push(ContactManifold::new(slot_a, slot_b, contact));
            }
        }
        self.stats.actual_collisions = self.manifolds.len();

        // 4. Integrate velocities and orientations
        for body in &mut self.bodies {
            body.integrate_velocity(self.config.gravity, dt, self.config.sleep_threshold);
        }

        // 5. Velocity solve: contacts then joints, each round
        let joints = self.resolve_joints();
        solver::solve_velocity_constraints(
            &mut self.bodies,
            &self.manifolds,
            &joints,
            self.config.velocity_iterations,
        );

        // 6. Integrate positions
        for body in &mut self.bodies {
            body.integrate_position(dt);
        }

        // 7. Positional penetration correction
        solver::solve_position_constraints(
            &mut self.bodies,
            &self.manifolds,
            self.config.baumgarte_factor,
            self.config.position_iterations,
        );

        // 8. Rest sleeping bodies. They still take part in collision
        //    and solving above; only their velocities are zeroed here.
        for body in &mut self.bodies {
            if body.is_sleeping() {
                body.linear_velocity = Vec3::ZERO;
                body.angular_velocity = Vec3::ZERO;
            }
        }
    }
}

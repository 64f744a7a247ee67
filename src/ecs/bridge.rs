//! Bridge between the physics world and a hecs ECS world.
//!
//! Entities gain physics by registering a [`RigidBody`] (and optional
//! collider) through [`PhysicsBridge::add_rigid_body`]. Each frame,
//! [`PhysicsBridge::update`] pushes kinematic entity transforms into the
//! simulation, steps it, and writes every body's resulting pose back to
//! the entity's [`Transform`] and [`GlobalTransform`] components.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use crate::ecs::components::transform::{GlobalTransform, Transform};
use crate::physics::collider::{Collider, Ray};
use crate::physics::constraint::{Constraint, ConstraintKind};
use crate::physics::rigid_body::{BodyType, RigidBody};
use crate::physics::{
    BodyHandle, PhysicsConfig, PhysicsError, PhysicsStats, PhysicsWorld, RaycastHit,
};

/// Entity-keyed facade over a [`PhysicsWorld`].
///
/// Keeps the entity/handle maps consistent across body removal, where
/// the world's swap-remove reissues the moved body's handle.
pub struct PhysicsBridge {
    world: PhysicsWorld,
    entity_to_body: HashMap<hecs::Entity, BodyHandle>,
    body_to_entity: HashMap<BodyHandle, hecs::Entity>,
}

impl Default for PhysicsBridge {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsBridge {
    /// Create a bridge around a fresh physics world.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            world: PhysicsWorld::new(config),
            entity_to_body: HashMap::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Give an entity a physics body and optional collision shape.
    ///
    /// Inserts [`Transform`] and [`GlobalTransform`] components seeded
    /// from the body pose if the entity does not already carry them. An
    /// entity that already has a body gets its previous one removed
    /// first.
    pub fn add_rigid_body(
        &mut self,
        ecs: &mut hecs::World,
        entity: hecs::Entity,
        body: RigidBody,
        collider: Option<Collider>,
    ) -> Result<BodyHandle, PhysicsError> {
        if self.entity_to_body.contains_key(&entity) {
            self.remove_rigid_body(entity);
        }

        let pose = Transform::from_position_rotation(body.position, body.orientation);
        let handle = self.world.create_body(body);
        if let Some(collider) = collider {
            self.world.attach_collider(handle, collider)?;
        }

        if !ecs.satisfies::<&Transform>(entity).unwrap_or(false) {
            ecs.insert(entity, (pose, GlobalTransform(pose.to_matrix())))
                .ok();
        }

        self.entity_to_body.insert(entity, handle);
        self.body_to_entity.insert(handle, entity);
        debug!("created physics body for entity {:?}", entity);
        Ok(handle)
    }

    /// Destroy an entity's body and drop both map entries. No-op for
    /// entities without a body.
    pub fn remove_rigid_body(&mut self, entity: hecs::Entity) {
        let Some(handle) = self.entity_to_body.remove(&entity) else {
            return;
        };
        self.body_to_entity.remove(&handle);

        // destroy_body swap-removes: the last body moves into the freed
        // slot under a new handle. Capture its old handle first so the
        // maps can follow the move.
        let moved = self.world.bodies().last().map(|(h, _)| h);
        if self.world.destroy_body(handle).is_err() {
            return;
        }
        debug!("destroyed physics body for entity {:?}", entity);

        if let Some(old) = moved {
            if old != handle {
                let new = BodyHandle {
                    index: handle.index,
                    generation: old.generation,
                };
                if let Some(moved_entity) = self.body_to_entity.remove(&old) {
                    self.body_to_entity.insert(new, moved_entity);
                    self.entity_to_body.insert(moved_entity, new);
                }
            }
        }
    }

    /// Advance the simulation and synchronize entity transforms.
    ///
    /// Kinematic bodies follow their entity's [`Transform`] into the
    /// step; afterwards every body's pose flows back out. Dynamic
    /// bodies are authoritative over their own pose, so the push phase
    /// never touches them.
    pub fn update(&mut self, ecs: &mut hecs::World, dt: f32) {
        for (&entity, &handle) in &self.entity_to_body {
            let Some(body) = self.world.body_mut(handle) else {
                continue;
            };
            if body.body_type != BodyType::Kinematic {
                continue;
            }
            if let Ok(transform) = ecs.get::<&Transform>(entity) {
                body.set_position(transform.position);
                body.set_orientation(transform.rotation);
            }
        }

        self.world.step(dt);

        for (&entity, &handle) in &self.entity_to_body {
            let Some(body) = self.world.body(handle) else {
                continue;
            };
            if let Ok(mut transform) = ecs.get::<&mut Transform>(entity) {
                transform.position = body.position;
                transform.rotation = body.orientation;
                if let Ok(mut global) = ecs.get::<&mut GlobalTransform>(entity) {
                    global.0 = transform.to_matrix();
                }
            }
        }
    }

    /// Body handle registered for an entity.
    pub fn handle(&self, entity: hecs::Entity) -> Option<BodyHandle> {
        self.entity_to_body.get(&entity).copied()
    }

    /// Entity that owns a body handle.
    pub fn entity(&self, handle: BodyHandle) -> Option<hecs::Entity> {
        self.body_to_entity.get(&handle).copied()
    }

    /// An entity's body, if it has one.
    pub fn body(&self, entity: hecs::Entity) -> Option<&RigidBody> {
        self.world.body(self.handle(entity)?)
    }

    /// Mutable access to an entity's body.
    pub fn body_mut(&mut self, entity: hecs::Entity) -> Option<&mut RigidBody> {
        let handle = self.handle(entity)?;
        self.world.body_mut(handle)
    }

    /// Apply a force at an entity's center of mass. No-op for entities
    /// without a body.
    pub fn apply_force(&mut self, entity: hecs::Entity, force: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.apply_force(force);
        }
    }

    /// Apply a force at a world-space point, inducing torque.
    pub fn apply_force_at_point(&mut self, entity: hecs::Entity, force: Vec3, point: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.apply_force_at_point(force, point);
        }
    }

    /// Apply a torque to an entity's body.
    pub fn apply_torque(&mut self, entity: hecs::Entity, torque: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.apply_torque(torque);
        }
    }

    /// Teleport an entity's body.
    pub fn set_position(&mut self, entity: hecs::Entity, position: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.set_position(position);
        }
    }

    /// Set the linear velocity of an entity's body.
    pub fn set_velocity(&mut self, entity: hecs::Entity, velocity: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.set_linear_velocity(velocity);
        }
    }

    /// Register a joint between two entities' bodies. Anchors default
    /// to the body centers.
    pub fn add_constraint(
        &mut self,
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        kind: ConstraintKind,
    ) -> Result<(), PhysicsError> {
        let body_a = self.handle(entity_a).ok_or(PhysicsError::InvalidBodyA)?;
        let body_b = self.handle(entity_b).ok_or(PhysicsError::InvalidBodyB)?;
        self.world.add_constraint(Constraint {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            kind,
        });
        Ok(())
    }

    /// Nearest ray hit, tagged with the entity that owns the hit body.
    /// Hits on bodies created outside the bridge yield `None`.
    pub fn raycast(&self, ray: &Ray) -> Option<(hecs::Entity, RaycastHit)> {
        let hit = self.world.raycast(ray)?;
        let entity = self.entity(hit.body)?;
        Some((entity, hit))
    }

    /// The underlying physics world.
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable access to the underlying physics world.
    ///
    /// Destroying bodies here bypasses the entity maps; prefer
    /// [`PhysicsBridge::remove_rigid_body`].
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Counters from the most recent update.
    pub fn stats(&self) -> PhysicsStats {
        self.world.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn zero_gravity() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec3::ZERO,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn test_dynamic_pose_flows_to_transform() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let start = Vec3::new(0.0, 10.0, 0.0);
        let entity = ecs.spawn((Transform::from_position(start), GlobalTransform::default()));
        bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_dynamic(1.0, start), None)
            .unwrap();

        bridge.update(&mut ecs, DT);

        let transform = ecs.get::<&Transform>(entity).unwrap();
        assert!(transform.position.y < 10.0, "entity should have fallen");

        let global = ecs.get::<&GlobalTransform>(entity).unwrap();
        let eps = 1e-5;
        assert!((global.0.transform_point3(Vec3::ZERO) - transform.position).length() < eps);
    }

    #[test]
    fn test_kinematic_transform_drives_body() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn((Transform::identity(), GlobalTransform::default()));
        bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_kinematic(Vec3::ZERO), None)
            .unwrap();

        {
            let mut transform = ecs.get::<&mut Transform>(entity).unwrap();
            transform.position = Vec3::new(5.0, 0.0, 0.0);
        }
        bridge.update(&mut ecs, DT);

        let body = bridge.body(entity).unwrap();
        assert_eq!(body.position, Vec3::new(5.0, 0.0, 0.0));
        let transform = ecs.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_dynamic_transform_is_not_authoritative() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::new(zero_gravity());

        let entity = ecs.spawn((Transform::identity(), GlobalTransform::default()));
        bridge
            .add_rigid_body(
                &mut ecs,
                entity,
                RigidBody::new_dynamic(1.0, Vec3::ZERO),
                None,
            )
            .unwrap();

        // Hand-editing a dynamic entity's transform does not survive an
        // update; the body pose wins.
        {
            let mut transform = ecs.get::<&mut Transform>(entity).unwrap();
            transform.position = Vec3::new(7.0, 7.0, 7.0);
        }
        bridge.update(&mut ecs, DT);

        let transform = ecs.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_add_inserts_missing_transform_components() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn(());
        let start = Vec3::new(1.0, 2.0, 3.0);
        bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_static(start), None)
            .unwrap();

        let transform = ecs.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, start);
        assert!(ecs.satisfies::<&GlobalTransform>(entity).unwrap());
    }

    #[test]
    fn test_remove_clears_maps() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn(());
        let handle = bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_dynamic(1.0, Vec3::ZERO), None)
            .unwrap();

        bridge.remove_rigid_body(entity);
        assert!(bridge.body(entity).is_none());
        assert!(bridge.entity(handle).is_none());
        assert_eq!(bridge.world().body_count(), 0);

        // Removing again is harmless.
        bridge.remove_rigid_body(entity);
    }

    #[test]
    fn test_remove_keeps_other_entities_tracked() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let spawn = |ecs: &mut hecs::World, bridge: &mut PhysicsBridge, x: f32| {
            let entity = ecs.spawn(());
            bridge
                .add_rigid_body(
                    ecs,
                    entity,
                    RigidBody::new_static(Vec3::new(x, 0.0, 0.0)),
                    None,
                )
                .unwrap();
            entity
        };
        let a = spawn(&mut ecs, &mut bridge, 0.0);
        let b = spawn(&mut ecs, &mut bridge, 1.0);
        let c = spawn(&mut ecs, &mut bridge, 2.0);

        // Removing the first body swaps the last into its slot; the
        // bridge must keep following that body.
        bridge.remove_rigid_body(a);

        assert_eq!(bridge.world().body_count(), 2);
        assert_eq!(bridge.body(b).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bridge.body(c).unwrap().position, Vec3::new(2.0, 0.0, 0.0));

        let handle = bridge.handle(c).unwrap();
        assert_eq!(bridge.entity(handle), Some(c));
    }

    #[test]
    fn test_unmapped_entity_ops_are_noops() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn(());
        bridge.apply_force(entity, Vec3::X);
        bridge.apply_force_at_point(entity, Vec3::X, Vec3::Y);
        bridge.apply_torque(entity, Vec3::Y);
        bridge.set_position(entity, Vec3::ONE);
        bridge.set_velocity(entity, Vec3::ONE);
        bridge.remove_rigid_body(entity);

        assert!(bridge.body(entity).is_none());
        assert_eq!(bridge.world().body_count(), 0);
    }

    #[test]
    fn test_add_constraint_reports_missing_side() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::new(zero_gravity());

        let a = ecs.spawn(());
        let b = ecs.spawn(());
        let kind = ConstraintKind::Fixed;

        assert_eq!(
            bridge.add_constraint(a, b, kind),
            Err(PhysicsError::InvalidBodyA)
        );

        bridge
            .add_rigid_body(&mut ecs, a, RigidBody::new_dynamic(1.0, Vec3::ZERO), None)
            .unwrap();
        assert_eq!(
            bridge.add_constraint(a, b, kind),
            Err(PhysicsError::InvalidBodyB)
        );

        bridge
            .add_rigid_body(&mut ecs, b, RigidBody::new_dynamic(1.0, Vec3::X), None)
            .unwrap();
        assert_eq!(bridge.add_constraint(a, b, kind), Ok(()));
        assert_eq!(bridge.world().constraint_count(), 1);
    }

    #[test]
    fn test_raycast_tags_entity() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn(());
        bridge
            .add_rigid_body(
                &mut ecs,
                entity,
                RigidBody::new_static(Vec3::new(0.0, 0.0, 5.0)),
                Some(Collider::Sphere {
                    center: Vec3::ZERO,
                    radius: 1.0,
                }),
            )
            .unwrap();

        let (hit_entity, hit) = bridge.raycast(&Ray::new(Vec3::ZERO, Vec3::Z)).unwrap();
        assert_eq!(hit_entity, entity);
        assert!((hit.distance - 4.0).abs() < 1e-4);

        assert!(bridge.raycast(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
    }

    #[test]
    fn test_adding_twice_replaces_the_body() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::default();

        let entity = ecs.spawn(());
        bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_dynamic(1.0, Vec3::ZERO), None)
            .unwrap();
        bridge
            .add_rigid_body(&mut ecs, entity, RigidBody::new_dynamic(3.0, Vec3::Y), None)
            .unwrap();

        assert_eq!(bridge.world().body_count(), 1);
        let body = bridge.body(entity).unwrap();
        assert_eq!(body.mass, 3.0);
        assert_eq!(body.position, Vec3::Y);
    }

    #[test]
    fn test_constraint_pulls_entities_together() {
        let mut ecs = hecs::World::new();
        let mut bridge = PhysicsBridge::new(zero_gravity());

        let a = ecs.spawn(());
        let b = ecs.spawn(());
        bridge
            .add_rigid_body(&mut ecs, a, RigidBody::new_dynamic(1.0, Vec3::ZERO), None)
            .unwrap();
        bridge
            .add_rigid_body(
                &mut ecs,
                b,
                RigidBody::new_dynamic(1.0, Vec3::new(3.0, 0.0, 0.0)),
                None,
            )
            .unwrap();
        bridge
            .add_constraint(
                a,
                b,
                ConstraintKind::Distance {
                    rest_length: 2.0,
                    stiffness: 1.0,
                    damping: 0.0,
                },
            )
            .unwrap();

        for _ in 0..30 {
            bridge.update(&mut ecs, DT);
        }

        let pos_a = bridge.body(a).unwrap().position;
        let pos_b = bridge.body(b).unwrap().position;
        assert!(
            ((pos_b - pos_a).length() - 2.0).abs() < 1e-3,
            "separation = {}",
            (pos_b - pos_a).length()
        );
    }
}

//! Rigid bodies: mass properties, force accumulation, and integration.

use glam::{Quat, Vec3};

use crate::math::{integrate_orientation, InertiaTensor};

/// Time in seconds a body must stay below the sleep threshold before it
/// counts as sleeping.
const SLEEP_TIME: f32 = 1.0;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Position controlled by user, but affects dynamic bodies.
    Kinematic,
}

/// Surface material used when resolving contacts. Combined values take
/// the minimum of both bodies' coefficients.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Friction coefficient (0.0 - 1.0).
    pub friction: f32,
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Mass density, for callers deriving mass from shape volume.
    pub density: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.3,
            density: 1.0,
        }
    }
}

/// A simulated rigid body.
///
/// Static and kinematic bodies carry `inv_mass == 0` so impulses and
/// constraint corrections can never move them; kinematic bodies are
/// driven externally through the setters.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub body_type: BodyType,
    /// Mass in kilograms. Zero for static and kinematic bodies.
    pub mass: f32,
    /// Inverse mass; 0 for static and kinematic bodies.
    pub inv_mass: f32,
    /// Body-local inertia tensor (diagonal).
    pub inertia: InertiaTensor,
    /// Inverse of the inertia tensor.
    pub inv_inertia: InertiaTensor,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Accumulated force this substep. Cleared after integration.
    pub force_accumulator: Vec3,
    /// Accumulated torque this substep. Cleared after integration.
    pub torque_accumulator: Vec3,
    pub material: Material,
    /// Fraction of linear velocity retained each substep (default 0.99).
    pub linear_damping: f32,
    /// Fraction of angular velocity retained each substep (default 0.99).
    pub angular_damping: f32,
    /// Gravity multiplier (default 1.0 for dynamic bodies).
    pub gravity_scale: f32,
    /// Seconds spent below the sleep threshold.
    pub sleep_timer: f32,
}

impl RigidBody {
    /// Create a dynamic rigid body with the given mass (must be
    /// positive) at the given position.
    pub fn new_dynamic(mass: f32, position: Vec3) -> Self {
        // Default inertia: identity * mass (unit sphere approximation).
        let inertia = InertiaTensor::diagonal(Vec3::splat(mass));
        Self {
            body_type: BodyType::Dynamic,
            mass,
            inv_mass: 1.0 / mass,
            inv_inertia: inertia.inverse(),
            inertia,
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            material: Material::default(),
            linear_damping: 0.99,
            angular_damping: 0.99,
            gravity_scale: 1.0,
            sleep_timer: 0.0,
        }
    }

    /// Create a static rigid body at the given position.
    pub fn new_static(position: Vec3) -> Self {
        Self {
            body_type: BodyType::Static,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: InertiaTensor::ZERO,
            inv_inertia: InertiaTensor::ZERO,
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            material: Material::default(),
            linear_damping: 1.0,
            angular_damping: 1.0,
            gravity_scale: 0.0,
            sleep_timer: 0.0,
        }
    }

    /// Create a kinematic rigid body at the given position.
    pub fn new_kinematic(position: Vec3) -> Self {
        Self {
            body_type: BodyType::Kinematic,
            ..Self::new_static(position)
        }
    }

    /// Builder: set the surface material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builder: set the velocity retained each substep (0.0..=1.0,
    /// where 1.0 means no damping).
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear.clamp(0.0, 1.0);
        self.angular_damping = angular.clamp(0.0, 1.0);
        self
    }

    /// Builder: set the initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Builder: set the gravity multiplier.
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Builder: set the inertia tensor (and its inverse). Only
    /// meaningful for dynamic bodies.
    pub fn with_inertia(mut self, inertia: InertiaTensor) -> Self {
        if self.body_type == BodyType::Dynamic {
            self.inv_inertia = inertia.inverse();
            self.inertia = inertia;
        }
        self
    }

    /// Accumulate a force at the center of mass. Wakes the body.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.force_accumulator += force;
        self.wake();
    }

    /// Accumulate a force applied at a world-space point, producing
    /// torque about the center of mass. Wakes the body.
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.force_accumulator += force;
        self.torque_accumulator += (point - self.position).cross(force);
        self.wake();
    }

    /// Accumulate a torque. Wakes the body.
    pub fn apply_torque(&mut self, torque: Vec3) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.torque_accumulator += torque;
        self.wake();
    }

    /// Apply an instantaneous change in linear velocity. Wakes the body.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
        self.wake();
    }

    /// Apply an instantaneous change in angular velocity. Wakes the body.
    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.angular_velocity += self.inv_inertia.mul_vec3(impulse);
        self.wake();
    }

    /// Teleport the body. Wakes it.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.wake();
    }

    /// Set the orientation directly. Wakes the body.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.wake();
    }

    /// Set the linear velocity directly. Wakes the body. Ignored for
    /// static bodies, which never carry velocity.
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.linear_velocity = velocity;
        self.wake();
    }

    /// Set the angular velocity directly. Wakes the body. Ignored for
    /// static bodies.
    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.angular_velocity = velocity;
        self.wake();
    }

    /// Reset the sleep timer.
    #[inline]
    pub fn wake(&mut self) {
        self.sleep_timer = 0.0;
    }

    /// Whether the body has stayed below the sleep threshold long
    /// enough to be put to rest.
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleep_timer > SLEEP_TIME
    }

    /// Current linear speed in meters per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }

    /// Advance velocities by `dt` using semi-implicit Euler, then the
    /// orientation by first-order quaternion integration.
    ///
    /// Gravity is pushed into the force accumulator first; accumulators
    /// are cleared afterwards. Damping is a per-substep multiplicative
    /// decay, so its effect depends on the fixed timestep. Sleep
    /// bookkeeping runs last against the configured threshold.
    pub fn integrate_velocity(&mut self, gravity: Vec3, dt: f32, sleep_threshold: f32) {
        if self.body_type != BodyType::Dynamic {
            return;
        }

        self.force_accumulator += gravity * self.mass * self.gravity_scale;

        // Linear: v += (F/m) * dt
        self.linear_velocity += self.force_accumulator * self.inv_mass * dt;
        self.linear_velocity *= self.linear_damping;

        // Angular: omega += (I^-1 * tau) * dt
        self.angular_velocity += self.inv_inertia.mul_vec3(self.torque_accumulator) * dt;
        self.angular_velocity *= self.angular_damping;

        self.orientation = integrate_orientation(self.orientation, self.angular_velocity, dt);

        self.force_accumulator = Vec3::ZERO;
        self.torque_accumulator = Vec3::ZERO;

        if self.linear_velocity.length() + self.angular_velocity.length() < sleep_threshold {
            self.sleep_timer += dt;
        } else {
            self.sleep_timer = 0.0;
        }
    }

    /// Advance the position by `dt`. Orientation is already handled by
    /// `integrate_velocity`, so this stays position-only to avoid
    /// double-integrating rotation.
    pub fn integrate_position(&mut self, dt: f32) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.position += self.linear_velocity * dt;
    }
}

//! Math helpers for the rigid body solver.
//!
//! Vectors and quaternions come from glam; this module adds the one type
//! glam does not provide in the shape the solver wants: a 3x3 inertia
//! tensor stored as nine scalars, of which only the diagonal is ever
//! populated by the shipped constructors.

use glam::{Quat, Vec3};

/// A 3x3 inertia tensor stored column-major as nine scalars.
///
/// All provided constructors produce diagonal tensors (simple shapes with
/// axis-aligned mass distributions), and [`InertiaTensor::inverse`] only
/// correctly inverts diagonal tensors. Feeding a hand-built non-diagonal
/// tensor through `inverse` silently drops the off-diagonal terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaTensor(pub [f32; 9]);

impl InertiaTensor {
    /// The zero tensor (used for static and kinematic bodies).
    pub const ZERO: Self = Self([0.0; 9]);

    /// Build a diagonal tensor from the three principal moments.
    #[inline]
    pub fn diagonal(moments: Vec3) -> Self {
        let mut m = [0.0; 9];
        m[0] = moments.x;
        m[4] = moments.y;
        m[8] = moments.z;
        Self(m)
    }

    /// Inertia of a solid sphere: `I = 2/5 * m * r^2` on every axis.
    #[inline]
    pub fn solid_sphere(mass: f32, radius: f32) -> Self {
        Self::diagonal(Vec3::splat(0.4 * mass * radius * radius))
    }

    /// Inertia of a solid axis-aligned box with the given half extents:
    /// `I_x = m/3 * (h_y^2 + h_z^2)` and cyclic for the other axes.
    #[inline]
    pub fn solid_box(mass: f32, half_extents: Vec3) -> Self {
        let sq = half_extents * half_extents;
        Self::diagonal(Vec3::new(
            mass / 3.0 * (sq.y + sq.z),
            mass / 3.0 * (sq.x + sq.z),
            mass / 3.0 * (sq.x + sq.y),
        ))
    }

    /// The three diagonal entries.
    #[inline]
    pub fn diagonal_entries(&self) -> Vec3 {
        Vec3::new(self.0[0], self.0[4], self.0[8])
    }

    /// Invert the tensor.
    ///
    /// Only the diagonal is reciprocated; zero (or negative) moments invert
    /// to zero so immovable axes stay immovable. Off-diagonal entries are
    /// discarded, which is only correct for diagonal tensors.
    #[inline]
    pub fn inverse(&self) -> Self {
        let d = self.diagonal_entries();
        Self::diagonal(Vec3::new(
            if d.x > 0.0 { 1.0 / d.x } else { 0.0 },
            if d.y > 0.0 { 1.0 / d.y } else { 0.0 },
            if d.z > 0.0 { 1.0 / d.z } else { 0.0 },
        ))
    }

    /// Multiply the tensor by a vector (full column-major 3x3 product).
    #[inline]
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0] * v.x + m[3] * v.y + m[6] * v.z,
            m[1] * v.x + m[4] * v.y + m[7] * v.z,
            m[2] * v.x + m[5] * v.y + m[8] * v.z,
        )
    }
}

impl Default for InertiaTensor {
    fn default() -> Self {
        Self::ZERO
    }
}

/// First-order quaternion integration: `q' = normalize(q + 0.5 * dt * w * q)`
/// with the angular velocity encoded as a pure quaternion.
///
/// Accurate for the small per-substep rotations the fixed timestep produces.
/// The renormalize counteracts the drift every multiplicative composition
/// introduces.
#[inline]
pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity.length_squared() <= 1e-10 {
        return orientation;
    }
    let w = angular_velocity;
    let omega = Quat::from_xyzw(w.x, w.y, w.z, 0.0);
    let dq = omega * orientation * 0.5;
    Quat::from_xyzw(
        orientation.x + dq.x * dt,
        orientation.y + dq.y * dt,
        orientation.z + dq.z * dt,
        orientation.w + dq.w * dt,
    )
    .normalize()
}

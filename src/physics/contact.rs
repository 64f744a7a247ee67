//! Contact data structures for collision response.

use glam::Vec3;

/// Geometric result of a narrowphase test between two world-space shapes.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact point on shape A's surface, in world space.
    pub point_a: Vec3,
    /// Contact point on shape B's surface, in world space.
    pub point_b: Vec3,
    /// Contact normal pointing from A toward B.
    pub normal: Vec3,
    /// Penetration depth (non-negative).
    pub penetration: f32,
}

/// A contact tagged with the body slots it belongs to.
///
/// Manifolds are rebuilt from scratch every substep and discarded once the
/// solver has consumed them; the slot indices are only meaningful within
/// that substep.
#[derive(Debug, Clone, Copy)]
pub struct ContactManifold {
    /// Slot index of body A in the world's body list.
    pub body_a: usize,
    /// Slot index of body B in the world's body list.
    pub body_b: usize,
    /// Contact point on body A's surface, in world space.
    pub point_a: Vec3,
    /// Contact point on body B's surface, in world space.
    pub point_b: Vec3,
    /// Contact normal pointing from A toward B.
    pub normal: Vec3,
    /// Penetration depth (non-negative).
    pub penetration: f32,
}

impl ContactManifold {
    /// Tag a narrowphase contact with its body slots.
    pub fn new(body_a: usize, body_b: usize, contact: Contact) -> Self {
        Self {
            body_a,
            body_b,
            point_a: contact.point_a,
            point_b: contact.point_b,
            normal: contact.normal,
            penetration: contact.penetration,
        }
    }
}

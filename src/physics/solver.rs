//! Impulse-based contact resolution and positional joint corrections.

use glam::Vec3;

use super::constraint::{Constraint, ConstraintKind};
use super::contact::ContactManifold;
use super::rigid_body::{BodyType, RigidBody};

/// Solve contact velocities and joints for `iterations` rounds. Each
/// round resolves every manifold, then every joint. Joint entries carry
/// slot indices already resolved (and generation-checked) by the world.
pub fn solve_velocity_constraints(
    bodies: &mut [RigidBody],
    manifolds: &[ContactManifold],
    joints: &[(usize, usize, Constraint)],
    iterations: u32,
) {
    for _ in 0..iterations {
        for manifold in manifolds {
            solve_manifold(bodies, manifold);
        }
        for (slot_a, slot_b, constraint) in joints {
            solve_joint(bodies, *slot_a, *slot_b, constraint);
        }
    }
}

/// Baumgarte penetration correction for `iterations` rounds over every
/// manifold. Purely positional; velocities are left untouched.
pub fn solve_position_constraints(
    bodies: &mut [RigidBody],
    manifolds: &[ContactManifold],
    baumgarte_factor: f32,
    iterations: u32,
) {
    for _ in 0..iterations {
        for manifold in manifolds {
            let inv_a = bodies[manifold.body_a].inv_mass;
            let inv_b = bodies[manifold.body_b].inv_mass;
            let inv_sum = inv_a + inv_b;
            if inv_sum <= 0.0 {
                continue;
            }

            let correction =
                manifold.normal * (manifold.penetration * baumgarte_factor / inv_sum);
            bodies[manifold.body_a].position -= correction * inv_a;
            bodies[manifold.body_b].position += correction * inv_b;
        }
    }
}

/// Resolve one contact: a normal impulse with restitution, then a
/// single-pass Coulomb friction approximation capped by the normal
/// impulse.
fn solve_manifold(bodies: &mut [RigidBody], manifold: &ContactManifold) {
    let a = &bodies[manifold.body_a];
    let b = &bodies[manifold.body_b];

    let inv_a = a.inv_mass;
    let inv_b = b.inv_mass;
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        // Both immovable.
        return;
    }

    let normal = manifold.normal;
    let relative = b.linear_velocity - a.linear_velocity;
    let along_normal = relative.dot(normal);
    if along_normal >= 0.0 {
        // Already separating.
        return;
    }

    let restitution = a.material.restitution.min(b.material.restitution);
    let friction = a.material.friction.min(b.material.friction);

    let j_normal = -(1.0 + restitution) * along_normal / inv_sum;
    let impulse = normal * j_normal;

    let mut delta_a = -impulse * inv_a;
    let mut delta_b = impulse * inv_b;

    // Friction from the tangential component of the relative velocity.
    // The tangential impulse is capped at the smaller of the normal
    // impulse and the impulse that would stop all tangential sliding.
    let tangent_vel = relative - normal * along_normal;
    let tangent_len = tangent_vel.length();
    if tangent_len > 1e-6 {
        let tangent = tangent_vel / tangent_len;
        let j_friction = friction * tangent_len / inv_sum;
        let j_tangent = j_friction.min(j_normal);
        let friction_impulse = tangent * j_tangent;
        delta_a += friction_impulse * inv_a;
        delta_b -= friction_impulse * inv_b;
    }

    if inv_a > 0.0 {
        bodies[manifold.body_a].linear_velocity += delta_a;
    }
    if inv_b > 0.0 {
        bodies[manifold.body_b].linear_velocity += delta_b;
    }
}

/// Apply one positional pass of a joint. Anchors are body-position
/// offsets, deliberately not rotated by orientation.
fn solve_joint(bodies: &mut [RigidBody], slot_a: usize, slot_b: usize, constraint: &Constraint) {
    match constraint.kind {
        ConstraintKind::Distance {
            rest_length,
            stiffness,
            ..
        } => {
            let world_a = bodies[slot_a].position + constraint.anchor_a;
            let world_b = bodies[slot_b].position + constraint.anchor_b;
            let diff = world_b - world_a;
            let dist = diff.length();

            let error = dist - rest_length;
            if error.abs() < 1e-6 {
                return;
            }
            let direction = if dist > 1e-6 { diff / dist } else { Vec3::Y };

            let inv_a = bodies[slot_a].inv_mass;
            let inv_b = bodies[slot_b].inv_mass;
            let inv_sum = inv_a + inv_b;
            if inv_sum <= 0.0 {
                return;
            }

            // Correction split between the bodies by inverse-mass ratio.
            let correction = direction * (error * stiffness / inv_sum);
            bodies[slot_a].position += correction * inv_a;
            bodies[slot_b].position -= correction * inv_b;
        }
        ConstraintKind::Fixed => {
            let world_a = bodies[slot_a].position + constraint.anchor_a;
            let world_b = bodies[slot_b].position + constraint.anchor_b;
            let diff = world_b - world_a;

            let a_dynamic = bodies[slot_a].body_type == BodyType::Dynamic;
            let b_dynamic = bodies[slot_b].body_type == BodyType::Dynamic;

            // Split 50/50 when both can move; otherwise the dynamic
            // side absorbs the whole correction.
            if a_dynamic && b_dynamic {
                bodies[slot_a].position += diff * 0.5;
                bodies[slot_b].position -= diff * 0.5;
            } else if a_dynamic {
                bodies[slot_a].position += diff;
            } else if b_dynamic {
                bodies[slot_b].position -= diff;
            }
        }
        // No angular constraint math; the hinge is a stub.
        ConstraintKind::Hinge { .. } => {}
    }
}

//! Narrowphase collision tests for world-space shapes.
//!
//! Boxes are axis-aligned, so box tests reduce to interval overlap per
//! axis. Capsules are substituted by an equivalent sphere against
//! sphere-like shapes and by an equivalent box against boxes. Meshes
//! never produce contacts.

use glam::Vec3;

use super::collider::Collider;
use super::contact::Contact;

/// Detect collision between two world-space shapes, dispatching to the
/// specialized test for the pair. The returned normal points from `a`
/// toward `b`.
pub fn collide(a: &Collider, b: &Collider) -> Option<Contact> {
    match (a, b) {
        (
            Collider::Sphere {
                center: ca,
                radius: ra,
            },
            Collider::Sphere {
                center: cb,
                radius: rb,
            },
        ) => sphere_sphere(*ca, *ra, *cb, *rb),
        (
            Collider::Sphere { center, radius },
            Collider::Box {
                center: box_center,
                half_extents,
            },
        ) => sphere_box(*center, *radius, *box_center, *half_extents),
        (
            Collider::Box {
                center: box_center,
                half_extents,
            },
            Collider::Sphere { center, radius },
        ) => sphere_box(*center, *radius, *box_center, *half_extents).map(flipped),
        (
            Collider::Box {
                center: ca,
                half_extents: ha,
            },
            Collider::Box {
                center: cb,
                half_extents: hb,
            },
        ) => box_box(*ca, *ha, *cb, *hb),
        // Capsule substitution: equivalent sphere against sphere-like
        // shapes, equivalent box (r, h/2, r) against boxes.
        (
            Collider::Capsule {
                center: ca,
                radius: ra,
                ..
            },
            Collider::Sphere {
                center: cb,
                radius: rb,
            },
        ) => sphere_sphere(*ca, *ra, *cb, *rb),
        (
            Collider::Sphere {
                center: ca,
                radius: ra,
            },
            Collider::Capsule {
                center: cb,
                radius: rb,
                ..
            },
        ) => sphere_sphere(*ca, *ra, *cb, *rb),
        (
            Collider::Capsule {
                center: ca,
                radius: ra,
                ..
            },
            Collider::Capsule {
                center: cb,
                radius: rb,
                ..
            },
        ) => sphere_sphere(*ca, *ra, *cb, *rb),
        (
            Collider::Capsule {
                center: ca,
                radius,
                height,
            },
            Collider::Box {
                center: cb,
                half_extents: hb,
            },
        ) => box_box(
            *ca,
            Vec3::new(*radius, height * 0.5, *radius),
            *cb,
            *hb,
        ),
        (
            Collider::Box {
                center: ca,
                half_extents: ha,
            },
            Collider::Capsule {
                center: cb,
                radius,
                height,
            },
        ) => box_box(
            *ca,
            *ha,
            *cb,
            Vec3::new(*radius, height * 0.5, *radius),
        ),
        (Collider::Mesh { .. }, _) | (_, Collider::Mesh { .. }) => None,
    }
}

/// Swap the roles of A and B in a contact.
#[inline]
fn flipped(contact: Contact) -> Contact {
    Contact {
        point_a: contact.point_b,
        point_b: contact.point_a,
        normal: -contact.normal,
        penetration: contact.penetration,
    }
}

/// Sphere-sphere test. Overlap when the center distance is below the
/// radius sum.
fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<Contact> {
    let diff = center_b - center_a;
    let dist_sq = diff.length_squared();
    let min_dist = radius_a + radius_b;

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers get an arbitrary +Y normal.
    let normal = if dist > 1e-6 { diff / dist } else { Vec3::Y };

    Some(Contact {
        point_a: center_a + normal * radius_a,
        point_b: center_b - normal * radius_b,
        normal,
        penetration: min_dist - dist,
    })
}

/// Sphere-box test: clamp the sphere center to the box extents to find
/// the closest point, then compare against the radius. The sphere is
/// body A.
fn sphere_box(
    sphere_center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> Option<Contact> {
    let local = sphere_center - box_center;
    let clamped = local.clamp(-half_extents, half_extents);
    let closest = box_center + clamped;

    let to_closest = closest - sphere_center;
    let dist_sq = to_closest.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();

    if dist < 1e-6 {
        // Sphere center inside the box: push out through the nearest
        // face, X -> Y -> Z on ties.
        let mut min_pen = f32::MAX;
        let mut exit = Vec3::Y;
        for axis in 0..3 {
            let mut face = Vec3::ZERO;
            face[axis] = 1.0;
            let pen_pos = half_extents[axis] - local[axis];
            let pen_neg = half_extents[axis] + local[axis];
            if pen_pos < min_pen {
                min_pen = pen_pos;
                exit = face;
            }
            if pen_neg < min_pen {
                min_pen = pen_neg;
                exit = -face;
            }
        }
        return Some(Contact {
            point_a: sphere_center - exit * radius,
            point_b: sphere_center + exit * min_pen,
            normal: -exit,
            penetration: min_pen + radius,
        });
    }

    let normal = to_closest / dist;
    Some(Contact {
        point_a: sphere_center + normal * radius,
        point_b: closest,
        normal,
        penetration: radius - dist,
    })
}

/// Box-box test for axis-aligned boxes: per-axis interval overlap, with
/// the least-penetration axis as the separating normal (ties broken
/// X -> Y -> Z) and its sign taken from the center-to-center delta.
fn box_box(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> Option<Contact> {
    let diff = center_b - center_a;

    let mut penetration = f32::MAX;
    let mut axis = 0;
    for i in 0..3 {
        let overlap = half_a[i] + half_b[i] - diff[i].abs();
        if overlap <= 0.0 {
            return None;
        }
        if overlap < penetration {
            penetration = overlap;
            axis = i;
        }
    }

    let sign = if diff[axis] >= 0.0 { 1.0 } else { -1.0 };
    let mut normal = Vec3::ZERO;
    normal[axis] = sign;

    // Contact points sit on the two faces bounding the overlap interval.
    let mut point_a = center_a;
    point_a[axis] += sign * half_a[axis];
    let mut point_b = center_b;
    point_b[axis] -= sign * half_b[axis];

    Some(Contact {
        point_a,
        point_b,
        normal,
        penetration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_sphere_intersection() {
        let a = Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = Collider::Sphere {
            center: Vec3::new(1.5, 0.0, 0.0),
            radius: 1.0,
        };

        let contact = collide(&a, &b).unwrap();
        let eps = 1e-4;
        assert!((contact.normal - Vec3::X).length() < eps);
        assert!((contact.penetration - 0.5).abs() < eps);
        assert!((contact.point_a - Vec3::new(1.0, 0.0, 0.0)).length() < eps);
        assert!((contact.point_b - Vec3::new(0.5, 0.0, 0.0)).length() < eps);
    }

    #[test]
    fn test_sphere_sphere_no_intersection() {
        let a = Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = Collider::Sphere {
            center: Vec3::new(3.0, 0.0, 0.0),
            radius: 1.0,
        };
        assert!(collide(&a, &b).is_none());
    }

    #[test]
    fn test_coincident_spheres_default_normal() {
        let a = Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let contact = collide(&a, &a).unwrap();
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.penetration - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_above_box() {
        let sphere = Collider::Sphere {
            center: Vec3::new(0.0, 1.4, 0.0),
            radius: 1.0,
        };
        let cube = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };

        let contact = collide(&sphere, &cube).unwrap();
        let eps = 1e-4;
        // Sphere is A and sits above, so A -> B points down.
        assert!((contact.normal + Vec3::Y).length() < eps);
        assert!((contact.penetration - 0.6).abs() < eps);
        assert!((contact.point_b - Vec3::new(0.0, 1.0, 0.0)).length() < eps);
    }

    #[test]
    fn test_box_sphere_flips_normal() {
        let cube = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };
        let sphere = Collider::Sphere {
            center: Vec3::new(0.0, 1.4, 0.0),
            radius: 1.0,
        };

        let contact = collide(&cube, &sphere).unwrap();
        assert!(
            (contact.normal - Vec3::Y).length() < 1e-4,
            "box-first ordering should point the normal up at the sphere"
        );
    }

    #[test]
    fn test_sphere_center_inside_box() {
        let sphere = Collider::Sphere {
            center: Vec3::new(0.9, 0.0, 0.0),
            radius: 0.5,
        };
        let cube = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };

        let contact = collide(&sphere, &cube).unwrap();
        let eps = 1e-4;
        // Nearest face is +X, so the sphere escapes along +X and the
        // A -> B normal points back inside.
        assert!((contact.normal + Vec3::X).length() < eps);
        assert!((contact.penetration - 0.6).abs() < eps);
    }

    #[test]
    fn test_box_box_least_penetration_axis() {
        let a = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };
        let b = Collider::Box {
            center: Vec3::new(1.5, 0.5, 0.0),
            half_extents: Vec3::ONE,
        };

        let contact = collide(&a, &b).unwrap();
        let eps = 1e-4;
        assert!((contact.normal - Vec3::X).length() < eps);
        assert!((contact.penetration - 0.5).abs() < eps);
    }

    #[test]
    fn test_box_box_tie_prefers_x() {
        let a = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };
        let b = Collider::Box {
            center: Vec3::new(1.5, 1.5, 0.0),
            half_extents: Vec3::ONE,
        };

        let contact = collide(&a, &b).unwrap();
        assert!((contact.normal - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_box_box_separated() {
        let a = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };
        let b = Collider::Box {
            center: Vec3::new(3.0, 0.0, 0.0),
            half_extents: Vec3::ONE,
        };
        assert!(collide(&a, &b).is_none());
    }

    #[test]
    fn test_capsule_against_sphere_uses_equivalent_sphere() {
        let capsule = Collider::Capsule {
            center: Vec3::ZERO,
            radius: 0.5,
            height: 2.0,
        };
        let near = Collider::Sphere {
            center: Vec3::new(0.0, 0.8, 0.0),
            radius: 0.5,
        };
        let far = Collider::Sphere {
            center: Vec3::new(0.0, 1.2, 0.0),
            radius: 0.5,
        };

        let contact = collide(&capsule, &near).unwrap();
        assert!((contact.penetration - 0.2).abs() < 1e-4);

        // A true capsule would reach this one through its cap; the
        // substitution does not.
        assert!(collide(&capsule, &far).is_none());
    }

    #[test]
    fn test_capsule_against_box_uses_equivalent_box() {
        let capsule = Collider::Capsule {
            center: Vec3::new(0.0, 1.4, 0.0),
            radius: 0.5,
            height: 2.0,
        };
        let cube = Collider::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        };

        let contact = collide(&capsule, &cube).unwrap();
        let eps = 1e-4;
        // Equivalent box spans y in [0.4, 2.4], so the Y overlap against
        // the cube is 0.6. Capsule above the box: A -> B points down.
        assert!((contact.normal + Vec3::Y).length() < eps);
        assert!((contact.penetration - 0.6).abs() < eps);
    }

    #[test]
    fn test_mesh_produces_no_contacts() {
        let mesh = Collider::Mesh {
            triangles: vec![[Vec3::ZERO, Vec3::X, Vec3::Y]],
        };
        let sphere = Collider::Sphere {
            center: Vec3::new(0.2, 0.2, 0.0),
            radius: 1.0,
        };
        assert!(collide(&mesh, &sphere).is_none());
        assert!(collide(&sphere, &mesh).is_none());
    }
}

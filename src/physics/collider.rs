//! Collision shapes, bounding volumes, and raycasts.

use glam::Vec3;

use super::contact::Contact;
use super::narrowphase;

/// Axis-aligned bounding box. Invariant: `min <= max` componentwise.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Test whether two AABBs overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The same box shifted by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// A ray for intersection queries. `direction` is normalized on
/// construction so hit distances are in world units.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Result of a ray/shape intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Hit point in world space.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Collision shape. Centers are offsets from the owning body's origin;
/// the world translates shapes into world space before testing them.
///
/// Boxes are axis-aligned: body orientation does not rotate them.
/// Capsules are solved by substitution (an equivalent sphere against
/// sphere-like shapes and rays, an equivalent box against boxes), which
/// is an approximation rather than true capsule math. Meshes are a stub
/// variant that bounds its triangles but never reports contacts or ray
/// hits.
#[derive(Debug, Clone)]
pub enum Collider {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    Box {
        center: Vec3,
        half_extents: Vec3,
    },
    /// Capsule along the Y axis; `height` is the cylindrical section's
    /// full length, excluding the end caps.
    Capsule {
        center: Vec3,
        radius: f32,
        height: f32,
    },
    Mesh {
        triangles: Vec<[Vec3; 3]>,
    },
}

impl Collider {
    /// The same shape shifted by `offset`. Used by the world to place a
    /// body-local shape at the body's position.
    pub fn translated(&self, offset: Vec3) -> Collider {
        match self {
            Collider::Sphere { center, radius } => Collider::Sphere {
                center: *center + offset,
                radius: *radius,
            },
            Collider::Box {
                center,
                half_extents,
            } => Collider::Box {
                center: *center + offset,
                half_extents: *half_extents,
            },
            Collider::Capsule {
                center,
                radius,
                height,
            } => Collider::Capsule {
                center: *center + offset,
                radius: *radius,
                height: *height,
            },
            Collider::Mesh { triangles } => Collider::Mesh {
                triangles: triangles
                    .iter()
                    .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset])
                    .collect(),
            },
        }
    }

    /// Bounding box of the shape in its own coordinate space.
    pub fn aabb(&self) -> Aabb {
        match self {
            Collider::Sphere { center, radius } => Aabb {
                min: *center - Vec3::splat(*radius),
                max: *center + Vec3::splat(*radius),
            },
            Collider::Box {
                center,
                half_extents,
            } => Aabb {
                min: *center - *half_extents,
                max: *center + *half_extents,
            },
            Collider::Capsule {
                center,
                radius,
                height,
            } => {
                let extents = Vec3::new(*radius, height * 0.5 + *radius, *radius);
                Aabb {
                    min: *center - extents,
                    max: *center + extents,
                }
            }
            Collider::Mesh { triangles } => {
                if triangles.is_empty() {
                    return Aabb {
                        min: Vec3::ZERO,
                        max: Vec3::ZERO,
                    };
                }
                let mut min = Vec3::splat(f32::MAX);
                let mut max = Vec3::splat(f32::MIN);
                for tri in triangles {
                    for v in tri {
                        min = min.min(*v);
                        max = max.max(*v);
                    }
                }
                Aabb { min, max }
            }
        }
    }

    /// Narrowphase test against another world-space shape. Returns a
    /// contact with the normal pointing from `self` toward `other`.
    #[inline]
    pub fn collides_with(&self, other: &Collider) -> Option<Contact> {
        narrowphase::collide(self, other)
    }

    /// Intersect a ray with this shape. Returns the nearest hit along
    /// the ray, or `None` when the shape is behind the origin or missed.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        if ray.direction.length_squared() < 1e-12 {
            return None;
        }
        match self {
            Collider::Sphere { center, radius } => raycast_sphere(*center, *radius, ray),
            Collider::Box {
                center,
                half_extents,
            } => raycast_box(*center - *half_extents, *center + *half_extents, ray),
            // Substitution: the capsule's equivalent sphere.
            Collider::Capsule { center, radius, .. } => raycast_sphere(*center, *radius, ray),
            Collider::Mesh { .. } => None,
        }
    }
}

/// Ray/sphere test via the quadratic formula, keeping the smallest
/// non-negative root.
fn raycast_sphere(center: Vec3, radius: f32, ray: &Ray) -> Option<RayHit> {
    let to_origin = ray.origin - center;
    let a = ray.direction.length_squared();
    let b = 2.0 * to_origin.dot(ray.direction);
    let c = to_origin.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let mut t = (-b - sqrt_d) / (2.0 * a);
    if t < 0.0 {
        t = (-b + sqrt_d) / (2.0 * a);
    }
    if t < 0.0 {
        return None;
    }

    let point = ray.origin + ray.direction * t;
    Some(RayHit {
        distance: t,
        point,
        normal: (point - center).normalize_or_zero(),
    })
}

/// Ray/box test via the slab method across the three axes.
fn raycast_box(min: Vec3, max: Vec3, ray: &Ray) -> Option<RayHit> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < 1e-8 {
            // Parallel to the slab: a hit is only possible if the
            // origin already lies between the two planes.
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
        } else {
            let inv = 1.0 / dir;
            let mut t1 = (min[axis] - origin) * inv;
            let mut t2 = (max[axis] - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }

    let t = if t_min >= 0.0 { t_min } else { t_max };
    if t < 0.0 {
        return None;
    }

    let point = ray.origin + ray.direction * t;

    // Recover the face normal from whichever boundary plane the hit
    // point lies on.
    let eps = 1e-4;
    let normal = if (point.x - min.x).abs() < eps {
        -Vec3::X
    } else if (point.x - max.x).abs() < eps {
        Vec3::X
    } else if (point.y - min.y).abs() < eps {
        -Vec3::Y
    } else if (point.y - max.y).abs() < eps {
        Vec3::Y
    } else if (point.z - min.z).abs() < eps {
        -Vec3::Z
    } else if (point.z - max.z).abs() < eps {
        Vec3::Z
    } else {
        Vec3::Y
    };

    Some(RayHit {
        distance: t,
        point,
        normal,
    })
}

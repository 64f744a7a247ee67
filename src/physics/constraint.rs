//! Joint constraints between pairs of bodies.

use std::f32::consts::PI;

use glam::Vec3;

use super::BodyHandle;

/// Joint behavior.
#[derive(Debug, Clone, Copy)]
pub enum ConstraintKind {
    /// Keeps the two anchor points `rest_length` apart, like a rigid
    /// rod when stiffness is 1.0.
    Distance {
        /// Target distance between the anchor points.
        rest_length: f32,
        /// Fraction of the distance error corrected per solver pass
        /// (0.0..=1.0).
        stiffness: f32,
        /// Velocity-level damping coefficient. The positional solver
        /// does not apply it.
        damping: f32,
    },
    /// Restricts rotation to one axis between angle limits. Stub
    /// variant: the solver applies no angular correction.
    Hinge {
        axis: Vec3,
        min_angle: f32,
        max_angle: f32,
    },
    /// Pins the anchors together by pulling both bodies toward their
    /// midpoint.
    Fixed,
}

/// A joint between two bodies.
///
/// Anchors are offsets from each body's position and are not rotated by
/// body orientation. Joints live in the world's constraint list for the
/// world's lifetime; there is no removal API.
#[derive(Debug, Clone, Copy)]
pub struct Constraint {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Anchor offset from body A's position.
    pub anchor_a: Vec3,
    /// Anchor offset from body B's position.
    pub anchor_b: Vec3,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Distance joint with full stiffness and no damping.
    pub fn distance(body_a: BodyHandle, body_b: BodyHandle, rest_length: f32) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            kind: ConstraintKind::Distance {
                rest_length,
                stiffness: 1.0,
                damping: 0.0,
            },
        }
    }

    /// Hinge joint about `axis` with unrestricted angle limits.
    pub fn hinge(body_a: BodyHandle, body_b: BodyHandle, axis: Vec3) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            kind: ConstraintKind::Hinge {
                axis: axis.normalize_or_zero(),
                min_angle: -PI,
                max_angle: PI,
            },
        }
    }

    /// Fixed (weld) joint.
    pub fn fixed(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            kind: ConstraintKind::Fixed,
        }
    }

    /// Builder: set the anchor offsets on both bodies.
    pub fn with_anchors(mut self, anchor_a: Vec3, anchor_b: Vec3) -> Self {
        self.anchor_a = anchor_a;
        self.anchor_b = anchor_b;
        self
    }

    /// Builder: set the stiffness of a distance joint (0.0..=1.0).
    /// No-op for other kinds.
    pub fn with_stiffness(mut self, value: f32) -> Self {
        if let ConstraintKind::Distance { stiffness, .. } = &mut self.kind {
            *stiffness = value.clamp(0.0, 1.0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(index: u32) -> BodyHandle {
        BodyHandle {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_distance_defaults() {
        let joint = Constraint::distance(handle(0), handle(1), 2.0);
        match joint.kind {
            ConstraintKind::Distance {
                rest_length,
                stiffness,
                damping,
            } => {
                assert_eq!(rest_length, 2.0);
                assert_eq!(stiffness, 1.0);
                assert_eq!(damping, 0.0);
            }
            _ => panic!("expected a distance joint"),
        }
        assert_eq!(joint.anchor_a, Vec3::ZERO);
        assert_eq!(joint.anchor_b, Vec3::ZERO);
    }

    #[test]
    fn test_builders() {
        let joint = Constraint::distance(handle(0), handle(1), 1.0)
            .with_anchors(Vec3::X, Vec3::Y)
            .with_stiffness(0.5);

        assert_eq!(joint.anchor_a, Vec3::X);
        assert_eq!(joint.anchor_b, Vec3::Y);
        match joint.kind {
            ConstraintKind::Distance { stiffness, .. } => assert_eq!(stiffness, 0.5),
            _ => panic!("expected a distance joint"),
        }
    }

    #[test]
    fn test_hinge_axis_normalized() {
        let joint = Constraint::hinge(handle(0), handle(1), Vec3::new(0.0, 2.0, 0.0));
        match joint.kind {
            ConstraintKind::Hinge { axis, .. } => {
                assert!((axis - Vec3::Y).length() < 1e-6);
            }
            _ => panic!("expected a hinge joint"),
        }
    }
}

//! Broadphase candidate-pair collection using AABB overlap tests.

use super::collider::Aabb;
use super::rigid_body::{BodyType, RigidBody};

/// Pairwise AABB broadphase. O(n^2), no spatial acceleration structure;
/// sufficient for the body counts this world targets.
#[derive(Default)]
pub struct BroadPhase;

impl BroadPhase {
    pub fn new() -> Self {
        Self
    }

    /// Find all candidate pairs `(i, j)` with `i < j` whose AABBs
    /// overlap. Pairs where neither body is dynamic are skipped since
    /// the solver could not move either one. `aabbs` is index-aligned
    /// with `bodies`; `None` marks a body without a collider.
    pub fn find_pairs(&self, bodies: &[RigidBody], aabbs: &[Option<Aabb>]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for i in 0..bodies.len() {
            let Some(aabb_a) = &aabbs[i] else {
                continue;
            };
            for j in (i + 1)..bodies.len() {
                let Some(aabb_b) = &aabbs[j] else {
                    continue;
                };

                if bodies[i].body_type != BodyType::Dynamic
                    && bodies[j].body_type != BodyType::Dynamic
                {
                    continue;
                }

                if aabb_a.overlaps(aabb_b) {
                    pairs.push((i, j));
                }
            }
        }

        pairs
    }

    /// Every pair `(i, j)` with `i < j`, unconditionally. Fallback used
    /// when the broadphase is disabled in the config.
    pub fn all_pairs(&self, count: usize) -> Vec<(usize, usize)> {
        let mut pairs = Vec::with_capacity(count.saturating_sub(1) * count / 2);
        for i in 0..count {
            for j in (i + 1)..count {
                pairs.push((i, j));
            }
        }
        pairs
    }
}

//! `Box2`: a product of two `Range`s, interpreted as `(theta, phi)`.
//!
//! Ported from `cpp/src/pipeline/box.hpp`.

use super::Range;
use crate::interval::Interval;

/// `theta in 2*pi*r[0]`, `phi in pi*r[1]` (theta ranges over a full circle,
/// phi over a half circle — the plug orientation is `S^2 x S^1`-valued but
/// only `S^2` is subdivided here; `alpha` lives on `Box3`'s third axis when
/// this type stands in for the plug's in-plane component via `Box3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Box2 {
    pub ranges: [Range; 2],
}

impl Box2 {
    #[inline]
    pub fn new(theta: Range, phi: Range) -> Self {
        Self { ranges: [theta, phi] }
    }

    #[inline]
    pub fn root() -> Self {
        Self::new(Range::root(), Range::root())
    }

    #[inline]
    pub fn theta_range(&self) -> Range {
        self.ranges[0]
    }
    #[inline]
    pub fn phi_range(&self) -> Range {
        self.ranges[1]
    }

    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.ranges.iter().any(|r| r.is_overflow())
    }

    pub fn theta<I: Interval>(&self) -> I {
        self.ranges[0].interval::<I>() * I::tau()
    }

    pub fn phi<I: Interval>(&self) -> I {
        self.ranges[1].interval::<I>() * I::pi()
    }

    /// The four children, in `(theta, phi)` quadrant order.
    pub fn parts(&self) -> [Box2; 4] {
        let (t0, t1) = self.ranges[0].parts();
        let (p0, p1) = self.ranges[1].parts();
        [
            Box2::new(t0, p0),
            Box2::new(t0, p1),
            Box2::new(t1, p0),
            Box2::new(t1, p1),
        ]
    }
}

/// Ordering for priority queues: shallower boxes first (by max depth across
/// axes), then lexicographically by packed id — breadth dominates depth.
impl PartialOrd for Box2 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Box2 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let self_depth = self.ranges.iter().map(|r| r.depth).max().unwrap_or(0);
        let other_depth = other.ranges.iter().map(|r| r.depth).max().unwrap_or(0);
        self_depth
            .cmp(&other_depth)
            .then_with(|| {
                let a: Vec<u32> = self.ranges.iter().map(|r| r.pack()).collect();
                let b: Vec<u32> = other.ranges.iter().map(|r| r.pack()).collect();
                a.cmp(&b)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::FastInterval;

    #[test]
    fn root_covers_full_angular_domain() {
        let b = Box2::root();
        let theta: FastInterval = b.theta();
        let phi: FastInterval = b.phi();
        assert!(theta.min() <= 0.0 && theta.max() >= 2.0 * std::f64::consts::PI - 1e-9);
        assert!(phi.min() <= 0.0 && phi.max() >= std::f64::consts::PI - 1e-9);
    }

    #[test]
    fn parts_yields_four_children() {
        let b = Box2::root();
        assert_eq!(b.parts().len(), 4);
        assert!(b.parts().iter().all(|c| c.ranges[0].depth == 1));
    }

    #[test]
    fn shallower_box_has_priority() {
        let shallow = Box2::root();
        let deep = shallow.parts()[0];
        assert!(shallow < deep);
    }
}

//! `Box3`: a product of three `Range`s, interpreted as `(theta, phi, alpha)`
//! — the hole's orientation plus its in-plane rotation.
//!
//! Ported from `cpp/src/pipeline/box.hpp`.

use super::{Box2, Range};
use crate::interval::Interval;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Box3 {
    pub ranges: [Range; 3],
}

impl Box3 {
    #[inline]
    pub fn new(theta: Range, phi: Range, alpha: Range) -> Self {
        Self {
            ranges: [theta, phi, alpha],
        }
    }

    #[inline]
    pub fn root() -> Self {
        Self::new(Range::root(), Range::root(), Range::root())
    }

    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.ranges.iter().any(|r| r.is_overflow())
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.ranges.iter().map(|r| r.depth).max().unwrap_or(0)
    }

    pub fn theta<I: Interval>(&self) -> I {
        self.ranges[0].interval::<I>() * I::tau()
    }
    pub fn phi<I: Interval>(&self) -> I {
        self.ranges[1].interval::<I>() * I::pi()
    }
    pub fn alpha<I: Interval>(&self) -> I {
        self.ranges[2].interval::<I>() * I::tau()
    }

    /// The eight children, Cartesian product of each axis's two children.
    pub fn parts(&self) -> [Box3; 8] {
        let (t0, t1) = self.ranges[0].parts();
        let (p0, p1) = self.ranges[1].parts();
        let (a0, a1) = self.ranges[2].parts();
        [
            Box3::new(t0, p0, a0),
            Box3::new(t0, p0, a1),
            Box3::new(t0, p1, a0),
            Box3::new(t0, p1, a1),
            Box3::new(t1, p0, a0),
            Box3::new(t1, p0, a1),
            Box3::new(t1, p1, a0),
            Box3::new(t1, p1, a1),
        ]
    }
}

impl PartialOrd for Box3 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Box3 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.depth().cmp(&other.depth()).then_with(|| {
            let a: Vec<u32> = self.ranges.iter().map(|r| r.pack()).collect();
            let b: Vec<u32> = other.ranges.iter().map(|r| r.pack()).collect();
            a.cmp(&b)
        })
    }
}

/// A 3-box together with the finite set of 2-boxes that, tiling the plug
/// orientation sphere, were each individually eliminated — the elimination
/// certificate for `box3`.
#[derive(Clone, Debug)]
pub struct EliminatedBox3 {
    pub box3: Box3,
    pub eliminated: Vec<Box2>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_yields_eight_children_one_depth_deeper() {
        let b = Box3::root();
        let children = b.parts();
        assert_eq!(children.len(), 8);
        assert!(children.iter().all(|c| c.depth() == 1));
    }

    #[test]
    fn root_has_depth_zero() {
        assert_eq!(Box3::root().depth(), 0);
    }
}

//! `Edge<I>`: ordered pair of `Vector2<I>`, oriented-side and avoidance tests.
//!
//! Ported from `cpp/src/geometry/edge.hpp`.

use super::Vector2;
use crate::interval::Interval;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Ccw,
    Cw,
    /// Only returned when the cross product's interval provably contains 0.
    Collinear,
}

#[derive(Clone, Copy, Debug)]
pub struct Edge<I: Interval> {
    pub from: Vector2<I>,
    pub to: Vector2<I>,
}

impl<I: Interval> Edge<I> {
    #[inline]
    pub fn new(from: Vector2<I>, to: Vector2<I>) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn direction(&self) -> Vector2<I> {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> I {
        self.direction().length()
    }

    /// Sign of `(to - from) x (v - from)`.
    pub fn orientation(&self, v: &Vector2<I>) -> Orientation {
        let cross = self.direction().cross(&(*v - self.from));
        if cross.is_positive() {
            Orientation::Ccw
        } else if cross.is_negative() {
            Orientation::Cw
        } else {
            Orientation::Collinear
        }
    }

    /// `true` only when `v` is provably strictly left of the directed edge
    /// (the half-plane a CCW polygon's interior lies in).
    #[inline]
    pub fn left_of(&self, v: &Vector2<I>) -> bool {
        self.orientation(v) == Orientation::Ccw
    }

    /// Conservative "provably non-intersecting" test against another edge.
    /// A `false` return does not imply the edges intersect.
    pub fn avoids(&self, other: &Self) -> bool {
        let same_side = |e: &Self, p: &Vector2<I>, q: &Vector2<I>| -> bool {
            let op = e.orientation(p);
            let oq = e.orientation(q);
            op != Orientation::Collinear && op == oq
        };
        if same_side(self, &other.from, &other.to) {
            return true;
        }
        if same_side(other, &self.from, &self.to) {
            return true;
        }

        let d = self.direction();
        let len_sq = d.length_squared();
        let proj_outside = |v: &Vector2<I>| -> bool {
            let t = d.dot(&(*v - self.from));
            t.is_negative() || (t - len_sq).is_positive()
        };
        if proj_outside(&other.from) && proj_outside(&other.to) {
            return true;
        }
        let d2 = other.direction();
        let len_sq2 = d2.length_squared();
        let proj_outside2 = |v: &Vector2<I>| -> bool {
            let t = d2.dot(&(*v - other.from));
            t.is_negative() || (t - len_sq2).is_positive()
        };
        if proj_outside2(&self.from) && proj_outside2(&self.to) {
            return true;
        }

        self.avoids_by_midpoint_distance(other)
    }

    fn avoids_by_midpoint_distance(&self, other: &Self) -> bool {
        let mid_self = self.midpoint();
        let mid_other = other.midpoint();
        let dx = mid_self.x - mid_other.x;
        let dy = mid_self.y - mid_other.y;
        let dist_sq = dx * dx + dy * dy;
        let half_self = self.direction().length() * I::from_bounds(0.5, 0.5);
        let half_other = other.direction().length() * I::from_bounds(0.5, 0.5);
        let bound = half_self + half_other;
        (dist_sq.sqrt() - bound).is_positive()
    }

    #[inline]
    fn midpoint(&self) -> Vector2<I> {
        let half = I::from_bounds(0.5, 0.5);
        (self.from + self.to).scale(half)
    }

    /// `true` only when `v` is provably not on the edge's segment.
    pub fn avoids_vector(&self, v: &Vector2<I>) -> bool {
        if self.orientation(v) != Orientation::Collinear {
            return true;
        }
        let d = self.direction();
        let len_sq = d.length_squared();
        let t = d.dot(&(*v - self.from));
        if t.is_negative() || (t - len_sq).is_positive() {
            return true;
        }
        let half = I::from_bounds(0.5, 0.5);
        let midpoint = (self.from + self.to).scale(half);
        (*v - midpoint).length().gt(&(d.length() * half))
    }
}

//! "Fast" backend: outward-rounded `f64` pair, no external interval crate.
//!
//! TH: spec §4.A backend 1 ("Fast").
//! Ported from `cpp/src/interval/float_interval.hpp`.

use super::{next_down, next_up, periodic_extrema, Interval};

/// `[lo, hi]` with `lo <= hi`, or the distinguished NaN/empty state
/// (`lo.is_nan() && hi.is_nan()`).
#[derive(Clone, Copy, Debug)]
pub struct FastInterval {
    lo: f64,
    hi: f64,
}

impl FastInterval {
    #[inline]
    fn raw(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

impl Interval for FastInterval {
    #[inline]
    fn from_i64(v: i64) -> Self {
        Self::raw(v as f64, v as f64)
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::nan();
        }
        Self::raw(v, v)
    }
    #[inline]
    fn from_bounds(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "interval bounds out of order: {lo} > {hi}");
        Self::raw(lo, hi)
    }
    #[inline]
    fn nan() -> Self {
        Self::raw(f64::NAN, f64::NAN)
    }
    #[inline]
    fn is_nan(&self) -> bool {
        self.lo.is_nan() || self.hi.is_nan()
    }
    #[inline]
    fn min(&self) -> f64 {
        self.lo
    }
    #[inline]
    fn max(&self) -> f64 {
        self.hi
    }
    #[inline]
    fn hull(&self, other: &Self) -> Self {
        if self.is_nan() {
            return *other;
        }
        if other.is_nan() {
            return *self;
        }
        Self::raw(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    #[inline]
    fn pi() -> Self {
        // std::f64::consts::PI is the nearest double to pi; widen by one ulp
        // on each side so the enclosure is rigorous rather than merely close.
        Self::raw(next_down(std::f64::consts::PI), next_up(std::f64::consts::PI))
    }

    fn sqrt(&self) -> Self {
        if self.is_nan() || self.lo < 0.0 {
            return Self::nan();
        }
        Self::raw(next_down(self.lo.max(0.0).sqrt()), next_up(self.hi.sqrt()))
    }

    fn sin(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        let pi = std::f64::consts::PI;
        let (hits_min, hits_max) = periodic_extrema(self.lo, self.hi, pi, pi / 2.0);
        let a = next_down(self.lo.sin().min(self.hi.sin()));
        let b = next_up(self.lo.sin().max(self.hi.sin()));
        let lo = if hits_min { -1.0 } else { a };
        let hi = if hits_max { 1.0 } else { b };
        Self::raw(lo.max(-1.0), hi.min(1.0))
    }

    fn cos(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        let pi = std::f64::consts::PI;
        let (hits_min, hits_max) = periodic_extrema(self.lo, self.hi, pi, 0.0);
        let a = next_down(self.lo.cos().min(self.hi.cos()));
        let b = next_up(self.lo.cos().max(self.hi.cos()));
        let lo = if hits_min { -1.0 } else { a };
        let hi = if hits_max { 1.0 } else { b };
        Self::raw(lo.max(-1.0), hi.min(1.0))
    }

    fn tan(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        let pi = std::f64::consts::PI;
        // Straddles (or touches) an asymptote at pi/2 + k*pi within [lo, hi]?
        let k = ((self.lo - pi / 2.0) / pi).ceil();
        let asym = pi / 2.0 + k * pi;
        if asym >= self.lo && asym <= self.hi {
            return Self::nan();
        }
        Self::raw(next_down(self.lo.tan()), next_up(self.hi.tan()))
    }

    fn asin(&self) -> Self {
        if self.is_nan() || self.lo > 1.0 || self.hi < -1.0 {
            return Self::nan();
        }
        let lo = self.lo.max(-1.0);
        let hi = self.hi.min(1.0);
        Self::raw(next_down(lo.asin()), next_up(hi.asin()))
    }

    fn acos(&self) -> Self {
        if self.is_nan() || self.lo > 1.0 || self.hi < -1.0 {
            return Self::nan();
        }
        let lo = self.lo.max(-1.0);
        let hi = self.hi.min(1.0);
        // acos is decreasing.
        Self::raw(next_down(hi.acos()), next_up(lo.acos()))
    }

    fn atan(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        Self::raw(next_down(self.lo.atan()), next_up(self.hi.atan()))
    }

    fn recip(&self) -> Self {
        if self.is_nan() || (self.lo <= 0.0 && self.hi >= 0.0) {
            return Self::nan();
        }
        Self::raw(next_down(1.0 / self.hi), next_up(1.0 / self.lo))
    }
}

impl std::ops::Add for FastInterval {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan();
        }
        Self::raw(
            next_down(self.lo + rhs.lo),
            next_up(self.hi + rhs.hi),
        )
    }
}
impl std::ops::Sub for FastInterval {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan();
        }
        Self::raw(
            next_down(self.lo - rhs.hi),
            next_up(self.hi - rhs.lo),
        )
    }
}
impl std::ops::Neg for FastInterval {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        Self::raw(-self.hi, -self.lo)
    }
}
impl std::ops::Mul for FastInterval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan();
        }
        let corners = [
            self.lo * rhs.lo,
            self.lo * rhs.hi,
            self.hi * rhs.lo,
            self.hi * rhs.hi,
        ];
        let lo = corners.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Self::raw(next_down(lo), next_up(hi))
    }
}
impl std::ops::Div for FastInterval {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.recip()
    }
}

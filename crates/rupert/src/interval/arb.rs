//! Arbitrary-precision interval backend: an ad hoc MPFI built on `rug::Float`
//! (MPFR bindings).
//!
//! TH: spec §4.A backend 3 ("Arb").
//! Ported from `cpp/src/interval/mpfi_interval.hpp`, which wraps MPFI
//! directly; `rug` does not expose MPFI, so bounds are kept as a pair of
//! `rug::Float` rounded in opposite directions (`Round::Down` / `Round::Up`),
//! which is exactly what MPFI does internally.

use rug::float::Round;
use rug::ops::{AddAssignRound, DivAssignRound, MulAssignRound, SubAssignRound};
use rug::Float;

use super::Interval;
use crate::error::KernelError;

/// Working precision (significand bits) for every `ArbInterval` in a run.
/// Set once by `Config` before the pipeline starts; operands built at a
/// different precision are a logic error caught by [`check_precision`].
pub const DEFAULT_PRECISION: u32 = 256;

#[derive(Clone, Debug)]
pub struct ArbInterval {
    lo: Float,
    hi: Float,
    /// Marks the distinguished NaN/empty state; `lo`/`hi` carry the
    /// precision but are not meaningful bounds when this is set.
    nan: bool,
}

impl ArbInterval {
    /// Verify two operands share a working precision before combining them.
    /// The arithmetic operators assume this has already been checked and
    /// debug-assert on mismatch; callers that accept externally constructed
    /// operands (box processor input) should call this explicitly first.
    pub fn check_precision(a: &Self, b: &Self) -> Result<(), KernelError> {
        if a.lo.prec() != b.lo.prec() {
            return Err(KernelError::PrecisionMismatch {
                expected: a.lo.prec(),
                found: b.lo.prec(),
            });
        }
        Ok(())
    }

    pub fn precision(&self) -> u32 {
        self.lo.prec()
    }

    fn nan_at(prec: u32) -> Self {
        ArbInterval {
            lo: Float::with_val(prec, 0),
            hi: Float::with_val(prec, 0),
            nan: true,
        }
    }

    #[inline]
    fn assert_same_precision(&self, other: &Self) {
        debug_assert_eq!(
            self.lo.prec(),
            other.lo.prec(),
            "ArbInterval operands built at different working precisions"
        );
    }

    /// Outward-rounded hull of `f` applied monotonically-unknown over
    /// `[lo, hi]`, given both endpoint images already computed. Shared by
    /// sin/cos, whose images are not monotone over an arbitrary box.
    fn bracket(prec: u32, down_candidates: [Float; 2], up_candidates: [Float; 2]) -> (Float, Float) {
        let [d0, d1] = down_candidates;
        let [u0, u1] = up_candidates;
        let lo = if d0 < d1 { d0 } else { d1 };
        let hi = if u0 > u1 { u0 } else { u1 };
        let _ = prec;
        (lo, hi)
    }
}

impl Interval for ArbInterval {
    #[inline]
    fn from_i64(v: i64) -> Self {
        let prec = DEFAULT_PRECISION;
        ArbInterval {
            lo: Float::with_val(prec, v),
            hi: Float::with_val(prec, v),
            nan: false,
        }
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::nan();
        }
        let prec = DEFAULT_PRECISION;
        ArbInterval {
            lo: Float::with_val(prec, v),
            hi: Float::with_val(prec, v),
            nan: false,
        }
    }

    #[inline]
    fn from_bounds(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi);
        let prec = DEFAULT_PRECISION;
        ArbInterval {
            lo: Float::with_val(prec, lo),
            hi: Float::with_val(prec, hi),
            nan: false,
        }
    }

    #[inline]
    fn nan() -> Self {
        Self::nan_at(DEFAULT_PRECISION)
    }

    #[inline]
    fn is_nan(&self) -> bool {
        self.nan || self.lo.is_nan() || self.hi.is_nan()
    }

    #[inline]
    fn min(&self) -> f64 {
        self.lo.to_f64()
    }

    #[inline]
    fn max(&self) -> f64 {
        self.hi.to_f64()
    }

    fn hull(&self, other: &Self) -> Self {
        if self.is_nan() {
            return other.clone();
        }
        if other.is_nan() {
            return self.clone();
        }
        self.assert_same_precision(other);
        let lo = if self.lo < other.lo {
            self.lo.clone()
        } else {
            other.lo.clone()
        };
        let hi = if self.hi > other.hi {
            self.hi.clone()
        } else {
            other.hi.clone()
        };
        ArbInterval { lo, hi, nan: false }
    }

    fn pi() -> Self {
        let prec = DEFAULT_PRECISION;
        // Compute a few guard bits over working precision, then round
        // outward into the working precision so the result is rigorous.
        let guard = Float::with_val(prec + 16, rug::float::Constant::Pi);
        let lo = Float::with_val_round(prec, guard.clone(), Round::Down).0;
        let hi = Float::with_val_round(prec, guard, Round::Up).0;
        ArbInterval { lo, hi, nan: false }
    }

    fn sqrt(&self) -> Self {
        if self.is_nan() || self.lo < 0 {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let lo_val = self.lo.clone().max(&Float::with_val(prec, 0));
        let lo = Float::with_val_round(prec, lo_val.sqrt_ref(), Round::Down).0;
        let hi = Float::with_val_round(prec, self.hi.sqrt_ref(), Round::Up).0;
        ArbInterval { lo, hi, nan: false }
    }

    fn sin(&self) -> Self {
        if self.is_nan() {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let pi = Self::pi();
        let (hits_min, hits_max) =
            super::periodic_extrema(self.min(), self.max(), pi.min(), std::f64::consts::FRAC_PI_2);
        let (lo, hi) = Self::bracket(
            prec,
            [
                Float::with_val_round(prec, self.lo.sin_ref(), Round::Down).0,
                Float::with_val_round(prec, self.hi.sin_ref(), Round::Down).0,
            ],
            [
                Float::with_val_round(prec, self.lo.sin_ref(), Round::Up).0,
                Float::with_val_round(prec, self.hi.sin_ref(), Round::Up).0,
            ],
        );
        let one = Float::with_val(prec, 1);
        let neg_one = Float::with_val(prec, -1);
        ArbInterval {
            lo: if hits_min { neg_one } else { lo.max(&Float::with_val(prec, -1)) },
            hi: if hits_max { one } else { hi.min(&Float::with_val(prec, 1)) },
            nan: false,
        }
    }

    fn cos(&self) -> Self {
        if self.is_nan() {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let pi = Self::pi();
        let (hits_min, hits_max) = super::periodic_extrema(self.min(), self.max(), pi.min(), 0.0);
        let (lo, hi) = Self::bracket(
            prec,
            [
                Float::with_val_round(prec, self.lo.cos_ref(), Round::Down).0,
                Float::with_val_round(prec, self.hi.cos_ref(), Round::Down).0,
            ],
            [
                Float::with_val_round(prec, self.lo.cos_ref(), Round::Up).0,
                Float::with_val_round(prec, self.hi.cos_ref(), Round::Up).0,
            ],
        );
        let one = Float::with_val(prec, 1);
        let neg_one = Float::with_val(prec, -1);
        ArbInterval {
            lo: if hits_min { neg_one } else { lo.max(&Float::with_val(prec, -1)) },
            hi: if hits_max { one } else { hi.min(&Float::with_val(prec, 1)) },
            nan: false,
        }
    }

    fn tan(&self) -> Self {
        if self.is_nan() {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let pi = Self::pi().min();
        let k = ((self.min() - pi / 2.0) / pi).ceil();
        let asym = pi / 2.0 + k * pi;
        if asym >= self.min() && asym <= self.max() {
            return Self::nan_at(prec);
        }
        let lo = Float::with_val_round(prec, self.lo.tan_ref(), Round::Down).0;
        let hi = Float::with_val_round(prec, self.hi.tan_ref(), Round::Up).0;
        ArbInterval { lo, hi, nan: false }
    }

    fn asin(&self) -> Self {
        if self.is_nan() || self.min() > 1.0 || self.max() < -1.0 {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let lo_v = self.lo.clone().max(&Float::with_val(prec, -1));
        let hi_v = self.hi.clone().min(&Float::with_val(prec, 1));
        ArbInterval {
            lo: Float::with_val_round(prec, lo_v.asin_ref(), Round::Down).0,
            hi: Float::with_val_round(prec, hi_v.asin_ref(), Round::Up).0,
            nan: false,
        }
    }

    fn acos(&self) -> Self {
        if self.is_nan() || self.min() > 1.0 || self.max() < -1.0 {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let lo_v = self.lo.clone().max(&Float::with_val(prec, -1));
        let hi_v = self.hi.clone().min(&Float::with_val(prec, 1));
        // acos is decreasing.
        ArbInterval {
            lo: Float::with_val_round(prec, hi_v.acos_ref(), Round::Down).0,
            hi: Float::with_val_round(prec, lo_v.acos_ref(), Round::Up).0,
            nan: false,
        }
    }

    fn atan(&self) -> Self {
        if self.is_nan() {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        ArbInterval {
            lo: Float::with_val_round(prec, self.lo.atan_ref(), Round::Down).0,
            hi: Float::with_val_round(prec, self.hi.atan_ref(), Round::Up).0,
            nan: false,
        }
    }

    fn recip(&self) -> Self {
        if self.is_nan() || (self.lo <= 0 && self.hi >= 0) {
            return Self::nan_at(self.precision());
        }
        let prec = self.precision();
        let one = Float::with_val(prec, 1);
        ArbInterval {
            lo: Float::with_val_round(prec, one.clone() / &self.hi, Round::Down).0,
            hi: Float::with_val_round(prec, one / &self.lo, Round::Up).0,
            nan: false,
        }
    }
}

impl std::ops::Add for ArbInterval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan_at(self.precision());
        }
        self.assert_same_precision(&rhs);
        let mut lo = self.lo.clone();
        lo.add_assign_round(&rhs.lo, Round::Down);
        let mut hi = self.hi.clone();
        hi.add_assign_round(&rhs.hi, Round::Up);
        ArbInterval { lo, hi, nan: false }
    }
}

impl std::ops::Sub for ArbInterval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan_at(self.precision());
        }
        self.assert_same_precision(&rhs);
        let mut lo = self.lo.clone();
        lo.sub_assign_round(&rhs.hi, Round::Down);
        let mut hi = self.hi.clone();
        hi.sub_assign_round(&rhs.lo, Round::Up);
        ArbInterval { lo, hi, nan: false }
    }
}

impl std::ops::Neg for ArbInterval {
    type Output = Self;
    fn neg(self) -> Self {
        if self.is_nan() {
            return self;
        }
        ArbInterval {
            lo: -self.hi,
            hi: -self.lo,
            nan: false,
        }
    }
}

impl std::ops::Mul for ArbInterval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan_at(self.precision());
        }
        self.assert_same_precision(&rhs);
        let prec = self.precision();
        let mut lo: Option<Float> = None;
        let mut hi: Option<Float> = None;
        for a in [&self.lo, &self.hi] {
            for b in [&rhs.lo, &rhs.hi] {
                let mut down = Float::with_val(prec, a);
                down.mul_assign_round(b, Round::Down);
                let mut up = Float::with_val(prec, a);
                up.mul_assign_round(b, Round::Up);
                lo = Some(match lo {
                    Some(cur) if cur < down => cur,
                    _ => down,
                });
                hi = Some(match hi {
                    Some(cur) if cur > up => cur,
                    _ => up,
                });
            }
        }
        ArbInterval {
            lo: lo.unwrap(),
            hi: hi.unwrap(),
            nan: false,
        }
    }
}

impl std::ops::Div for ArbInterval {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() || (rhs.lo <= 0 && rhs.hi >= 0) {
            return Self::nan_at(self.precision());
        }
        self.assert_same_precision(&rhs);
        let prec = self.precision();
        let mut lo: Option<Float> = None;
        let mut hi: Option<Float> = None;
        for a in [&self.lo, &self.hi] {
            for (round, b) in [(Round::Down, &rhs.lo), (Round::Up, &rhs.hi)] {
                let mut v = Float::with_val(prec, a);
                v.div_assign_round(b, round);
                lo = Some(match lo.take() {
                    Some(cur) if cur < v => cur,
                    _ => v.clone(),
                });
                hi = Some(match hi.take() {
                    Some(cur) if cur > v => cur,
                    _ => v,
                });
            }
        }
        ArbInterval {
            lo: lo.unwrap(),
            hi: hi.unwrap(),
            nan: false,
        }
    }
}

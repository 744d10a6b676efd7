//! Rigorous interval arithmetic kernel (three interchangeable backends).
//!
//! Purpose
//! - Every arithmetic/trig operation must return an interval that rigorously
//!   encloses the true image: `f(x) ∈ I.f()` for every concrete `x ∈ I`.
//! - NaN means "no proof available" and propagates through every operation.
//!   Division by a zero-crossing interval yields NaN, never ±∞.
//!
//! Why three backends
//! - `fast`: hand-rolled outward rounding on plain `f64`, no external crate.
//! - `hw`: wraps the `inari` crate (hardware directed rounding, IEEE-1788).
//! - `arb`: wraps `rug::Float` (MPFR) as a pair of oppositely-rounded bounds,
//!   an ad hoc MPFI built on MPFR, for runs that need more than 53 bits.
//!
//! References
//! - Ported from `cpp/src/interval/{float_interval,boost_interval,mpfi_interval}.hpp`
//!   (see `original_source/_INDEX.md`).

pub mod arb;
pub mod fast;
pub mod hw;

pub use arb::ArbInterval;
pub use fast::FastInterval;
pub use hw::HwInterval;

/// Rigorous interval contract shared by all three backends.
///
/// Invariant (soundness): for every supported operation `f` and every
/// concrete `x` with `x ∈ self`, `f(x) ∈ self.f()`.
///
/// Predicates (`gt`, `lt`, `is_positive`, ...) are three-valued by
/// construction: `false` never means "the opposite holds", only "not
/// provable from this enclosure."
pub trait Interval:
    Copy
    + Clone
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
{
    /// Thin interval `[v, v]` from an integer.
    fn from_i64(v: i64) -> Self;
    /// Thin interval `[v, v]` from a double (not itself a proof of exactness;
    /// callers who need a literal constant should prefer `from_i64` or
    /// `from_bounds` with explicitly-rounded endpoints).
    fn from_f64(v: f64) -> Self;
    /// `[lo, hi]`, `lo <= hi`.
    fn from_bounds(lo: f64, hi: f64) -> Self;
    /// Distinguished NaN/empty state.
    fn nan() -> Self;
    fn is_nan(&self) -> bool;

    fn min(&self) -> f64;
    fn max(&self) -> f64;
    #[inline]
    fn mid(&self) -> f64 {
        0.5 * (self.min() + self.max())
    }
    #[inline]
    fn len(&self) -> f64 {
        self.max() - self.min()
    }
    #[inline]
    fn rad(&self) -> f64 {
        0.5 * self.len()
    }
    fn hull(&self, other: &Self) -> Self;

    /// `lo > 0`, machine-proved.
    #[inline]
    fn is_positive(&self) -> bool {
        !self.is_nan() && self.min() > 0.0
    }
    /// `hi < 0`, machine-proved.
    #[inline]
    fn is_negative(&self) -> bool {
        !self.is_nan() && self.max() < 0.0
    }
    #[inline]
    fn is_nonzero(&self) -> bool {
        self.is_positive() || self.is_negative()
    }

    fn pi() -> Self;
    #[inline]
    fn tau() -> Self {
        Self::from_i64(2) * Self::pi()
    }

    fn sqrt(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn tan(&self) -> Self;
    fn asin(&self) -> Self;
    fn acos(&self) -> Self;
    fn atan(&self) -> Self;
    /// `1/self`; NaN when `self` straddles (or touches) zero.
    fn recip(&self) -> Self;

    /// `self` entirely strictly dominates `other`: `self.min() > other.max()`.
    #[inline]
    fn gt(&self, other: &Self) -> bool {
        !self.is_nan() && !other.is_nan() && self.min() > other.max()
    }
    /// `self` entirely strictly dominated by `other`.
    #[inline]
    fn lt(&self, other: &Self) -> bool {
        other.gt(self)
    }

    /// `cos(rotation angle)` helper shared by `Matrix3::cos_angle_between`.
    #[inline]
    fn clamp_unit(&self) -> Self {
        Self::from_bounds(self.min().max(-1.0), self.max().min(1.0))
    }
}

/// Outward rounding helpers shared by `fast` and as a fallback cross-check.
///
/// Why bit-stepping rather than FPU rounding-mode control
/// - Portable safe Rust has no stable way to flip the FPU rounding mode per
///   operation. A single round-to-nearest result is within 0.5 ulp of the
///   true value; stepping it one ulp further outward is a strictly more
///   conservative (and still rigorous) enclosure. This is the Open Question
///   resolution recorded in DESIGN.md for the "Fast" backend.
#[inline]
pub(crate) fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    let bits = if x > 0.0 { bits + 1 } else { bits - 1 };
    f64::from_bits(bits)
}

#[inline]
pub(crate) fn next_down(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    -next_up(-x)
}

/// Shared periodic-widening rule for cos/sin (spec §4.A): given `[lo, hi]`
/// and the phase offset for cos (0) or sin (`π/2`), determine whether the
/// enclosure must widen to `-1` and/or `1`.
pub(crate) fn periodic_extrema(lo: f64, hi: f64, pi: f64, phase: f64) -> (bool, bool) {
    let tau = 2.0 * pi;
    // max=1 at phase + 2kπ; min=-1 at phase + π + 2kπ.
    let hits = |center: f64| -> bool {
        if hi - lo >= tau {
            return true;
        }
        let k = ((lo - center) / tau).ceil();
        let candidate = center + k * tau;
        candidate <= hi + 1e-15 && candidate >= lo - 1e-15
    };
    (hits(phase + pi), hits(phase))
}


/// Kernel invariants checked across all three backends: soundness (every
/// corner combination of the operands' bounds lands inside the result),
/// determinism, and NaN propagation. Each backend gets its own `proptest!`
/// block so a counterexample names the offending backend directly, but the
/// bodies share the generic checks below.
#[cfg(test)]
mod proptest_kernel {
    use super::Interval;
    use crate::interval::{ArbInterval, FastInterval, HwInterval};
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn ordered_bounds(lo: f64, hi: f64) -> (f64, f64) {
        if lo <= hi {
            (lo, hi)
        } else {
            (hi, lo)
        }
    }

    fn check_arith_soundness<I: Interval>(a_lo: f64, a_hi: f64, b_lo: f64, b_hi: f64) -> Result<(), TestCaseError> {
        let (a_lo, a_hi) = ordered_bounds(a_lo, a_hi);
        let (b_lo, b_hi) = ordered_bounds(b_lo, b_hi);
        let a = I::from_bounds(a_lo, a_hi);
        let b = I::from_bounds(b_lo, b_hi);

        let sum = a + b;
        for &(x, y) in &[(a_lo, b_lo), (a_lo, b_hi), (a_hi, b_lo), (a_hi, b_hi)] {
            prop_assert!(sum.min() <= x + y && x + y <= sum.max(), "addition enclosure failed for corner ({x}, {y})");
        }

        let product = a * b;
        for &(x, y) in &[(a_lo, b_lo), (a_lo, b_hi), (a_hi, b_lo), (a_hi, b_hi)] {
            prop_assert!(product.min() <= x * y && x * y <= product.max(), "multiplication enclosure failed for corner ({x}, {y})");
        }

        let difference = a - b;
        for &(x, y) in &[(a_lo, b_lo), (a_lo, b_hi), (a_hi, b_lo), (a_hi, b_hi)] {
            prop_assert!(
                difference.min() <= x - y && x - y <= difference.max(),
                "subtraction enclosure failed for corner ({x}, {y})"
            );
        }

        Ok(())
    }

    fn check_trig_range<I: Interval>(lo: f64, hi: f64) -> Result<(), TestCaseError> {
        let (lo, hi) = ordered_bounds(lo, hi);
        let x = I::from_bounds(lo, hi);
        let sin = x.sin();
        let cos = x.cos();
        prop_assert!(sin.min() >= -1.0 - 1e-12 && sin.max() <= 1.0 + 1e-12, "sin escaped [-1, 1]: {sin:?}");
        prop_assert!(cos.min() >= -1.0 - 1e-12 && cos.max() <= 1.0 + 1e-12, "cos escaped [-1, 1]: {cos:?}");
        Ok(())
    }

    fn check_sqrt_soundness<I: Interval>(lo: f64, hi: f64) -> Result<(), TestCaseError> {
        let (lo, hi) = ordered_bounds(lo.abs(), hi.abs());
        let x = I::from_bounds(lo, hi);
        let root = x.sqrt();
        prop_assert!(!root.is_nan(), "sqrt of a nonnegative interval must not be NaN");
        for &v in &[lo, hi] {
            let r = v.sqrt();
            prop_assert!(root.min() <= r + 1e-9 && r - 1e-9 <= root.max(), "sqrt enclosure failed for endpoint {v}");
        }
        Ok(())
    }

    fn check_deterministic<I: Interval>(a_lo: f64, a_hi: f64, b_lo: f64, b_hi: f64) -> Result<(), TestCaseError> {
        let (a_lo, a_hi) = ordered_bounds(a_lo, a_hi);
        let (b_lo, b_hi) = ordered_bounds(b_lo, b_hi);
        let a = I::from_bounds(a_lo, a_hi);
        let b = I::from_bounds(b_lo, b_hi);
        let first = a + b;
        let second = a + b;
        prop_assert_eq!(first.min(), second.min());
        prop_assert_eq!(first.max(), second.max());
        Ok(())
    }

    fn check_nan_propagates<I: Interval>(a_lo: f64, a_hi: f64) -> Result<(), TestCaseError> {
        let (a_lo, a_hi) = ordered_bounds(a_lo, a_hi);
        let a = I::from_bounds(a_lo, a_hi);
        let nan = I::nan();
        prop_assert!((a + nan).is_nan());
        prop_assert!((a * nan).is_nan());
        prop_assert!(nan.recip().is_nan());
        Ok(())
    }

    const SMALL: std::ops::Range<f64> = -1.0e3..1.0e3;
    const ANGLE: std::ops::Range<f64> = -1.0e2..1.0e2;

    proptest! {
        #[test]
        fn fast_arith_is_sound(a_lo in SMALL, a_hi in SMALL, b_lo in SMALL, b_hi in SMALL) {
            check_arith_soundness::<FastInterval>(a_lo, a_hi, b_lo, b_hi)?;
        }
        #[test]
        fn fast_trig_stays_in_range(lo in ANGLE, hi in ANGLE) {
            check_trig_range::<FastInterval>(lo, hi)?;
        }
        #[test]
        fn fast_sqrt_is_sound(lo in SMALL, hi in SMALL) {
            check_sqrt_soundness::<FastInterval>(lo, hi)?;
        }
        #[test]
        fn fast_arith_is_deterministic(a_lo in SMALL, a_hi in SMALL, b_lo in SMALL, b_hi in SMALL) {
            check_deterministic::<FastInterval>(a_lo, a_hi, b_lo, b_hi)?;
        }
        #[test]
        fn fast_nan_propagates(a_lo in SMALL, a_hi in SMALL) {
            check_nan_propagates::<FastInterval>(a_lo, a_hi)?;
        }
    }

    proptest! {
        #[test]
        fn hw_arith_is_sound(a_lo in SMALL, a_hi in SMALL, b_lo in SMALL, b_hi in SMALL) {
            check_arith_soundness::<HwInterval>(a_lo, a_hi, b_lo, b_hi)?;
        }
        #[test]
        fn hw_trig_stays_in_range(lo in ANGLE, hi in ANGLE) {
            check_trig_range::<HwInterval>(lo, hi)?;
        }
        #[test]
        fn hw_sqrt_is_sound(lo in SMALL, hi in SMALL) {
            check_sqrt_soundness::<HwInterval>(lo, hi)?;
        }
        #[test]
        fn hw_nan_propagates(a_lo in SMALL, a_hi in SMALL) {
            check_nan_propagates::<HwInterval>(a_lo, a_hi)?;
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn arb_arith_is_sound(a_lo in SMALL, a_hi in SMALL, b_lo in SMALL, b_hi in SMALL) {
            check_arith_soundness::<ArbInterval>(a_lo, a_hi, b_lo, b_hi)?;
        }
        #[test]
        fn arb_trig_stays_in_range(lo in ANGLE, hi in ANGLE) {
            check_trig_range::<ArbInterval>(lo, hi)?;
        }
        #[test]
        fn arb_sqrt_is_sound(lo in SMALL, hi in SMALL) {
            check_sqrt_soundness::<ArbInterval>(lo, hi)?;
        }
        #[test]
        fn arb_nan_propagates(a_lo in SMALL, a_hi in SMALL) {
            check_nan_propagates::<ArbInterval>(a_lo, a_hi)?;
        }
    }

    proptest! {
        /// Cross-backend agreement: constructing the same bounds on two
        /// backends and running the same operation must give overlapping
        /// enclosures of the same real result, not contradictory ones.
        #[test]
        fn fast_and_hw_agree_on_addition(a_lo in SMALL, a_hi in SMALL, b_lo in SMALL, b_hi in SMALL) {
            let (a_lo, a_hi) = ordered_bounds(a_lo, a_hi);
            let (b_lo, b_hi) = ordered_bounds(b_lo, b_hi);

            let fast_sum = FastInterval::from_bounds(a_lo, a_hi) + FastInterval::from_bounds(b_lo, b_hi);
            let hw_sum = HwInterval::from_bounds(a_lo, a_hi) + HwInterval::from_bounds(b_lo, b_hi);

            prop_assert!(fast_sum.min() <= hw_sum.max() && hw_sum.min() <= fast_sum.max(),
                "fast and hw backends produced disjoint enclosures for the same addition");
        }
    }
}

//! Projection & rotation hull constructions.
//!
//! Ported from `cpp/src/geometry/transformation.hpp`. `cpp/src/geometry/hull.hpp`
//! carries an older "triangle hull" (fixed 3-point, `resolution` implicitly 1)
//! variant of the same idea; `transformation.hpp`'s resolution-`N` polygon
//! hulls are the ones the box processor actually calls, so that file is the
//! grounding source here.

use crate::geom::{Vector2, Vector3};
use crate::interval::Interval;

/// `A*cos(angle) + B*sin(angle)`, evaluated directly — sound but looser than
/// [`harmonic_combined`] since the two terms' enclosures add independently.
pub fn harmonic_trivial<I: Interval>(cos_amplitude: I, sin_amplitude: I, angle: I) -> I {
    cos_amplitude * angle.cos() + sin_amplitude * angle.sin()
}

/// `A*cos(angle) + B*sin(angle)` re-parametrized as `sign*sqrt(A^2+B^2)*cos(angle-phase)`,
/// a single term whose enclosure is tight at the evaluation point. Falls back
/// to the sine form when `A` is not provably nonzero, and to [`harmonic_trivial`]
/// when neither amplitude is provably nonzero.
pub fn harmonic_combined<I: Interval>(cos_amplitude: I, sin_amplitude: I, angle: I) -> I {
    if cos_amplitude.is_nonzero() {
        let amplitude = (cos_amplitude * cos_amplitude + sin_amplitude * sin_amplitude).sqrt();
        let phase = (sin_amplitude / cos_amplitude).atan();
        let sign = if cos_amplitude.is_positive() { I::from_i64(1) } else { I::from_i64(-1) };
        return sign * amplitude * (angle - phase).cos();
    }
    if sin_amplitude.is_nonzero() {
        let amplitude = (cos_amplitude * cos_amplitude + sin_amplitude * sin_amplitude).sqrt();
        let phase = -(cos_amplitude / sin_amplitude).atan();
        let sign = if sin_amplitude.is_positive() { I::from_i64(1) } else { I::from_i64(-1) };
        return sign * amplitude * (angle - phase).sin();
    }
    harmonic_trivial(cos_amplitude, sin_amplitude, angle)
}

/// `R(alpha) * vector`, i.e. `(x*cos(a) - y*sin(a), y*cos(a) + x*sin(a))`.
pub fn rotation_trivial<I: Interval>(vector: Vector2<I>, alpha: I) -> Vector2<I> {
    Vector2::new(
        harmonic_trivial(vector.x, -vector.y, alpha),
        harmonic_trivial(vector.y, vector.x, alpha),
    )
}

pub fn rotation_combined<I: Interval>(vector: Vector2<I>, alpha: I) -> Vector2<I> {
    Vector2::new(
        harmonic_combined(vector.x, -vector.y, alpha),
        harmonic_combined(vector.y, vector.x, alpha),
    )
}

/// `Rx(phi) * Rz(theta) * vertex`, projected to the `(X, Y)` plane.
pub fn projection_trivial<I: Interval>(vertex: Vector3<I>, theta: I, phi: I) -> Vector2<I> {
    Vector2::new(
        harmonic_trivial(vertex.x, -vertex.y, theta),
        harmonic_trivial(harmonic_trivial(vertex.y, vertex.x, theta), -vertex.z, phi),
    )
}

pub fn projection_combined<I: Interval>(vertex: Vector3<I>, theta: I, phi: I) -> Vector2<I> {
    Vector2::new(
        harmonic_combined(vertex.x, -vertex.y, theta),
        harmonic_combined(harmonic_combined(vertex.y, vertex.x, theta), -vertex.z, phi),
    )
}

/// The axis-aligned rectangle of an interval-valued 2-vector, as its four
/// corners in CCW order.
pub fn vector_hull<I: Interval>(v: Vector2<I>) -> Vec<Vector2<I>> {
    vec![
        Vector2::new(I::from_f64(v.x.min()), I::from_f64(v.y.min())),
        Vector2::new(I::from_f64(v.x.max()), I::from_f64(v.y.min())),
        Vector2::new(I::from_f64(v.x.max()), I::from_f64(v.y.max())),
        Vector2::new(I::from_f64(v.x.min()), I::from_f64(v.y.max())),
    ]
}

pub fn rotation_hull_trivial<I: Interval>(projected_vertex: Vector2<I>, alpha: I) -> Vec<Vector2<I>> {
    vector_hull(rotation_trivial(projected_vertex, alpha))
}

pub fn rotation_hull_combined<I: Interval>(projected_vertex: Vector2<I>, alpha: I) -> Vec<Vector2<I>> {
    vector_hull(rotation_combined(projected_vertex, alpha))
}

/// Resolution-`N` rotation hull: the two endpoint rotations plus `N`
/// interior mid-angle rotations, each scaled by `sec(alpha.rad()/N)` to stay
/// a sound enclosure of the swept arc. Degrades to [`rotation_hull_combined`]
/// when `alpha.len() > N*pi/2` (the scaling blows up as the arc approaches a
/// half-turn per piece). `resolution` must be at least 1.
pub fn rotation_hull_polygon<I: Interval>(vector: Vector2<I>, alpha: I, resolution: u32) -> Vec<Vector2<I>> {
    debug_assert!(resolution >= 1, "resolution must be at least 1");
    let half_pi_times_resolution = I::pi() / I::from_i64(2) * I::from_i64(resolution as i64);
    if I::from_f64(alpha.len()).gt(&half_pi_times_resolution) {
        return rotation_hull_combined(vector, alpha);
    }
    let alpha_min = I::from_f64(alpha.min());
    let alpha_max = I::from_f64(alpha.max());
    let mut rotated = Vec::with_capacity(resolution as usize + 2);
    rotated.push(rotation_trivial(vector, alpha_min));

    let scaling_factor = (I::from_f64(alpha.rad()) / I::from_i64(resolution as i64)).cos().recip();
    let pieces = 2 * resolution as i64;
    let mut i = 1;
    while i < pieces {
        let alpha_i = alpha_min * I::from_i64(pieces - i) / I::from_i64(pieces)
            + alpha_max * I::from_i64(i) / I::from_i64(pieces);
        let rotated_vertex = rotation_trivial(vector, alpha_i);
        rotated.push(rotated_vertex.scale(scaling_factor));
        i += 2;
    }

    rotated.push(rotation_trivial(vector, alpha_max));
    rotated
}

pub fn projection_hull_trivial<I: Interval>(vertex: Vector3<I>, theta: I, phi: I) -> Vec<Vector2<I>> {
    vector_hull(projection_trivial(vertex, theta, phi))
}

pub fn projection_hull_combined<I: Interval>(vertex: Vector3<I>, theta: I, phi: I) -> Vec<Vector2<I>> {
    vector_hull(projection_combined(vertex, theta, phi))
}

/// Resolution-`N` projection hull: rotate `(x, y)` through the full
/// `theta`-sweep via [`rotation_hull_polygon`], then for each of its `N+2`
/// rotated points fan out the `phi`-sweep into a `(min, max)` pair via
/// [`harmonic_combined`] — `2N+4` points total. Degrades to
/// [`projection_hull_combined`] when `theta.len() > N*pi/2`.
pub fn projection_hull_polygon<I: Interval>(vertex: Vector3<I>, theta: I, phi: I, resolution: u32) -> Vec<Vector2<I>> {
    let half_pi_times_resolution = I::pi() / I::from_i64(2) * I::from_i64(resolution as i64);
    if I::from_f64(theta.len()).gt(&half_pi_times_resolution) {
        return projection_hull_combined(vertex, theta, phi);
    }
    let vector = Vector2::new(vertex.x, vertex.y);
    let rotation_hull = rotation_hull_polygon(vector, theta, resolution);
    let mut projected = Vec::with_capacity(rotation_hull.len() * 2);
    for rotated_vertex in rotation_hull {
        let harmonic = harmonic_combined(rotated_vertex.y, -vertex.z, phi);
        projected.push(Vector2::new(rotated_vertex.x, I::from_f64(harmonic.min())));
        projected.push(Vector2::new(rotated_vertex.x, I::from_f64(harmonic.max())));
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::FastInterval;

    fn ival(lo: f64, hi: f64) -> FastInterval {
        FastInterval::from_bounds(lo, hi)
    }

    #[test]
    fn harmonic_combined_matches_trivial_at_thin_angle() {
        let angle = FastInterval::from_f64(0.4);
        let cos_amp = FastInterval::from_f64(2.0);
        let sin_amp = FastInterval::from_f64(-1.5);
        let trivial = harmonic_trivial(cos_amp, sin_amp, angle);
        let combined = harmonic_combined(cos_amp, sin_amp, angle);
        assert!((trivial.mid() - combined.mid()).abs() < 1e-9);
    }

    #[test]
    fn harmonic_combined_is_tighter_than_trivial_over_a_range() {
        let angle = ival(0.0, 0.2);
        let cos_amp = FastInterval::from_f64(3.0);
        let sin_amp = FastInterval::from_f64(0.0);
        let trivial = harmonic_trivial(cos_amp, sin_amp, angle);
        let combined = harmonic_combined(cos_amp, sin_amp, angle);
        assert!(combined.len() <= trivial.len() + 1e-9);
    }

    #[test]
    fn rotation_trivial_preserves_length() {
        let v = Vector2::new(FastInterval::from_f64(3.0), FastInterval::from_f64(4.0));
        let rotated = rotation_trivial(v, FastInterval::from_f64(0.7));
        let before = v.length();
        let after = rotated.length();
        assert!((before.mid() - after.mid()).abs() < 1e-6);
    }

    #[test]
    fn vector_hull_has_four_corners_containing_center() {
        let v = Vector2::new(ival(-1.0, 1.0), ival(-2.0, 2.0));
        let corners = vector_hull(v);
        assert_eq!(corners.len(), 4);
        assert!(corners.iter().any(|c| c.x.max() >= 1.0 - 1e-12));
        assert!(corners.iter().any(|c| c.y.max() >= 2.0 - 1e-12));
    }

    #[test]
    fn rotation_hull_polygon_returns_resolution_plus_two_points() {
        let v = Vector2::new(FastInterval::from_f64(1.0), FastInterval::from_f64(0.0));
        let alpha = ival(0.0, 0.3);
        for resolution in [1u32, 2, 3, 5] {
            let hull = rotation_hull_polygon(v, alpha, resolution);
            assert_eq!(hull.len(), resolution as usize + 2);
        }
    }

    #[test]
    fn rotation_hull_polygon_degrades_to_combined_for_wide_angle() {
        let v = Vector2::new(FastInterval::from_f64(1.0), FastInterval::from_f64(0.0));
        let alpha = ival(0.0, std::f64::consts::PI * 10.0);
        let hull = rotation_hull_polygon(v, alpha, 1);
        // rotation_hull_combined returns the 4-corner box, not N+2 points.
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn projection_hull_polygon_returns_two_n_plus_four_points() {
        let vertex = Vector3::from_f64(1.0, 0.5, -0.5);
        let theta = ival(0.0, 0.2);
        let phi = ival(0.0, 0.2);
        for resolution in [1u32, 2, 4] {
            let hull = projection_hull_polygon(vertex, theta, phi, resolution);
            assert_eq!(hull.len(), 2 * (resolution as usize + 2));
        }
    }

    #[test]
    fn projection_hull_polygon_contains_the_combined_projection_midpoint() {
        let vertex = Vector3::from_f64(1.0, 0.3, -0.2);
        let theta = ival(-0.1, 0.1);
        let phi = ival(-0.1, 0.1);
        let hull = projection_hull_polygon(vertex, theta, phi, 3);
        let projected = projection_combined(vertex, FastInterval::from_f64(theta.mid()), FastInterval::from_f64(phi.mid()));
        let min_x = hull.iter().map(|p| p.x.min()).fold(f64::INFINITY, f64::min);
        let max_x = hull.iter().map(|p| p.x.max()).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x <= projected.x.mid() + 1e-6 && max_x >= projected.x.mid() - 1e-6);
    }
}

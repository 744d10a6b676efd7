//! Convex hull builder: gift-wrap on interval-valued 2-vectors.
//!
//! Ported from `cpp/src/geometry/geometry.hpp`'s `convex_hull()`. That
//! function calls `Edge::side()`/`len()`/`dist()`, which aren't members of
//! the `Edge`/`Vector` types actually defined elsewhere in `original_source`
//! (the same kind of stale cross-file reference as the two `range.hpp`
//! variants) — re-expressed here against the `Orientation`/`avoids`/`dist`/
//! `diff` API already ported from `edge.hpp`/`vector2.hpp` directly.

use crate::error::HullError;
use crate::geom::{Edge, Orientation, Polygon, Vector2};
use crate::interval::Interval;

/// Builds the convex hull of `points` as a CCW `Polygon`.
///
/// 1. Deduplicates: two points are merged (by hull/union of their
///    enclosures) when their distance is not provably greater than
///    `epsilon` — a looser test than `Vector2::diff`'s plain positivity,
///    needed because the rotation/projection hulls can emit points that
///    are provably distinct yet geometrically coincident up to the hull's
///    own slack (`box_processor`'s `epsilon` derivation).
/// 2. Seeds with the point of maximal `x.max()` (rightmost).
/// 3. Repeatedly gift-wraps: the next hull vertex is the one every other
///    point provably lies to the left of (or on) the edge to; ties (several
///    provably-collinear candidates from one step) are resolved by keeping
///    the farthest and suppressing any candidate an already-accepted edge
///    places strictly to its left.
///
/// Fails when every point is a mutual non-provable-duplicate of some other
/// (no stable seed exists) or a step can't find a most-clockwise candidate.
pub fn convex_hull<I: Interval>(points: &[Vector2<I>], epsilon: f64) -> Result<Polygon<I>, HullError> {
    let threshold = I::from_f64(epsilon);
    let close = |a: &Vector2<I>, b: &Vector2<I>| !a.dist(b).gt(&threshold);

    let n = points.len();
    let mut is_duplicate = vec![false; n];
    let mut any_non_duplicate = false;
    for i in 1..n {
        for j in 0..i {
            if close(&points[i], &points[j]) {
                is_duplicate[i] = true;
                break;
            }
        }
        if !is_duplicate[i] {
            any_non_duplicate = true;
        }
    }
    if n == 0 || !any_non_duplicate {
        return Err(HullError::TooFewPoints { count: n });
    }

    let mut start_index: Option<usize> = None;
    for i in 0..n {
        if is_duplicate[i] {
            continue;
        }
        let is_new_max = match start_index {
            None => true,
            Some(s) => points[i].x.max() > points[s].x.max(),
        };
        if is_new_max {
            start_index = Some(i);
        }
    }
    let start_index = start_index.ok_or(HullError::NoProgress)?;

    let mut queue = std::collections::VecDeque::new();
    queue.push_back(start_index);
    let mut visited = vec![false; n];
    let mut edges = Vec::new();

    while let Some(from_index) = queue.pop_front() {
        if visited[from_index] {
            continue;
        }
        visited[from_index] = true;

        let mut most_clockwise_index: Option<usize> = None;
        for candidate in 0..n {
            if is_duplicate[candidate] || candidate == from_index {
                continue;
            }
            if close(&points[from_index], &points[candidate]) {
                return Err(HullError::NoProgress);
            }
            let beats_current = match most_clockwise_index {
                None => true,
                Some(current) => {
                    Edge::new(points[from_index], points[current]).orientation(&points[candidate]) == Orientation::Cw
                }
            };
            if beats_current {
                most_clockwise_index = Some(candidate);
            }
        }
        let most_clockwise_index = most_clockwise_index.ok_or(HullError::NoProgress)?;

        let most_clockwise_edge = Edge::new(points[from_index], points[most_clockwise_index]);
        let mut to_indices = Vec::new();
        for to_index in 0..n {
            if is_duplicate[to_index] || to_index == from_index {
                continue;
            }
            if close(&points[from_index], &points[to_index]) {
                return Err(HullError::NoProgress);
            }
            if most_clockwise_edge.orientation(&points[to_index]) == Orientation::Ccw {
                continue;
            }
            let candidate_edge = Edge::new(points[from_index], points[to_index]);
            let is_most_clockwise = (0..n).filter(|&idx| idx != from_index && idx != to_index).all(|idx| {
                candidate_edge.orientation(&points[idx]) != Orientation::Cw
            });
            if is_most_clockwise {
                to_indices.push(to_index);
            }
        }
        to_indices.sort_by(|&a, &b| {
            let dist_a = points[from_index].dist(&points[a]).max();
            let dist_b = points[from_index].dist(&points[b]).max();
            dist_b.partial_cmp(&dist_a).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut new_edges: Vec<(usize, usize)> = Vec::new();
        for to_index in to_indices {
            let is_most_clockwise = !new_edges.iter().any(|&(ei, ej)| {
                Edge::new(points[ei], points[ej]).orientation(&points[to_index]) == Orientation::Ccw
            });
            if !is_most_clockwise {
                continue;
            }
            new_edges.push((from_index, to_index));
            if !visited[to_index] {
                queue.push_back(to_index);
            }
        }
        for (from_edge_index, to_edge_index) in new_edges {
            edges.push(Edge::new(points[from_edge_index], points[to_edge_index]));
        }
    }

    Ok(Polygon::from_edges(edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::FastInterval;

    fn v(x: f64, y: f64) -> Vector2<FastInterval> {
        Vector2::new(FastInterval::from_f64(x), FastInterval::from_f64(y))
    }

    #[test]
    fn hull_of_square_plus_interior_point_drops_interior_point() {
        let points = vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0), v(0.5, 0.5)];
        let hull = convex_hull(&points, 0.0).unwrap();
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn hull_deduplicates_coincident_points() {
        let points = vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0), v(0.0, 0.0)];
        let hull = convex_hull(&points, 0.0).unwrap();
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn hull_of_triangle_has_three_edges() {
        let points = vec![v(0.0, 0.0), v(2.0, 0.0), v(1.0, 2.0)];
        let hull = convex_hull(&points, 0.0).unwrap();
        assert_eq!(hull.len(), 3);
    }

    #[test]
    fn hull_contains_every_input_point() {
        let points = vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0), v(2.0, 1.0), v(1.0, 3.0)];
        let hull = convex_hull(&points, 0.0).unwrap();
        for p in &points {
            assert!(!hull.outside(p), "point {:?} should not be provably outside the hull", p);
        }
    }

    #[test]
    fn two_distinct_points_form_a_degenerate_two_edge_hull() {
        // Per spec's resolution of the colinear-input open question: exactly
        // two distinct points (after dedup) is a legitimate input, not an
        // error, and yields a two-edge (forward, reverse) degenerate hull.
        let points = vec![v(0.0, 0.0), v(2.0, 0.0)];
        let hull = convex_hull(&points, 0.0).unwrap();
        assert_eq!(hull.len(), 2);
    }

    #[test]
    fn all_duplicate_points_is_an_error() {
        let points = vec![v(1.0, 1.0), v(1.0, 1.0), v(1.0, 1.0)];
        assert!(matches!(convex_hull(&points, 0.0), Err(HullError::TooFewPoints { .. })));
    }

    #[test]
    fn epsilon_merges_near_duplicate_points_that_are_provably_distinct() {
        // Two points 1e-9 apart are provably distinct (diff == true) but
        // should still merge under a generous epsilon, the way near-coincident
        // rotation-hull points must merge to avoid a spurious near-zero-length
        // edge.
        let points = vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0), v(0.0, 1e-9)];
        let hull = convex_hull(&points, 1e-6).unwrap();
        assert_eq!(hull.len(), 4);
    }
}

//! Box processor: a pure function from one outer 3-box to a terminal
//! certificate, a witnessed non-terminal box, a subdivision, or a residual.
//!
//! Ported from `cpp/src/pipeline/box_processor.hpp`'s `BoxProcessor::process`
//! state machine, decomposed into a pure function rather than a struct with
//! injected queues — the queue plumbing itself lives in `pipeline::mod`
//! (component I), which is the only caller.

use std::collections::VecDeque;

use crate::config::Config;
use crate::error::FatalError;
use crate::geom::{Matrix3, Polygon};
use crate::hull::convex_hull;
use crate::interval::Interval;
use crate::predicate::{projected_vertex_inside_polygon_trivial, projected_vertex_outside_polygon_advanced};
use crate::subdiv::{Box2, Box3, EliminatedBox3};
use crate::transform::{projection_hull_polygon, rotation_hull_polygon};

/// Outcome of processing one outer 3-box.
pub enum BoxOutcome {
    /// Every plug orientation was eliminated by some inner 2-box: `box3` is
    /// terminal; the `EliminatedBox3` is its certificate.
    Eliminated(EliminatedBox3),
    /// A plug orientation was found, at some inner 2-box's midpoint, that
    /// provably passes through the hole shadow — `box3` can never be
    /// eliminated no matter how far it is refined.
    NonTerminal,
    /// The inner iteration budget was exhausted before a full cover or a
    /// witnessed passage; `box3`'s eight children, ready to re-queue.
    Subdivide([Box3; 8]),
    /// A `Range` on `box3` or one of its inner 2-boxes hit the maximum
    /// subdivision depth: neither elimination nor passage could be decided
    /// and the box can be refined no further.
    ///
    /// `cpp/src/pipeline/id.hpp`'s `is_invalid()` makes the same overflow
    /// check but the C++ pipeline then silently drops the box — spec.md
    /// §4.H ("Range-overflow ... is reported as residual") and §9 ("prefer
    /// a tagged sum over sentinel values") both call for reporting it
    /// instead, which this variant does.
    Residual(Box3),
}

enum InnerOutcome {
    Eliminated(Vec<Box2>),
    PassageWitnessed,
    BudgetExhausted,
    Overflow,
}

/// Computes the hole's projected shadow polygon over the whole of `box3`:
/// every hole vertex's projection hull (over `box3`'s θ,φ), each further
/// expanded by the in-plane rotation hull (over `box3`'s α), deduplicated by
/// convex hull.
///
/// Grounded on `box_processor.hpp`'s `get_projected_hole`, which derives a
/// merge tolerance `epsilon = (1/cos(alpha_step) - 1) / 16` from the
/// rotation step width (`alpha_step = alpha.rad() / rotation_resolution`,
/// the same term `transform::rotation_hull_polygon` already scales its own
/// hull points by) before calling `convex_hull`. Without it, near-coincident
/// rotation-hull points can be provably distinct yet closer together than
/// the hull builder's gift-wrap can resolve; `hull_epsilon_factor` replaces
/// the original's hardcoded `/16`.
fn projected_hole<I: Interval>(config: &Config<I>, box3: &Box3) -> Result<Polygon<I>, FatalError> {
    let theta = box3.theta::<I>();
    let phi = box3.phi::<I>();
    let alpha = box3.alpha::<I>();
    let mut points = Vec::new();
    for &vertex in config.hole.vertices() {
        for projected in projection_hull_polygon(vertex, theta, phi, config.projection_resolution) {
            points.extend(rotation_hull_polygon(projected, alpha, config.rotation_resolution));
        }
    }
    let alpha_step = I::from_f64(alpha.rad()) / I::from_i64(config.rotation_resolution as i64);
    let epsilon = (alpha_step.cos().recip() - I::from_i64(1)).max() * config.hull_epsilon_factor;
    Ok(convex_hull(&points, epsilon)?)
}

/// Does some symmetry of the polyhedron map `box3`'s representative
/// orientation within `epsilon` of `rectangle`'s — i.e. is `rectangle`
/// equivalent, up to the polyhedron's own symmetry, to an orientation
/// already implied by `box3` itself?
///
/// Grounded on spec.md §4.H step 3.a's stated contract
/// ("`Matrix.cos_angle_between` against the polyhedron's symmetry set");
/// `original_source`'s `box_processor.hpp` does not itself wire the
/// symmetry group into the inner loop (`geometry.hpp`'s `symmetries()` is a
/// freestanding building block there), so the wiring below is this crate's
/// own reading of that shortcut's description.
fn symmetry_skips<I: Interval>(box3: &Box3, rectangle: &Box2, symmetries: &[Matrix3<I>], epsilon: f64) -> bool {
    let box_orientation = Matrix3::orientation(I::from_f64(box3.theta::<I>().mid()), I::from_f64(box3.phi::<I>().mid()));
    let rectangle_orientation = Matrix3::orientation(
        I::from_f64(rectangle.theta::<I>().mid()),
        I::from_f64(rectangle.phi::<I>().mid()),
    );
    let threshold = I::from_f64(1.0 - epsilon);
    symmetries.iter().any(|g| {
        let mapped = (*g) * rectangle_orientation;
        Matrix3::cos_angle_between(&box_orientation, &mapped).gt(&threshold)
    })
}

/// Steps 2-5 of spec.md §4.H: the inner 2-box subdivision against the
/// precomputed hole shadow.
fn inner_loop<I: Interval>(
    config: &Config<I>,
    box3: &Box3,
    hole_shadow: &Polygon<I>,
    symmetries: &[Matrix3<I>],
) -> InnerOutcome {
    let mut queue: VecDeque<Box2> = VecDeque::new();
    queue.push_back(Box2::root());
    let mut eliminated = Vec::new();
    let mut iterations: u32 = 0;

    loop {
        if config.rectangle_iteration_limit != 0 && iterations >= config.rectangle_iteration_limit {
            return InnerOutcome::BudgetExhausted;
        }
        let Some(rectangle) = queue.pop_front() else {
            return InnerOutcome::Eliminated(eliminated);
        };
        iterations += 1;

        if rectangle.is_overflow() {
            return InnerOutcome::Overflow;
        }
        if config.symmetry_skip && symmetry_skips(box3, &rectangle, symmetries, config.symmetry_epsilon) {
            continue;
        }

        let theta = rectangle.theta::<I>();
        let phi = rectangle.phi::<I>();
        let is_eliminated = config
            .plug
            .vertices()
            .iter()
            .any(|&vertex| projected_vertex_outside_polygon_advanced(hole_shadow, vertex, theta, phi));
        if is_eliminated {
            eliminated.push(rectangle);
            continue;
        }

        let theta_mid = I::from_f64(theta.mid());
        let phi_mid = I::from_f64(phi.mid());
        let passage_witnessed = config
            .plug
            .vertices()
            .iter()
            .all(|&vertex| projected_vertex_inside_polygon_trivial(hole_shadow, vertex, theta_mid, phi_mid));
        if passage_witnessed {
            return InnerOutcome::PassageWitnessed;
        }

        queue.extend(rectangle.parts());
    }
}

/// Processes one outer 3-box per spec.md §4.H. `symmetries` is the
/// polyhedron's rotation/reflection group (pass `&[]` when
/// `config.symmetry_skip` is `false`, since it is never looked at in that
/// case).
pub fn process_box3<I: Interval>(config: &Config<I>, box3: Box3, symmetries: &[Matrix3<I>]) -> Result<BoxOutcome, FatalError> {
    if box3.is_overflow() {
        return Ok(BoxOutcome::Residual(box3));
    }
    let hole_shadow = projected_hole(config, &box3)?;
    Ok(match inner_loop(config, &box3, &hole_shadow, symmetries) {
        InnerOutcome::Eliminated(eliminated) => BoxOutcome::Eliminated(EliminatedBox3 { box3, eliminated }),
        InnerOutcome::PassageWitnessed => BoxOutcome::NonTerminal,
        InnerOutcome::BudgetExhausted => BoxOutcome::Subdivide(box3.parts()),
        InnerOutcome::Overflow => BoxOutcome::Residual(box3),
    })
}

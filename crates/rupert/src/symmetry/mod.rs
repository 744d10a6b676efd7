//! A polyhedron's rotation/reflection symmetry group, and the central-symmetry
//! test used by the box processor's optional elimination shortcut.
//!
//! Ported from `cpp/src/geometry/geometry.hpp`'s `is_centrally_symmetric`,
//! `orthonormal_basis`, and `symmetries`. Supplemented (spec.md §1.5): the
//! distilled specification names the symmetry-skip as an optional shortcut
//! (§4.H step 3.a) without specifying how the symmetry group itself is
//! computed; that construction is carried over from `original_source` in
//! full since the box processor's shortcut is meaningless without it.

use crate::geom::{Matrix3, Vector3};
use crate::interval::Interval;

/// `true` only when every vertex provably has an antipodal partner among the
/// others.
pub fn is_centrally_symmetric<I: Interval>(vertices: &[Vector3<I>]) -> bool {
    vertices
        .iter()
        .all(|v| vertices.iter().any(|other| !v.diff(&-*other)))
}

/// An orthonormal frame with `from.unit()` as its first axis and the
/// component of `to` perpendicular to it as its second.
///
/// `original_source`'s literal formula subtracts `from * to.dot(x_axis)`
/// rather than `x_axis * to.dot(x_axis)` from `to` before normalizing —
/// dimensionally inconsistent whenever `from` isn't already unit length (the
/// two differ by a factor of `|from|`), which would make `y_axis` not
/// actually orthogonal to `x_axis` for the general vertex vectors this is
/// called with. Corrected to the standard Gram-Schmidt projection here;
/// every downstream use (`symmetries`, `relative_rotation`) assumes a
/// genuinely orthonormal frame.
pub fn orthonormal_basis<I: Interval>(from: Vector3<I>, to: Vector3<I>, right_handed: bool) -> Matrix3<I> {
    let x_axis = from.unit();
    let to_perp = to - x_axis.scale(to.dot(&x_axis));
    let y_axis = to_perp.unit();
    let z_axis = if right_handed {
        x_axis.cross(&y_axis).unit()
    } else {
        y_axis.cross(&x_axis).unit()
    };
    Matrix3::new([
        [x_axis.x, y_axis.x, z_axis.x],
        [x_axis.y, y_axis.y, z_axis.y],
        [x_axis.z, y_axis.z, z_axis.z],
    ])
}

/// The polyhedron's rotation (and, if `right_handed` is `false`, reflection)
/// symmetry group: every orthogonal transform that maps the vertex set onto
/// itself.
///
/// Picks a reference pair `(from, to)` of vertices with `from` not provably
/// antipodal to `to` (so their basis is well-defined), then tries every
/// ordered pair of vertices at the same mutual distance as a candidate image
/// of that pair, accepting the candidate transform only when it provably
/// maps every vertex onto some vertex of the set.
pub fn symmetries<I: Interval>(vertices: &[Vector3<I>], right_handed: bool) -> Vec<Matrix3<I>> {
    let from = vertices[0];
    let to = if from.diff(&-vertices[1]) { vertices[1] } else { vertices[2] };
    let basis = orthonormal_basis(from, to, true);
    let reference_distance = (from - to).length();

    let mut found = Vec::with_capacity(vertices.len() * vertices.len());
    for &from_image in vertices {
        for &to_image in vertices {
            if ((from_image - to_image).length() - reference_distance).is_nonzero() {
                continue;
            }
            let image_basis = orthonormal_basis(from_image, to_image, right_handed);
            let symmetry = Matrix3::relative_rotation(&basis, &image_basis);
            let is_symmetry = vertices.iter().all(|&vertex| {
                let image = symmetry.apply(&vertex);
                vertices.iter().any(|&other| !image.diff(&other))
            });
            if is_symmetry {
                found.push(symmetry);
            }
        }
    }
    found
}

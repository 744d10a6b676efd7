//! `Polyhedron<I>`: a convex solid's vertex set. The hull itself is implicit;
//! every downstream consumer (the box processor, the symmetry module) reads
//! only the vertex list.
//!
//! Ported from `cpp/src/geometry/polyhedron.hpp`'s storage shape. That file's
//! sibling trees in `original_source` (`src/polyhedron.hpp`,
//! `src_old/polyhedron.hpp`) additionally hard-code a catalog of named solids
//! (`cube`, `octahedron`, `dodecahedron`, ...) via rotation/flip generators;
//! the distilled specification scopes hole/plug input as parsed vertex sets,
//! not a built-in catalog, so that generator machinery is left out here.

use super::Vector3;
use crate::interval::Interval;

#[derive(Clone, Debug)]
pub struct Polyhedron<I: Interval> {
    vertices: Vec<Vector3<I>>,
}

impl<I: Interval> Polyhedron<I> {
    pub fn new(vertices: Vec<Vector3<I>>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector3<I>] {
        &self.vertices
    }
}

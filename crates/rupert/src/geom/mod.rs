//! Interval-valued vector, matrix, edge and polygon algebra.
//!
//! Ported from `cpp/src/geometry/{vector2,vector3,matrix,edge,polygon}.hpp`.
//! Generic over any `Interval` backend rather than over `nalgebra::Scalar`:
//! nalgebra's `Scalar`/`ClosedAdd`/`PartialOrd` bounds assume a total order
//! and a single "the" value, neither of which a three-valued NaN-propagating
//! interval type can honestly provide, so these types are hand-rolled here
//! the way `geom2::types` hand-rolls `Hs2`/`Affine2` above plain `nalgebra`
//! primitives.

mod edge;
mod matrix;
mod polygon;
mod polyhedron;
mod vector;

pub use edge::{Edge, Orientation};
pub use matrix::Matrix3;
pub use polygon::Polygon;
pub use polyhedron::Polyhedron;
pub use vector::{Vector2, Vector3};

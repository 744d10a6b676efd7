//! Dyadic subdivision index and the 2-box / 3-box product types.
//!
//! Ported from `cpp/src/pipeline/{range,box}.hpp`.

mod box2;
mod box3;
mod range;

pub use box2::Box2;
pub use box3::{Box3, EliminatedBox3};
pub use range::{Range, D_MAX};

//! Rigorous branch-and-bound search for a "Rupert pass" orientation: is
//! there a rotation of a convex polyhedron, and an orientation of a
//! congruent hole cut through another copy of it, that lets the polyhedron
//! pass through the hole?
//!
//! Ported from `original_source/cpp` (see `DESIGN.md` for the grounding
//! ledger, module by module).

pub mod config;
pub mod error;
pub mod geom;
pub mod hull;
pub mod interval;
pub mod io;
pub mod pipeline;
pub mod predicate;
pub mod queue;
pub mod subdiv;
pub mod symmetry;
pub mod transform;

pub use config::Config;
pub use error::{ConfigError, FatalError, HullError, IoError, KernelError};
pub use pipeline::{run, ExitCode, Pipeline};

//! Run configuration: the hole/plug vertex sets, resolution and budget
//! parameters, and output locations.
//!
//! Ported from `cpp/src/pipeline/config.hpp` (field set and `path()`
//! derivation) and `cpp/src/global_solver/config.hpp` (`validate()`'s
//! checks, adapted to this crate's field names).

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::geom::Polyhedron;
use crate::interval::Interval;

/// Everything one run of the pipeline needs to know.
pub struct Config<I: Interval> {
    /// Short run name; also used verbatim in output filenames.
    pub description: String,
    pub hole: Polyhedron<I>,
    pub plug: Polyhedron<I>,
    pub thread_count: u8,
    /// `0` means unlimited.
    pub box_iteration_limit: u32,
    /// `0` means unlimited.
    pub rectangle_iteration_limit: u32,
    pub projection_resolution: u32,
    pub rotation_resolution: u32,
    pub export_size_threshold: usize,
    pub directory: PathBuf,
    /// The hole/plug vertex header, written once per run (truncating).
    pub polyhedra_filename: String,
    /// The append-only elimination certificate log.
    pub terminal_boxes_filename: String,
    /// The outer box queue's checkpoint: truncated and rewritten with the
    /// full pending set on every export, and the importer's restart source.
    pub boxes_filename: String,
    /// Enables the symmetry-skip shortcut in the box processor (spec.md
    /// §4.H step 3.a); off by default since it is explicitly optional and
    /// the angular-distance budget it relies on is easy to set too loose.
    pub symmetry_skip: bool,
    /// Angular-distance budget (as `1 - cos(angle)`) for the symmetry-skip
    /// shortcut; unused unless `symmetry_skip` is set.
    pub symmetry_epsilon: f64,
    /// Divisor applied to the hole-shadow hull's merge tolerance (spec.md
    /// §4.H step 1: `epsilon = (1/cos(alpha.rad/rotation_resolution) - 1) *
    /// hull_epsilon_factor`). The run's actual value is recorded in the
    /// polyhedra header so a certificate log can be checked against the
    /// tolerance it was produced under.
    pub hull_epsilon_factor: f64,
}

impl<I: Interval> Config<I> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projection_resolution < 1 {
            return Err(ConfigError::InvalidResolution { field: "projection_resolution" });
        }
        if self.rotation_resolution < 1 {
            return Err(ConfigError::InvalidResolution { field: "rotation_resolution" });
        }
        if self.thread_count < 1 {
            return Err(ConfigError::InvalidThreadCount);
        }
        if !self.description.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') || self.description.is_empty() {
            return Err(ConfigError::InvalidDescription { description: self.description.clone() });
        }
        if !self.directory.is_dir() {
            return Err(ConfigError::InvalidDirectory { path: self.directory.clone() });
        }
        Ok(())
    }

    fn path(&self, suffix: &str) -> PathBuf {
        self.directory.join(format!("{}_{}", self.description, suffix))
    }

    pub fn polyhedra_path(&self) -> PathBuf {
        self.path(&self.polyhedra_filename)
    }

    pub fn terminal_boxes_path(&self) -> PathBuf {
        self.path(&self.terminal_boxes_filename)
    }

    /// Doubles as the checkpoint: the pending outer box queue, rewritten
    /// wholesale on every export and read back by [`Pipeline::new`] on
    /// restart.
    pub fn boxes_path(&self) -> PathBuf {
        self.path(&self.boxes_filename)
    }
}

/// Builder-style defaults for the fields that aren't intrinsic to the
/// polyhedra under test.
impl<I: Interval> Config<I> {
    pub fn new(description: impl Into<String>, hole: Polyhedron<I>, plug: Polyhedron<I>, directory: impl AsRef<Path>) -> Self {
        Self {
            description: description.into(),
            hole,
            plug,
            thread_count: 1,
            box_iteration_limit: 0,
            rectangle_iteration_limit: 0,
            projection_resolution: 1,
            rotation_resolution: 1,
            export_size_threshold: 1024,
            directory: directory.as_ref().to_path_buf(),
            polyhedra_filename: "polyhedra.bin".to_string(),
            terminal_boxes_filename: "terminal_boxes.bin".to_string(),
            boxes_filename: "boxes.bin".to_string(),
            symmetry_skip: false,
            symmetry_epsilon: 1e-6,
            hull_epsilon_factor: 1.0 / 16.0,
        }
    }
}

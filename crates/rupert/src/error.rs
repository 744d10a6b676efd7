//! Error taxonomy.
//!
//! Plain enums with hand-written `Display` impls, no `thiserror` — mirrors
//! `geom4::volume::VolumeError`. `rupert-cli` wraps these in `anyhow` at its
//! boundary; the library itself never depends on `anyhow`.

use std::fmt;

/// Errors from the interval kernel (component A).
#[derive(Debug)]
pub enum KernelError {
    /// Two `ArbInterval` operands were built at different working
    /// precisions; this is always a caller bug, never a data problem.
    PrecisionMismatch { expected: u32, found: u32 },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::PrecisionMismatch { expected, found } => write!(
                f,
                "interval operands have mismatched precision: expected {expected} bits, found {found} bits"
            ),
        }
    }
}

impl std::error::Error for KernelError {}

/// Errors from the gift-wrap convex hull builder (component F).
#[derive(Debug)]
pub enum HullError {
    /// Fewer than three points after dedup: no polygon to build.
    TooFewPoints { count: usize },
    /// Gift-wrap made no progress (an edge closed back on a vertex already
    /// on the hull without enclosing all remaining points).
    NoProgress,
}

impl fmt::Display for HullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HullError::TooFewPoints { count } => {
                write!(f, "convex hull needs at least 3 distinct points, got {count}")
            }
            HullError::NoProgress => write!(f, "gift-wrap hull made no progress (degenerate input)"),
        }
    }
}

impl std::error::Error for HullError {}

/// Errors from the binary log reader/writer (component J).
#[derive(Debug)]
pub enum IoError {
    Io(std::io::Error),
    /// A checkpoint file ended mid-record: an earlier run was killed
    /// between a record's length prefix and its payload.
    TornCheckpoint { path: std::path::PathBuf },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Io(e) => write!(f, "i/o error: {e}"),
            IoError::TornCheckpoint { path } => {
                write!(f, "checkpoint {} ends mid-record", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e)
    }
}

/// Errors from validating a run [`crate::Config`].
#[derive(Debug)]
pub enum ConfigError {
    /// `projection_resolution` or `rotation_resolution` was zero.
    InvalidResolution { field: &'static str },
    /// `thread_count` was zero.
    InvalidThreadCount,
    /// `description` contains a character other than letters, digits, or
    /// underscore — it is used verbatim as part of output filenames.
    InvalidDescription { description: String },
    /// `directory` does not exist or is not a directory.
    InvalidDirectory { path: std::path::PathBuf },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResolution { field } => write!(f, "{field} must be at least 1"),
            ConfigError::InvalidThreadCount => write!(f, "thread_count must be at least 1"),
            ConfigError::InvalidDescription { description } => write!(
                f,
                "{description:?} is not a valid run description (only letters, digits, and underscores are allowed)"
            ),
            ConfigError::InvalidDirectory { path } => {
                write!(f, "{} does not exist or is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Escalation sum type for spec's fatal error categories 3-5: hull
/// construction failure, arbitrary-precision operand mismatch, and I/O
/// failure. Range-depth exhaustion and kernel NaN (categories 1-2) are
/// recoverable locally (residual / subdivide) and never reach here; an
/// external stop request (category 6) is cooperative, not an error.
#[derive(Debug)]
pub enum FatalError {
    Kernel(KernelError),
    Hull(HullError),
    Io(IoError),
    Config(ConfigError),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::Kernel(e) => write!(f, "{e}"),
            FatalError::Hull(e) => write!(f, "{e}"),
            FatalError::Io(e) => write!(f, "{e}"),
            FatalError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FatalError {}

impl From<KernelError> for FatalError {
    fn from(e: KernelError) -> Self {
        FatalError::Kernel(e)
    }
}
impl From<HullError> for FatalError {
    fn from(e: HullError) -> Self {
        FatalError::Hull(e)
    }
}
impl From<IoError> for FatalError {
    fn from(e: IoError) -> Self {
        FatalError::Io(e)
    }
}
impl From<ConfigError> for FatalError {
    fn from(e: ConfigError) -> Self {
        FatalError::Config(e)
    }
}

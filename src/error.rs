use thiserror::Error;

/// Enum with all errors in this crate.
///
/// Every variant is raised at construction time; queries never fail, they
/// return empty result sets instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointIndexError {
    /// Trees cannot be built over zero points.
    #[error("cannot build an index over an empty point set")]
    EmptyPointSet,

    /// The k-d tree requires leaves to hold at least one point.
    #[error("max leaf size must be at least 1, got {0}")]
    InvalidLeafSize(usize),

    /// The cover tree base must expand per level.
    #[error("cover tree base must be greater than 1, got {0}")]
    InvalidBase(f64),

    /// A coordinate buffer does not match its declared dimension.
    #[error("coordinate buffer of length {len} is not a multiple of dimension {dim}")]
    DimensionMismatch {
        /// The declared spatial dimension.
        dim: usize,
        /// The observed buffer length.
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, PointIndexError>;

use std::{error::Error as StdError, fmt, result::Result as StdResult};

/// Geometry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A split point lies beyond the extent being split.
    SplitOutOfRange {
        /// Requested split length.
        at: u32,
        /// Extent along the split axis.
        extent: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitOutOfRange { at, extent } => {
                write!(f, "split at {at} exceeds extent {extent}")
            }
        }
    }
}

impl StdError for Error {}

/// Result alias for geometry operations.
pub type Result<T> = StdResult<T, Error>;

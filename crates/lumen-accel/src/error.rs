//! Error types for acceleration structure construction.

use thiserror::Error;

/// Errors that can occur while building acceleration structures.
///
/// Queries never fail; only construction and configuration do.
#[derive(Error, Debug)]
pub enum AccelError {
    /// No primitives were supplied to a builder.
    #[error("cannot build a BVH from an empty primitive list")]
    EmptyPrimitives,

    /// More primitives than flat node indices can address.
    #[error("{len} primitives exceed the limit of {max}")]
    TooManyPrimitives {
        /// Number of primitives supplied.
        len: usize,
        /// Largest accepted count.
        max: usize,
    },

    /// A build span does not select any primitives.
    #[error("invalid primitive span [{start}, {end}) over {len} primitives")]
    InvalidSpan {
        /// First index of the span.
        start: usize,
        /// One past the last index of the span.
        end: usize,
        /// Number of primitives available.
        len: usize,
    },

    /// An instance transform has no inverse.
    #[error("instance transform is singular")]
    SingularTransform,

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for acceleration structure operations.
pub type Result<T> = std::result::Result<T, AccelError>;

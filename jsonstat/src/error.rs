//! FILENAME: jsonstat/src/error.rs

use thiserror::Error;

/// Errors produced while decoding a raw JSON-stat payload into a cube.
///
/// Decode errors are recoverable: callers collapse them into the "no data"
/// placeholder state instead of letting them reach the render path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("payload is not a JSON-stat response")]
    NotJsonStat,

    #[error("unsupported response class: {0}")]
    UnsupportedClass(String),

    #[error("dataset declares no dimension ids")]
    MissingDimensionIds,

    #[error("dataset declares no size list")]
    MissingSizes,

    #[error("{ids} dimension ids do not match {sizes} size entries")]
    DimensionCountMismatch { ids: usize, sizes: usize },

    #[error("dimension {0:?} is missing from the dimension block")]
    MissingDimension(String),

    #[error("dimension {0:?} is malformed")]
    BadDimension(String),

    #[error("dimension {0:?} has no category block")]
    MissingCategory(String),

    #[error("sparse offset {0:?} is not a valid cube offset")]
    BadSparseOffset(String),

    #[error("dimension {id:?}: category index is not a bijection onto 0..{size}")]
    BadCategoryIndex { id: String, size: usize },

    #[error("value length {got} does not match cube size {want}")]
    ValueLengthMismatch { got: usize, want: usize },

    #[error("status length {got} does not match cube size {want}")]
    StatusLengthMismatch { got: usize, want: usize },
}

/// Errors produced when addressing the flat value array.
///
/// Always names the dimension and the offending key; addressing never
/// silently clamps out-of-range input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("unknown dimension id {0:?}")]
    UnknownDimension(String),

    #[error("dimension {dimension:?}: unknown category code {code:?}")]
    UnknownCode { dimension: String, code: String },

    #[error("dimension {dimension:?}: ordinal {index} out of range 0..{size}")]
    OrdinalOutOfRange {
        dimension: String,
        index: usize,
        size: usize,
    },

    #[error("expected {expected} coordinates, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("a slice must leave exactly one dimension free, {0} were left unspecified")]
    FreeDimensions(usize),

    #[error("dimension {0:?} appears more than once in the projection order")]
    DuplicateDimension(String),

    #[error("offset {offset} out of range for cube of {len} values")]
    OffsetOutOfRange { offset: usize, len: usize },
}

//! FILENAME: jsonstat/src/lib.rs
//! PURPOSE: JSON-stat decoding and N-dimensional cube addressing.
//! CONTEXT: Turns `{dimension, size, value}` payloads into immutable,
//! addressable datasets. The chart pivot engine and the fetch client build
//! on this crate; chart semantics live there, not here.

pub mod addressing;
pub mod dataset;
pub mod dimension;
pub mod error;
mod raw;

// Re-export commonly used types at the crate root
pub use addressing::{DimensionKey, IndexTuple, SliceEntry, TableProjection, TableRow};
pub use dataset::{decode, decode_dataset, Collection, CollectionItem, Dataset, JsonStatResponse};
pub use dimension::{CategoryUnit, Dimension, DimensionRole};
pub use error::{AddressError, DecodeError};

//! FILENAME: chartdata/src/error.rs

use thiserror::Error;

use jsonstat::AddressError;

/// Errors a pivot can produce. All of them collapse to the same
/// "no information to display" placeholder at the chart boundary; none may
/// crash the render path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    /// Every value in the cube is null, or the selection matches nothing.
    #[error("no information to display")]
    NoData,

    #[error("dataset has no {0} dimension")]
    MissingDimension(&'static str),

    #[error(transparent)]
    Address(#[from] AddressError),
}

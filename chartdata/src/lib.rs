//! FILENAME: chartdata/src/lib.rs
//! Chart data subsystem for the energy-price statistics viewer.
//!
//! This crate reshapes decoded JSON-stat cubes into renderer-agnostic
//! chart structures. It depends on `jsonstat` only for the cube and its
//! addressing; no chart painting happens here.
//!
//! Layers:
//! - `definition`: Serializable selection state (what the user ASKED for)
//! - `engine`: Pivot calculator (HOW a cube becomes categories + series)
//! - `decompose`: Tax residual arithmetic
//! - `ordering`: Category ordering modes
//! - `view`: Renderable output (WHAT a chart surface consumes)

pub mod decompose;
pub mod definition;
pub mod engine;
pub mod error;
pub mod ordering;
pub mod view;

pub use decompose::{round_to, split_tax_slice, TaxSplit};
pub use definition::{
    ChartKind, ChartMode, EnergyUnit, OrderMode, Selection, ALL_GEOS, BAND_DIMENSION,
    COMPONENT_DIMENSION, GEO_DIMENSION, TAX_DIMENSION, TIME_DIMENSION,
};
pub use engine::{calculate_chart, ChartPivot};
pub use error::PivotError;
pub use ordering::{apply_order, PROTOCOL_ORDER};
pub use view::{
    assign_series_colors, ChartOutput, ChartView, PieSlice, PieView, Series, SERIES_PALETTE,
};

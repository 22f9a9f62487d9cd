//! FILENAME: chartdata/src/view.rs
//! Chart view - renderer-agnostic output of the pivot engine.
//!
//! Every charting adapter consumes exactly these structures; nothing here
//! knows how a bar or a slice is painted. The one invariant that matters:
//! all series in a view carry `data` index-aligned 1:1 with `categories`.

use serde::{Deserialize, Serialize};

use jsonstat::TableProjection;

/// Fixed series palette. Colors are assigned by series position so the
/// same breakdown keeps the same color across chart modes.
pub const SERIES_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc949", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// One legend entry and its per-category values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,

    /// Index-aligned with the owning view's `categories`; `None` renders
    /// as a gap, not as zero.
    pub data: Vec<Option<f64>>,

    pub color: Option<String>,
}

/// Categories plus series, ready for a bar/line surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    /// X-axis labels, order-significant.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartView {
    /// Checks the alignment invariant; pivot tests assert this on every
    /// produced view.
    pub fn is_aligned(&self) -> bool {
        self.series
            .iter()
            .all(|s| s.data.len() == self.categories.len())
    }
}

/// One pie slice: `[label, value]` in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
}

/// Pie output: strictly positive slices, outer slice first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieView {
    pub slices: Vec<PieSlice>,
}

/// Everything `ChartPivot::calculate` can produce.
#[derive(Debug, Clone, Serialize)]
pub enum ChartOutput {
    Chart(ChartView),
    Pie(PieView),
    Table(TableProjection),
}

/// Assigns palette colors to series by position.
pub fn assign_series_colors(series: &mut [Series]) {
    for (i, series) in series.iter_mut().enumerate() {
        series.color = Some(SERIES_PALETTE[i % SERIES_PALETTE.len()].to_string());
    }
}

//! FILENAME: chartdata/src/definition.rs
//! Chart selection - the serializable user state the engine pivots by.
//!
//! A `Selection` is an immutable snapshot of what the user asked for. It is
//! sent over the UI bridge as-is; changing it never mutates a decoded cube,
//! it either triggers a pure re-pivot or a new fetch.

use serde::{Deserialize, Serialize};

/// Pseudo-aggregate geography code meaning "every reporting country".
pub const ALL_GEOS: &str = "all";

/// Dimension ids used by this dataset family.
pub const GEO_DIMENSION: &str = "geo";
pub const TIME_DIMENSION: &str = "time";
/// Tax breakdown (`component == false`).
pub const TAX_DIMENSION: &str = "tax";
/// Price-component breakdown (`component == true`).
pub const COMPONENT_DIMENSION: &str = "nrg_prc";
/// Consumption-band dimension, full cardinality only in drill-down cubes.
pub const BAND_DIMENSION: &str = "nrg_cons";

// ============================================================================
// ORDERING AND CHART MODES
// ============================================================================

/// How pivoted categories are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    /// Source order, with country codes rearranged to the protocol list.
    Proto,
    /// Case- and punctuation-insensitive label order.
    Alfa,
    Asc,
    Desc,
}

impl Default for OrderMode {
    fn default() -> Self {
        OrderMode::Proto
    }
}

/// The chart surface the caller is about to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Table,
}

/// Pivot mode, selected by the detail flag and chart kind — never by the
/// cube's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartMode {
    CountryComparison,
    DetailBreakdown,
    PieSinglePeriod,
    TimeSeries,
    Table,
}

impl ChartMode {
    pub fn select(detail: bool, kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar if detail => ChartMode::DetailBreakdown,
            ChartKind::Bar => ChartMode::CountryComparison,
            ChartKind::Pie => ChartMode::PieSinglePeriod,
            ChartKind::Line => ChartMode::TimeSeries,
            ChartKind::Table => ChartMode::Table,
        }
    }
}

// ============================================================================
// UNITS
// ============================================================================

/// Energy unit the prices are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    Kwh,
    Mwh,
    Gj,
}

impl EnergyUnit {
    /// Rounding applied to pivoted values: whole units for MWh prices,
    /// four places otherwise.
    pub fn decimals(self) -> u8 {
        match self {
            EnergyUnit::Mwh => 0,
            _ => 4,
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// The complete user selection driving one pivot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Geography codes in display order; may contain aggregate codes
    /// (`EU27_2020`, `EA`) and the pseudo-aggregate `all`.
    pub geos: Vec<String>,

    /// Time period code, e.g. `"2024"`.
    pub time: String,

    /// true = price-component breakdown, false = tax breakdown.
    pub component: bool,

    /// true = one series per breakdown category, false = one aggregated
    /// value per geography.
    pub detail: bool,

    /// Percent stacking is a render-time normalization; the engine always
    /// supplies raw values.
    pub percentage: bool,

    /// Table display precision (1-4).
    pub decimals: u8,

    pub order: OrderMode,

    pub unit: EnergyUnit,

    /// Currency/unit conversion applied before rounding.
    pub factor: f64,
}

impl Selection {
    /// A selection with the defaults the UI starts from.
    pub fn new(time: impl Into<String>) -> Self {
        Selection {
            geos: vec![ALL_GEOS.to_string()],
            time: time.into(),
            component: false,
            detail: false,
            percentage: false,
            decimals: 2,
            order: OrderMode::Proto,
            unit: EnergyUnit::Kwh,
            factor: 1.0,
        }
    }

    /// Rounding for pivoted values, derived from the unit.
    pub fn dec(&self) -> u8 {
        self.unit.decimals()
    }

    /// Dimension id of the active breakdown.
    pub fn breakdown_dimension(&self) -> &'static str {
        if self.component {
            COMPONENT_DIMENSION
        } else {
            TAX_DIMENSION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_detail_flag_and_chart_kind() {
        assert_eq!(ChartMode::select(false, ChartKind::Bar), ChartMode::CountryComparison);
        assert_eq!(ChartMode::select(true, ChartKind::Bar), ChartMode::DetailBreakdown);
        assert_eq!(ChartMode::select(true, ChartKind::Pie), ChartMode::PieSinglePeriod);
        assert_eq!(ChartMode::select(false, ChartKind::Line), ChartMode::TimeSeries);
    }

    #[test]
    fn mwh_prices_round_to_whole_units() {
        assert_eq!(EnergyUnit::Mwh.decimals(), 0);
        assert_eq!(EnergyUnit::Kwh.decimals(), 4);
        assert_eq!(EnergyUnit::Gj.decimals(), 4);
    }

    #[test]
    fn order_mode_serializes_to_the_wire_parameter_strings() {
        assert_eq!(serde_json::to_string(&OrderMode::Proto).unwrap(), "\"proto\"");
        assert_eq!(serde_json::to_string(&OrderMode::Alfa).unwrap(), "\"alfa\"");
        assert_eq!(serde_json::to_string(&OrderMode::Desc).unwrap(), "\"desc\"");
    }
}

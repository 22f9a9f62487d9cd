//! FILENAME: chartdata/src/engine.rs
//! Chart pivot engine - reshapes a decoded cube by the user selection.
//!
//! One pivot per chart mode. Every mode:
//! 1. Guards against the all-null cube ("no data" instead of pivoting)
//! 2. Pulls wildcard slices along one dimension, all others fixed
//! 3. Scales by the selection's factor and rounds to the unit's decimals
//! 4. Applies the ordering mode to categories and series in lock-step
//!
//! The engine holds only borrows; nothing in here is shared mutable state
//! between pivots.

use smallvec::SmallVec;

use jsonstat::{Dataset, Dimension, DimensionKey, DimensionRole, TableProjection};

use crate::decompose::{
    round_to, split_tax_slice, EXCISE_LABEL, NETWORK_LABEL, VAT_LABEL,
};
use crate::definition::{
    ChartKind, ChartMode, Selection, ALL_GEOS, BAND_DIMENSION, GEO_DIMENSION, TIME_DIMENSION,
};
use crate::error::PivotError;
use crate::ordering::apply_order;
use crate::view::{
    assign_series_colors, ChartOutput, ChartView, PieSlice, PieView, Series, SERIES_PALETTE,
};

/// The pivot calculator for one (dataset, selection) pair.
pub struct ChartPivot<'a> {
    dataset: &'a Dataset,
    selection: &'a Selection,
}

/// Convenience entry point: one call per user interaction.
pub fn calculate_chart(
    dataset: &Dataset,
    selection: &Selection,
    kind: ChartKind,
) -> Result<ChartOutput, PivotError> {
    ChartPivot::new(dataset, selection).calculate(kind)
}

impl<'a> ChartPivot<'a> {
    pub fn new(dataset: &'a Dataset, selection: &'a Selection) -> Self {
        ChartPivot { dataset, selection }
    }

    /// Dispatches on the mode selected by (detail flag, chart kind).
    pub fn calculate(&self, kind: ChartKind) -> Result<ChartOutput, PivotError> {
        self.guard_data()?;
        match ChartMode::select(self.selection.detail, kind) {
            ChartMode::CountryComparison => self.country_comparison().map(ChartOutput::Chart),
            ChartMode::DetailBreakdown => self.detail_breakdown().map(ChartOutput::Chart),
            ChartMode::PieSinglePeriod => self.pie_single_period().map(ChartOutput::Pie),
            ChartMode::TimeSeries => self.time_series().map(ChartOutput::Chart),
            ChartMode::Table => self.table().map(ChartOutput::Table),
        }
    }

    // ========================================================================
    // CHART MODES
    // ========================================================================

    /// One aggregated value per geography for the fixed time period.
    pub fn country_comparison(&self) -> Result<ChartView, PivotError> {
        self.guard_data()?;
        let breakdown = self.breakdown_dim()?;
        let geos = self.resolve_geos()?;

        let selection = self.selection;
        let dec = selection.dec();
        let mut codes = Vec::with_capacity(geos.len());
        let mut labels = Vec::with_capacity(geos.len());
        let mut data = Vec::with_capacity(geos.len());

        for (code, label) in geos {
            let slice = self.breakdown_slice(code, &selection.time, None, breakdown)?;
            let value = if selection.component {
                sum_components(&slice)
            } else {
                slice.first().and_then(|e| e.value)
            };
            data.push(value.map(|v| round_to(v * selection.factor, dec)));
            codes.push(code.to_string());
            labels.push(label.to_string());
        }

        let mut series = vec![Series {
            name: selection.time.clone(),
            data,
            color: None,
        }];
        apply_order(selection.order, &mut codes, &mut labels, &mut series, true);
        assign_series_colors(&mut series);
        Ok(ChartView {
            categories: labels,
            series,
        })
    }

    /// One series per breakdown category, geographies on the x-axis. In
    /// tax mode the three raw categories become the decomposed
    /// {network residual, excise, VAT} series.
    pub fn detail_breakdown(&self) -> Result<ChartView, PivotError> {
        self.guard_data()?;
        let breakdown = self.breakdown_dim()?;
        let geos = self.resolve_geos()?;

        let selection = self.selection;
        let dec = selection.dec();
        let mut codes = Vec::with_capacity(geos.len());
        let mut labels = Vec::with_capacity(geos.len());
        let mut series = self.breakdown_series(breakdown, geos.len());

        for (code, label) in geos {
            let slice = self.breakdown_slice(code, &selection.time, None, breakdown)?;
            if selection.component {
                for (k, entry) in slice.iter().enumerate() {
                    series[k]
                        .data
                        .push(entry.value.map(|v| round_to(v * selection.factor, dec)));
                }
            } else {
                push_split(&mut series, &slice, selection.factor, dec);
            }
            codes.push(code.to_string());
            labels.push(label.to_string());
        }

        apply_order(selection.order, &mut codes, &mut labels, &mut series, false);
        assign_series_colors(&mut series);
        Ok(ChartView {
            categories: labels,
            series,
        })
    }

    /// Breakdown of a single geography and period as `[label, value]`
    /// slices: strictly positive values only, reversed for draw order.
    pub fn pie_single_period(&self) -> Result<PieView, PivotError> {
        self.guard_data()?;
        let breakdown = self.breakdown_dim()?;
        let geos = self.resolve_geos()?;
        let (code, _) = *geos.first().ok_or(PivotError::NoData)?;

        let selection = self.selection;
        let dec = selection.dec();
        let slice = self.breakdown_slice(code, &selection.time, None, breakdown)?;

        let pairs: Vec<(String, Option<f64>)> = if selection.component {
            slice
                .iter()
                .map(|e| {
                    (
                        e.label.clone(),
                        e.value.map(|v| round_to(v * selection.factor, dec)),
                    )
                })
                .collect()
        } else {
            match split_slice(&slice) {
                Some(split) => {
                    let split = split.scaled(selection.factor, dec);
                    vec![
                        (NETWORK_LABEL.to_string(), Some(split.network_residual)),
                        (EXCISE_LABEL.to_string(), Some(split.excise)),
                        (VAT_LABEL.to_string(), Some(split.vat)),
                    ]
                }
                None => Vec::new(),
            }
        };

        let mut slices: Vec<PieSlice> = pairs
            .into_iter()
            .filter_map(|(label, value)| match value {
                Some(value) if value > 0.0 => Some(PieSlice {
                    label,
                    value,
                    color: None,
                }),
                _ => None,
            })
            .collect();
        for (i, slice) in slices.iter_mut().enumerate() {
            slice.color = Some(SERIES_PALETTE[i % SERIES_PALETTE.len()].to_string());
        }
        slices.reverse();
        Ok(PieView { slices })
    }

    /// Evolution over every time period for the first selected geography,
    /// one series per breakdown category (decomposed in tax mode).
    pub fn time_series(&self) -> Result<ChartView, PivotError> {
        self.guard_data()?;
        let breakdown = self.breakdown_dim()?;
        let time = self.time_dim()?;
        let geos = self.resolve_geos()?;
        let (code, _) = *geos.first().ok_or(PivotError::NoData)?;

        let selection = self.selection;
        let dec = selection.dec();
        let mut series = self.breakdown_series(breakdown, time.size());

        for ordinal in 0..time.size() {
            let slice = self.breakdown_slice(code, "", Some(ordinal), breakdown)?;
            if selection.component {
                for (k, entry) in slice.iter().enumerate() {
                    series[k]
                        .data
                        .push(entry.value.map(|v| round_to(v * selection.factor, dec)));
                }
            } else {
                push_split(&mut series, &slice, selection.factor, dec);
            }
        }

        assign_series_colors(&mut series);
        Ok(ChartView {
            categories: time.labels().to_vec(),
            series,
        })
    }

    /// Price per consumption band for one geography, used after a
    /// drill-down fetch brought in a cube with the band dimension at full
    /// cardinality.
    pub fn band_drilldown(&self, geo: &str) -> Result<ChartView, PivotError> {
        self.guard_data()?;
        let breakdown = self.breakdown_dim()?;
        let band = self.band_dim(breakdown)?;
        let geo_dim = self.geo_dim()?;
        let time_dim = self.time_dim()?;

        let selection = self.selection;
        let dec = selection.dec();
        let mut data = Vec::with_capacity(band.size());

        for ordinal in 0..band.size() {
            let fixed = self.fix_remaining(
                &[
                    (geo_dim.id.as_str(), DimensionKey::Code(geo)),
                    (time_dim.id.as_str(), DimensionKey::Code(&selection.time)),
                    (band.id.as_str(), DimensionKey::Ordinal(ordinal)),
                ],
                &breakdown.id,
            );
            let slice = self.dataset.slice(&fixed, &breakdown.id)?;
            let value = if selection.component {
                sum_components(&slice)
            } else {
                slice.first().and_then(|e| e.value)
            };
            data.push(value.map(|v| round_to(v * selection.factor, dec)));
        }

        let mut series = vec![Series {
            name: geo_dim.label_of(geo).to_string(),
            data,
            color: None,
        }];
        assign_series_colors(&mut series);
        Ok(ChartView {
            categories: band.labels().to_vec(),
            series,
        })
    }

    /// Exhaustive 2-D projection in declared dimension order, for export.
    pub fn table(&self) -> Result<TableProjection, PivotError> {
        self.guard_data()?;
        let order: Vec<&str> = self.dataset.ids().iter().map(String::as_str).collect();
        Ok(self.dataset.project(&order)?)
    }

    /// True when this cube cannot serve a consumption-band drill-down and
    /// a re-fetch with the band dimension at full cardinality is needed.
    /// The drill-down fetch key is derived by the client crate.
    pub fn needs_band_fetch(&self) -> bool {
        self.dataset
            .dim(BAND_DIMENSION)
            .map_or(true, |d| d.size() <= 1)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// The all-null cube renders a placeholder, never a pivot.
    fn guard_data(&self) -> Result<(), PivotError> {
        if self.dataset.is_empty_cube() {
            return Err(PivotError::NoData);
        }
        Ok(())
    }

    /// The active breakdown dimension: `tax` or `nrg_prc` by id, with a
    /// role-based fallback for datasets using other ids.
    fn breakdown_dim(&self) -> Result<&'a Dimension, PivotError> {
        if let Some(dim) = self.dataset.dim(self.selection.breakdown_dimension()) {
            return Ok(dim);
        }
        self.dataset
            .dimensions()
            .iter()
            .find(|d| {
                d.role == DimensionRole::Classification && d.size() > 1 && d.id != BAND_DIMENSION
            })
            .ok_or(PivotError::MissingDimension("breakdown"))
    }

    fn geo_dim(&self) -> Result<&'a Dimension, PivotError> {
        self.dataset
            .dim(GEO_DIMENSION)
            .or_else(|| self.dataset.dim_by_role(DimensionRole::Geo))
            .ok_or(PivotError::MissingDimension("geo"))
    }

    fn time_dim(&self) -> Result<&'a Dimension, PivotError> {
        self.dataset
            .dim(TIME_DIMENSION)
            .or_else(|| self.dataset.dim_by_role(DimensionRole::Time))
            .ok_or(PivotError::MissingDimension("time"))
    }

    /// The consumption-band dimension of a drill-down cube.
    fn band_dim(&self, breakdown: &Dimension) -> Result<&'a Dimension, PivotError> {
        if let Some(dim) = self.dataset.dim(BAND_DIMENSION) {
            return Ok(dim);
        }
        self.dataset
            .dimensions()
            .iter()
            .find(|d| {
                d.role == DimensionRole::Classification && d.size() > 1 && d.id != breakdown.id
            })
            .ok_or(PivotError::MissingDimension("consumption band"))
    }

    /// Geographies to pivot: the cube's full geo extent when the selection
    /// carries the `all` pseudo-aggregate, otherwise the selected codes
    /// that are present in the cube, in selection order.
    fn resolve_geos(&self) -> Result<Vec<(&'a str, &'a str)>, PivotError> {
        let geo = self.geo_dim()?;
        let geos: Vec<(&str, &str)> = if self.selection.geos.iter().any(|g| g == ALL_GEOS) {
            (0..geo.size())
                .filter_map(|ordinal| Some((geo.code_at(ordinal)?, geo.label_at(ordinal)?)))
                .collect()
        } else {
            self.selection
                .geos
                .iter()
                .filter_map(|code| {
                    let ordinal = geo.ordinal_of(code)?;
                    Some((geo.code_at(ordinal)?, geo.label_at(ordinal)?))
                })
                .collect()
        };
        if geos.is_empty() {
            return Err(PivotError::NoData);
        }
        Ok(geos)
    }

    /// Slice along the breakdown dimension with geo and time fixed. Time is
    /// fixed by code unless an ordinal is given (time-series walks ordinals).
    fn breakdown_slice(
        &self,
        geo: &str,
        time: &'a str,
        time_ordinal: Option<usize>,
        breakdown: &Dimension,
    ) -> Result<Vec<jsonstat::SliceEntry>, PivotError> {
        let geo_dim = self.geo_dim()?;
        let time_dim = self.time_dim()?;
        let time_key = match time_ordinal {
            Some(ordinal) => DimensionKey::Ordinal(ordinal),
            None => DimensionKey::Code(time),
        };
        let fixed = self.fix_remaining(
            &[
                (geo_dim.id.as_str(), DimensionKey::Code(geo)),
                (time_dim.id.as_str(), time_key),
            ],
            &breakdown.id,
        );
        Ok(self.dataset.slice(&fixed, &breakdown.id)?)
    }

    /// Completes a fixed-coordinate list: every dimension that is neither
    /// fixed nor free is pinned at ordinal 0 (the singleton product, unit
    /// and frequency dimensions of this dataset family).
    fn fix_remaining<'k>(
        &'k self,
        fixed: &[(&'k str, DimensionKey<'k>)],
        free: &str,
    ) -> Vec<(&'k str, DimensionKey<'k>)> {
        let mut all: Vec<(&str, DimensionKey)> = fixed.to_vec();
        for dim in self.dataset.dimensions() {
            if dim.id != free && !all.iter().any(|(id, _)| *id == dim.id) {
                all.push((dim.id.as_str(), DimensionKey::Ordinal(0)));
            }
        }
        all
    }

    /// Empty series scaffolding, one per breakdown category in component
    /// mode, the three decomposed components in tax mode.
    fn breakdown_series(&self, breakdown: &Dimension, capacity: usize) -> Vec<Series> {
        let names: Vec<String> = if self.selection.component {
            breakdown.labels().to_vec()
        } else {
            vec![
                NETWORK_LABEL.to_string(),
                EXCISE_LABEL.to_string(),
                VAT_LABEL.to_string(),
            ]
        };
        names
            .into_iter()
            .map(|name| Series {
                name,
                data: Vec::with_capacity(capacity),
                color: None,
            })
            .collect()
    }
}

/// Sum of the non-null component values; `None` when every entry is null.
fn sum_components(slice: &[jsonstat::SliceEntry]) -> Option<f64> {
    let mut sum = 0.0;
    let mut any = false;
    for entry in slice {
        if let Some(value) = entry.value {
            sum += value;
            any = true;
        }
    }
    any.then_some(sum)
}

/// Runs the tax decomposition over a slice's `(code, value)` pairs.
fn split_slice(slice: &[jsonstat::SliceEntry]) -> Option<crate::decompose::TaxSplit> {
    let pairs: SmallVec<[(&str, Option<f64>); 4]> = slice
        .iter()
        .map(|e| (e.code.as_str(), e.value))
        .collect();
    split_tax_slice(&pairs)
}

/// Appends one geography's decomposed values to the three series, nulls
/// when the decomposition has no complete input.
fn push_split(series: &mut [Series], slice: &[jsonstat::SliceEntry], factor: f64, dec: u8) {
    match split_slice(slice) {
        Some(split) => {
            let split = split.scaled(factor, dec);
            series[0].data.push(Some(split.network_residual));
            series[1].data.push(Some(split.excise));
            series[2].data.push(Some(split.vat));
        }
        None => {
            for series in series.iter_mut() {
                series.data.push(None);
            }
        }
    }
}

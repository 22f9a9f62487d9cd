//! FILENAME: tests/test_pivots.rs
//! Integration tests for the chart pivot engine.

mod common;

use common::{BandFixture, ComponentFixture, PriceFixture};

use chartdata::{
    calculate_chart, ChartKind, ChartOutput, ChartPivot, ChartView, EnergyUnit, OrderMode,
    PivotError, Selection,
};
use jsonstat::AddressError;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn tax_selection(time: &str, geos: &[&str]) -> Selection {
    let mut selection = Selection::new(time);
    selection.geos = geos.iter().map(|g| g.to_string()).collect();
    selection
}

fn chart(output: ChartOutput) -> ChartView {
    match output {
        ChartOutput::Chart(view) => view,
        other => panic!("expected chart output, got {other:?}"),
    }
}

// ============================================================================
// COUNTRY COMPARISON
// ============================================================================

#[test]
fn country_comparison_takes_the_first_tax_category() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2024", &["EU27_2020", "DE", "FR"]);
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());

    assert!(view.is_aligned());
    assert_eq!(view.categories, ["European Union - 27 countries", "Germany", "France"]);
    assert_eq!(view.series.len(), 1);
    assert_eq!(view.series[0].name, "2024");
    assert_eq!(view.series[0].data, [Some(110.0), Some(95.0), Some(84.0)]);
    assert!(view.series[0].color.is_some());
}

#[test]
fn the_all_pseudo_aggregate_expands_to_every_geo() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2023", &["all"]);
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    assert_eq!(view.categories.len(), 4);
    assert_eq!(view.series[0].data[0], Some(100.0));
}

#[test]
fn geos_missing_from_the_cube_are_omitted() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2024", &["DE", "XX"]);
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    assert_eq!(view.categories, ["Germany"]);
}

#[test]
fn component_mode_sums_the_components() {
    let dataset = ComponentFixture::dataset();
    let mut selection = tax_selection("2024", &["DE", "FR"]);
    selection.component = true;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    // 0.12 + 0.08 + 0.09 and 0.10 + 0.07 + 0.06.
    assert_eq!(view.series[0].data, [Some(0.29), Some(0.23)]);
}

#[test]
fn factor_scales_before_the_unit_rounding() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2024", &["EU27_2020"]);
    selection.factor = 1.2345;
    selection.unit = EnergyUnit::Mwh;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    // 110 * 1.2345 = 135.795, rounded to whole units for MWh.
    assert_eq!(view.series[0].data, [Some(136.0)]);
}

#[test]
fn ascending_order_reorders_categories_and_data_in_lock_step() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2024", &["all"]);
    selection.order = OrderMode::Asc;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    assert_eq!(
        view.categories,
        ["Austria", "France", "Germany", "European Union - 27 countries"]
    );
    assert_eq!(
        view.series[0].data,
        [Some(75.0), Some(84.0), Some(95.0), Some(110.0)]
    );
}

#[test]
fn unknown_time_codes_surface_as_addressing_errors() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("1999", &["DE"]);
    let err = calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap_err();
    assert!(matches!(
        err,
        PivotError::Address(AddressError::UnknownCode { dimension, .. }) if dimension == "time"
    ));
}

// ============================================================================
// DETAIL BREAKDOWN
// ============================================================================

#[test]
fn tax_detail_emits_the_decomposed_series() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2023", &["DE", "FR"]);
    selection.detail = true;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());

    assert!(view.is_aligned());
    assert_eq!(view.categories, ["Germany", "France"]);
    let names: Vec<&str> = view.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Network costs", "Excise taxes", "VAT"]);
    assert_eq!(view.series[0].data, [Some(55.0), Some(54.0)]);
    assert_eq!(view.series[1].data, [Some(15.0), Some(10.0)]);
    assert_eq!(view.series[2].data, [Some(20.0), Some(16.0)]);
}

#[test]
fn decomposed_series_reconstruct_the_total() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2023", &["all"]);
    selection.detail = true;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());

    let totals = [100.0, 90.0, 80.0, 70.0];
    for (g, total) in totals.iter().enumerate() {
        let sum: f64 = view.series.iter().filter_map(|s| s.data[g]).sum();
        assert!((sum - total).abs() < 1e-9);
    }
}

#[test]
fn detail_descending_orders_by_column_sum() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2023", &["FR", "DE"]);
    selection.detail = true;
    selection.order = OrderMode::Desc;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());
    // Column sums reconstruct the totals: DE 90 > FR 80.
    assert_eq!(view.categories, ["Germany", "France"]);
}

#[test]
fn component_detail_emits_one_series_per_component() {
    let dataset = ComponentFixture::dataset();
    let mut selection = tax_selection("2024", &["DE", "FR"]);
    selection.component = true;
    selection.detail = true;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap());

    assert!(view.is_aligned());
    let names: Vec<&str> = view.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Energy and supply", "Network costs", "Taxes, fees, levies and charges"]
    );
    assert_eq!(view.series[1].data, [Some(0.08), Some(0.07)]);
}

// ============================================================================
// PIE
// ============================================================================

#[test]
fn pie_reverses_slices_for_draw_order() {
    let dataset = PriceFixture::dataset();
    let mut selection = tax_selection("2023", &["DE"]);
    selection.detail = true;
    let pie = match calculate_chart(&dataset, &selection, ChartKind::Pie).unwrap() {
        ChartOutput::Pie(pie) => pie,
        other => panic!("expected pie, got {other:?}"),
    };
    let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["VAT", "Excise taxes", "Network costs"]);
    assert_eq!(pie.slices[0].value, 20.0);
    assert_eq!(pie.slices[2].value, 55.0);
}

#[test]
fn pie_drops_non_positive_slices() {
    let mut payload = PriceFixture::payload();
    // AT 2023: make the excluding-VAT price equal the total, so VAT is 0.
    payload["value"][22] = serde_json::json!(70.0);
    let dataset = jsonstat::decode_dataset(&payload).unwrap();

    let mut selection = tax_selection("2023", &["AT"]);
    selection.detail = true;
    let pie = match calculate_chart(&dataset, &selection, ChartKind::Pie).unwrap() {
        ChartOutput::Pie(pie) => pie,
        other => panic!("expected pie, got {other:?}"),
    };
    let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Excise taxes", "Network costs"]);
}

// ============================================================================
// TIME SERIES
// ============================================================================

#[test]
fn time_series_walks_every_period() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2024", &["FR"]);
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Line).unwrap());

    assert!(view.is_aligned());
    assert_eq!(view.categories, ["2023", "2024"]);
    assert_eq!(view.series[0].data, [Some(54.0), Some(54.0)]);
    assert_eq!(view.series[1].data, [Some(10.0), Some(12.0)]);
    assert_eq!(view.series[2].data, [Some(16.0), Some(18.0)]);
}

#[test]
fn component_time_series_keeps_component_series() {
    let dataset = ComponentFixture::dataset();
    let mut selection = tax_selection("2024", &["FR"]);
    selection.component = true;
    let view = chart(calculate_chart(&dataset, &selection, ChartKind::Line).unwrap());
    assert_eq!(view.categories, ["2024"]);
    assert_eq!(view.series.len(), 3);
    assert_eq!(view.series[0].data, [Some(0.10)]);
}

// ============================================================================
// BAND DRILL-DOWN AND TABLE
// ============================================================================

#[test]
fn band_drilldown_pivots_the_consumption_bands() {
    let dataset = BandFixture::dataset();
    let selection = tax_selection("2024", &["DE"]);
    let view = ChartPivot::new(&dataset, &selection).band_drilldown("DE").unwrap();

    assert!(view.is_aligned());
    assert_eq!(
        view.categories,
        ["Below 1 000 kWh", "1 000 - 2 499 kWh", "2 500 - 4 999 kWh"]
    );
    assert_eq!(view.series[0].name, "Germany");
    assert_eq!(view.series[0].data, [Some(0.40), Some(0.35), Some(0.31)]);
}

#[test]
fn a_collapsed_band_dimension_triggers_a_drilldown_fetch() {
    let selection = tax_selection("2024", &["DE"]);

    // The comparison cube carries the band dimension collapsed to one total.
    let comparison = PriceFixture::dataset();
    assert!(ChartPivot::new(&comparison, &selection).needs_band_fetch());

    // The drill-down cube has it at full cardinality.
    let drilldown = BandFixture::dataset();
    assert!(!ChartPivot::new(&drilldown, &selection).needs_band_fetch());
}

#[test]
fn table_mode_projects_the_whole_cube() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2024", &["all"]);
    let table = match calculate_chart(&dataset, &selection, ChartKind::Table).unwrap() {
        ChartOutput::Table(table) => table,
        other => panic!("expected table, got {other:?}"),
    };
    assert_eq!(table.rows.len(), 24);
    assert_eq!(*table.headers.last().unwrap(), "Value");
}

// ============================================================================
// NO-DATA GUARD
// ============================================================================

#[test]
fn the_all_null_cube_reports_no_data_in_every_mode() {
    let dataset = PriceFixture::empty_dataset();
    for detail in [false, true] {
        for kind in [ChartKind::Bar, ChartKind::Pie, ChartKind::Line, ChartKind::Table] {
            let mut selection = tax_selection("2024", &["all"]);
            selection.detail = detail;
            let err = calculate_chart(&dataset, &selection, kind).unwrap_err();
            assert_eq!(err, PivotError::NoData);
        }
    }
    let selection = tax_selection("2024", &["DE"]);
    let err = ChartPivot::new(&dataset, &selection).band_drilldown("DE").unwrap_err();
    assert_eq!(err, PivotError::NoData);
}

#[test]
fn an_empty_geography_selection_reports_no_data() {
    let dataset = PriceFixture::dataset();
    let selection = tax_selection("2024", &[]);
    let err = calculate_chart(&dataset, &selection, ChartKind::Bar).unwrap_err();
    assert_eq!(err, PivotError::NoData);
}

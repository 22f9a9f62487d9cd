//! FILENAME: tests/common/mod.rs
//! Fixture cubes for the chart pivot integration tests.

use serde_json::json;

use jsonstat::{decode_dataset, Dataset};

/// Household electricity prices with the tax breakdown:
/// 3 tax categories x 4 geographies x 2 periods, singleton product/band/
/// unit/currency dimensions, laid out the way the statistics API returns
/// them.
pub struct PriceFixture;

impl PriceFixture {
    pub fn payload() -> serde_json::Value {
        json!({
            "class": "dataset",
            "label": "Electricity prices for household consumers",
            "source": "ESTAT",
            "updated": "2026-05-04",
            "id": ["freq", "product", "nrg_cons", "unit", "tax", "currency", "geo", "time"],
            "size": [1, 1, 1, 1, 3, 1, 4, 2],
            "role": {"geo": ["geo"], "time": ["time"]},
            "dimension": {
                "freq": {"category": {"index": ["A"], "label": {"A": "Annual"}}},
                "product": {"category": {"index": ["6000"], "label": {"6000": "Electrical energy"}}},
                "nrg_cons": {"category": {"index": ["TOT_KWH"], "label": {"TOT_KWH": "Total consumption"}}},
                "unit": {"category": {"index": ["KWH"], "label": {"KWH": "Kilowatt-hour"}}},
                "tax": {
                    "label": "Taxes and levies",
                    "category": {
                        "index": ["I_TAX", "X_TAX", "X_VAT"],
                        "label": {
                            "I_TAX": "All taxes and levies included",
                            "X_TAX": "Excluding taxes and levies",
                            "X_VAT": "Excluding VAT and other recoverable taxes"
                        }
                    }
                },
                "currency": {"category": {"index": ["EUR"], "label": {"EUR": "Euro"}}},
                "geo": {
                    "label": "Geopolitical entity",
                    "category": {
                        "index": ["EU27_2020", "DE", "FR", "AT"],
                        "label": {
                            "EU27_2020": "European Union - 27 countries",
                            "DE": "Germany",
                            "FR": "France",
                            "AT": "Austria"
                        }
                    }
                },
                "time": {"category": {"index": ["2023", "2024"]}}
            },
            "value": [
                100.0, 110.0,  90.0,  95.0,  80.0,  84.0,  70.0,  75.0,
                 20.0,  22.0,  15.0,  16.0,  10.0,  12.0,   8.0,   9.0,
                 80.0,  88.0,  70.0,  74.0,  64.0,  66.0,  56.0,  60.0
            ]
        })
    }

    pub fn dataset() -> Dataset {
        decode_dataset(&Self::payload()).unwrap()
    }

    /// Same cube with every value null.
    pub fn empty_dataset() -> Dataset {
        let mut payload = Self::payload();
        payload["value"] = json!(vec![serde_json::Value::Null; 24]);
        decode_dataset(&payload).unwrap()
    }
}

/// Price-component breakdown: 3 components x 2 geographies x 1 period.
pub struct ComponentFixture;

impl ComponentFixture {
    pub fn dataset() -> Dataset {
        let payload = json!({
            "class": "dataset",
            "id": ["nrg_prc", "geo", "time"],
            "size": [3, 2, 1],
            "role": {"geo": ["geo"], "time": ["time"]},
            "dimension": {
                "nrg_prc": {
                    "label": "Price component",
                    "category": {
                        "index": ["NRG_SUP", "NETC", "TAX_FEE_LEV_CHRG"],
                        "label": {
                            "NRG_SUP": "Energy and supply",
                            "NETC": "Network costs",
                            "TAX_FEE_LEV_CHRG": "Taxes, fees, levies and charges"
                        }
                    }
                },
                "geo": {
                    "category": {
                        "index": ["DE", "FR"],
                        "label": {"DE": "Germany", "FR": "France"}
                    }
                },
                "time": {"category": {"index": ["2024"]}}
            },
            "value": [0.12, 0.10, 0.08, 0.07, 0.09, 0.06]
        });
        decode_dataset(&payload).unwrap()
    }
}

/// Drill-down cube: one geography with the consumption-band dimension at
/// full cardinality.
pub struct BandFixture;

impl BandFixture {
    pub fn dataset() -> Dataset {
        let payload = json!({
            "class": "dataset",
            "id": ["tax", "nrg_cons", "geo", "time"],
            "size": [3, 3, 1, 1],
            "role": {"geo": ["geo"], "time": ["time"]},
            "dimension": {
                "tax": {
                    "category": {
                        "index": ["I_TAX", "X_TAX", "X_VAT"],
                        "label": {
                            "I_TAX": "All taxes and levies included",
                            "X_TAX": "Excluding taxes and levies",
                            "X_VAT": "Excluding VAT and other recoverable taxes"
                        }
                    }
                },
                "nrg_cons": {
                    "label": "Consumption band",
                    "category": {
                        "index": ["KWH_LT1000", "KWH1000-2499", "KWH2500-4999"],
                        "label": {
                            "KWH_LT1000": "Below 1 000 kWh",
                            "KWH1000-2499": "1 000 - 2 499 kWh",
                            "KWH2500-4999": "2 500 - 4 999 kWh"
                        }
                    }
                },
                "geo": {"category": {"index": ["DE"], "label": {"DE": "Germany"}}},
                "time": {"category": {"index": ["2024"]}}
            },
            "value": [
                0.40, 0.35, 0.31,
                0.08, 0.07, 0.06,
                0.33, 0.29, 0.26
            ]
        });
        decode_dataset(&payload).unwrap()
    }
}

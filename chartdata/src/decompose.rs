//! FILENAME: chartdata/src/decompose.rs
//! Residual decomposition of the tax breakdown.
//!
//! The tax dimension carries three categories: the price with all taxes
//! and levies included, the price excluding taxes and levies, and the
//! price excluding VAT. Charts show {network-cost residual, excise, VAT}
//! instead, derived as `excise = v1`, `vat = v0 - v2`,
//! `network = v0 - (excise + vat)` where `[v0, v1, v2]` is the slice in
//! declared order. Categories are matched by code; the positional
//! convention is the fallback for payloads without the known codes.

use serde::Serialize;

/// Price with all taxes and levies included (`v0`).
pub const CODE_ALL_TAXES: &str = "I_TAX";
/// Price excluding taxes and levies (`v1`).
pub const CODE_EXCL_TAXES: &str = "X_TAX";
/// Price excluding VAT and other recoverable taxes (`v2`).
pub const CODE_EXCL_VAT: &str = "X_VAT";

/// Series labels for the decomposed breakdown.
pub const NETWORK_LABEL: &str = "Network costs";
pub const EXCISE_LABEL: &str = "Excise taxes";
pub const VAT_LABEL: &str = "VAT";

/// The three decomposed components. `network_residual + excise + vat`
/// always reconstructs the all-taxes-included price, up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxSplit {
    pub network_residual: f64,
    pub excise: f64,
    pub vat: f64,
}

impl TaxSplit {
    pub fn total(&self) -> f64 {
        self.network_residual + self.excise + self.vat
    }

    /// Applies the currency/unit factor and rounds every component.
    pub fn scaled(self, factor: f64, dec: u8) -> TaxSplit {
        TaxSplit {
            network_residual: round_to(self.network_residual * factor, dec),
            excise: round_to(self.excise * factor, dec),
            vat: round_to(self.vat * factor, dec),
        }
    }
}

/// Splits one tax-dimension slice, given as `(code, value)` pairs in
/// declared order. Returns `None` when any required input is null or the
/// slice has fewer than three categories.
pub fn split_tax_slice(slice: &[(&str, Option<f64>)]) -> Option<TaxSplit> {
    if slice.len() < 3 {
        return None;
    }

    let lookup = |code: &str, position: usize| -> Option<f64> {
        match slice.iter().find(|(c, _)| *c == code) {
            Some((_, value)) => *value,
            None => slice[position].1,
        }
    };

    let v0 = lookup(CODE_ALL_TAXES, 0)?;
    let v1 = lookup(CODE_EXCL_TAXES, 1)?;
    let v2 = lookup(CODE_EXCL_VAT, 2)?;

    let excise = v1;
    let vat = v0 - v2;
    Some(TaxSplit {
        network_residual: v0 - (excise + vat),
        excise,
        vat,
    })
}

/// Rounds to `dec` decimal places.
pub fn round_to(value: f64, dec: u8) -> f64 {
    let scale = 10f64.powi(dec as i32);
    (value * scale).round() / scale
}

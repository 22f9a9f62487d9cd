//! FILENAME: jsonstat/src/dimension.rs
//! Dimension and category index.
//!
//! Each dimension owns a bijective, contiguous mapping between category
//! codes and ordinals in `[0, size)`. Ordinals are what the addressing
//! layer multiplies with strides; codes are what callers pass in.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::DecodeError;
use crate::raw::{RawDimension, RawIndex};

/// Classification of a dimension id, either declared through the payload's
/// `role` buckets or inferred by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DimensionRole {
    Time,
    Geo,
    Metric,
    Classification,
}

/// Unit metadata carried by a category (metric dimensions only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryUnit {
    pub label: Option<String>,
    pub decimals: Option<u8>,
    pub position: Option<String>,
}

/// One dimension of a decoded cube.
#[derive(Debug, Clone, Serialize)]
pub struct Dimension {
    /// Dimension id as declared by the dataset, e.g. `"geo"`.
    pub id: String,

    /// Human label; falls back to the id when the payload has none.
    pub label: String,

    pub role: DimensionRole,

    /// Ordinal -> category code.
    codes: Vec<String>,

    /// Ordinal -> category label (falls back to the code).
    labels: Vec<String>,

    /// Code -> ordinal. Inverse of `codes`, kept in sync by construction.
    index: HashMap<String, usize>,

    /// Code -> child category codes. Unused by the transform engine but
    /// round-tripped for callers that render hierarchies.
    pub hierarchy: Option<HashMap<String, Vec<String>>>,

    /// Code -> unit record.
    pub units: Option<HashMap<String, CategoryUnit>>,

    /// Code -> (longitude, latitude).
    pub coordinates: Option<HashMap<String, (f64, f64)>>,
}

impl Dimension {
    /// Builds a dimension from its wire form, validating that the category
    /// index is a bijection onto `0..size`.
    pub(crate) fn from_raw(
        id: &str,
        raw: RawDimension,
        size: usize,
        role: DimensionRole,
    ) -> Result<Self, DecodeError> {
        let category = raw
            .category
            .ok_or_else(|| DecodeError::MissingCategory(id.to_string()))?;

        let bad_index = || DecodeError::BadCategoryIndex {
            id: id.to_string(),
            size,
        };

        let codes: Vec<String> = match category.index {
            Some(RawIndex::Array(codes)) => codes,
            Some(RawIndex::Object(map)) => {
                // Explicit code -> ordinal map; rebuild positional order and
                // reject gaps and duplicates along the way.
                let mut codes: Vec<Option<String>> = vec![None; size];
                for (code, ordinal) in &map {
                    let ordinal = ordinal.as_u64().ok_or_else(bad_index)? as usize;
                    let slot = codes.get_mut(ordinal).ok_or_else(bad_index)?;
                    if slot.is_some() {
                        return Err(bad_index());
                    }
                    *slot = Some(code.clone());
                }
                codes.into_iter().collect::<Option<Vec<_>>>().ok_or_else(bad_index)?
            }
            // No index at all: ordinals follow label enumeration order.
            None => match &category.label {
                Some(labels) => labels.keys().cloned().collect(),
                None => return Err(DecodeError::MissingCategory(id.to_string())),
            },
        };

        if codes.len() != size {
            return Err(bad_index());
        }

        let mut index = HashMap::with_capacity(size);
        for (ordinal, code) in codes.iter().enumerate() {
            if index.insert(code.clone(), ordinal).is_some() {
                return Err(bad_index());
            }
        }

        let labels: Vec<String> = codes
            .iter()
            .map(|code| {
                category
                    .label
                    .as_ref()
                    .and_then(|m| m.get(code))
                    .and_then(|v| v.as_str())
                    .unwrap_or(code)
                    .to_string()
            })
            .collect();

        let units = category.unit.map(|units| {
            units
                .into_iter()
                .map(|(code, u)| {
                    (
                        code,
                        CategoryUnit {
                            label: u.label,
                            decimals: u.decimals,
                            position: u.position,
                        },
                    )
                })
                .collect()
        });

        let coordinates = category.coordinates.map(|coords| {
            coords
                .into_iter()
                .filter(|(_, pair)| pair.len() >= 2)
                .map(|(code, pair)| (code, (pair[0], pair[1])))
                .collect()
        });

        Ok(Dimension {
            id: id.to_string(),
            label: raw.label.unwrap_or_else(|| id.to_string()),
            role,
            codes,
            labels,
            index,
            hierarchy: category.child,
            units,
            coordinates,
        })
    }

    /// Number of categories.
    pub fn size(&self) -> usize {
        self.codes.len()
    }

    /// Category codes in ordinal order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Category labels in ordinal order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Resolves a category code to its ordinal.
    pub fn ordinal_of(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn code_at(&self, ordinal: usize) -> Option<&str> {
        self.codes.get(ordinal).map(String::as_str)
    }

    pub fn label_at(&self, ordinal: usize) -> Option<&str> {
        self.labels.get(ordinal).map(String::as_str)
    }

    /// Label for a code, falling back to the code itself.
    pub fn label_of<'a>(&'a self, code: &'a str) -> &'a str {
        match self.ordinal_of(code) {
            Some(ordinal) => &self.labels[ordinal],
            None => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawDimension;

    fn raw_from(json: serde_json::Value) -> RawDimension {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn object_index_rebuilds_positional_order() {
        let raw = raw_from(serde_json::json!({
            "label": "Tax component",
            "category": {
                "index": {"I_TAX": 0, "X_TAX": 1, "X_VAT": 2},
                "label": {"I_TAX": "All taxes included", "X_TAX": "Excluding taxes", "X_VAT": "Excluding VAT"}
            }
        }));
        let dim = Dimension::from_raw("tax", raw, 3, DimensionRole::Classification).unwrap();
        assert_eq!(dim.codes(), ["I_TAX", "X_TAX", "X_VAT"]);
        assert_eq!(dim.ordinal_of("X_VAT"), Some(2));
        assert_eq!(dim.label_of("X_TAX"), "Excluding taxes");
    }

    #[test]
    fn label_order_assigns_ordinals_when_index_is_absent() {
        let raw = raw_from(serde_json::json!({
            "category": {"label": {"B": "Second first", "A": "Alpha"}}
        }));
        let dim = Dimension::from_raw("x", raw, 2, DimensionRole::Classification).unwrap();
        assert_eq!(dim.codes(), ["B", "A"]);
        assert_eq!(dim.label_at(0), Some("Second first"));
    }

    #[test]
    fn duplicate_ordinal_is_rejected() {
        let raw = raw_from(serde_json::json!({
            "category": {"index": {"A": 0, "B": 0}}
        }));
        let err = Dimension::from_raw("x", raw, 2, DimensionRole::Classification).unwrap_err();
        assert!(matches!(err, DecodeError::BadCategoryIndex { .. }));
    }

    #[test]
    fn gap_in_ordinals_is_rejected() {
        let raw = raw_from(serde_json::json!({
            "category": {"index": {"A": 0, "B": 2}}
        }));
        assert!(Dimension::from_raw("x", raw, 2, DimensionRole::Classification).is_err());
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let raw = raw_from(serde_json::json!({
            "category": {"index": ["A", "B", "C"]}
        }));
        assert!(Dimension::from_raw("x", raw, 2, DimensionRole::Classification).is_err());
    }
}

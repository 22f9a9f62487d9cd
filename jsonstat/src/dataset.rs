//! FILENAME: jsonstat/src/dataset.rs
//! Cube decoder.
//!
//! Turns raw JSON-stat payloads into navigable datasets. The three response
//! classes (dataset, bundle, collection) decode through one function each;
//! `decode` dispatches on the `class` tag once, at the boundary.
//!
//! A decoded `Dataset` is immutable: selection changes downstream never
//! mutate it, they either re-pivot or fetch a new cube.

use serde::Serialize;
use serde_json::Value;

use crate::dimension::{Dimension, DimensionRole};
use crate::error::DecodeError;
use crate::raw::{RawCollection, RawDataset, RawDimension, RawRoles, RawStatus, RawValues};

/// A decoded JSON-stat response.
#[derive(Debug, Clone, Serialize)]
pub enum JsonStatResponse {
    Dataset(Box<Dataset>),
    /// Named collection of datasets (v1.x bundle, or `class: "bundle"`).
    Bundle(Vec<(String, Dataset)>),
    Collection(Collection),
}

/// A collection of links to datasets, some possibly embedded inline.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub label: Option<String>,
    pub items: Vec<CollectionItem>,
}

#[derive(Debug, Clone, Serialize)]
pub enum CollectionItem {
    Embedded(Dataset),
    Link {
        href: Option<String>,
        label: Option<String>,
    },
}

/// An immutable N-dimensional statistical cube.
///
/// Dimension order is the declared order from the payload; the flat `value`
/// array is addressed row-major over that order (see `addressing.rs`).
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: Option<String>,
    pub source: Option<String>,
    pub updated: Option<String>,

    ids: Vec<String>,
    sizes: Vec<usize>,
    dimensions: Vec<Dimension>,
    value: Vec<Option<f64>>,
    status: Option<Vec<Option<String>>>,
}

/// Decodes any JSON-stat response, dispatching on its `class` tag.
/// A payload without a `class` is treated as a v1.x bundle.
pub fn decode(payload: &Value) -> Result<JsonStatResponse, DecodeError> {
    let obj = payload.as_object().ok_or(DecodeError::NotJsonStat)?;
    match obj.get("class").and_then(Value::as_str) {
        Some("dataset") => decode_dataset(payload).map(|d| JsonStatResponse::Dataset(Box::new(d))),
        Some("collection") => decode_collection(payload),
        Some("bundle") | None => decode_bundle(payload),
        Some(other) => Err(DecodeError::UnsupportedClass(other.to_string())),
    }
}

/// Decodes a single `class: "dataset"` payload.
pub fn decode_dataset(payload: &Value) -> Result<Dataset, DecodeError> {
    let raw: RawDataset =
        serde_json::from_value(payload.clone()).map_err(|_| DecodeError::NotJsonStat)?;
    Dataset::from_raw(raw)
}

/// Decodes a v1.x bundle: every top-level object member that looks like a
/// dataset becomes one entry; scalar members (`version`, …) are skipped.
fn decode_bundle(payload: &Value) -> Result<JsonStatResponse, DecodeError> {
    let obj = payload.as_object().ok_or(DecodeError::NotJsonStat)?;
    let mut datasets = Vec::new();
    for (name, entry) in obj {
        if entry.get("dimension").is_some() && entry.get("value").is_some() {
            datasets.push((name.clone(), decode_dataset(entry)?));
        }
    }
    if datasets.is_empty() {
        return Err(DecodeError::NotJsonStat);
    }
    Ok(JsonStatResponse::Bundle(datasets))
}

/// Decodes a `class: "collection"` payload. A collection that embeds a
/// single dataset resolves to that dataset directly, so callers skip the
/// extra round trip.
fn decode_collection(payload: &Value) -> Result<JsonStatResponse, DecodeError> {
    let raw: RawCollection =
        serde_json::from_value(payload.clone()).map_err(|_| DecodeError::NotJsonStat)?;

    let mut items = Vec::new();
    for item in raw.link.unwrap_or_default().item {
        let embedded = item.get("class").and_then(Value::as_str) == Some("dataset")
            || (item.get("dimension").is_some() && item.get("value").is_some());
        if embedded {
            items.push(CollectionItem::Embedded(decode_dataset(&item)?));
        } else {
            items.push(CollectionItem::Link {
                href: item.get("href").and_then(Value::as_str).map(String::from),
                label: item.get("label").and_then(Value::as_str).map(String::from),
            });
        }
    }

    if items.len() == 1 {
        if let CollectionItem::Embedded(dataset) = &items[0] {
            return Ok(JsonStatResponse::Dataset(Box::new(dataset.clone())));
        }
    }

    Ok(JsonStatResponse::Collection(Collection {
        label: raw.label,
        items,
    }))
}

impl Dataset {
    pub(crate) fn from_raw(raw: RawDataset) -> Result<Self, DecodeError> {
        // v2 keeps id/size/role at the root, v1 nests them under `dimension`.
        let ids = raw
            .id
            .or(raw.dimension.id)
            .ok_or(DecodeError::MissingDimensionIds)?;
        let sizes = raw
            .size
            .or(raw.dimension.size)
            .ok_or(DecodeError::MissingSizes)?;
        if ids.len() != sizes.len() {
            return Err(DecodeError::DimensionCountMismatch {
                ids: ids.len(),
                sizes: sizes.len(),
            });
        }

        let roles = raw.role.or(raw.dimension.role).unwrap_or_default();
        let total: usize = sizes.iter().product();

        let value = decode_values(raw.value, total)?;
        let status = match raw.status {
            None => None,
            Some(status) => Some(decode_status(status, total)?),
        };

        let mut dimensions = Vec::with_capacity(ids.len());
        for (id, &size) in ids.iter().zip(&sizes) {
            let entry = raw
                .dimension
                .entries
                .get(id)
                .ok_or_else(|| DecodeError::MissingDimension(id.clone()))?;
            let raw_dim: RawDimension = serde_json::from_value(entry.clone())
                .map_err(|_| DecodeError::BadDimension(id.clone()))?;
            dimensions.push(Dimension::from_raw(id, raw_dim, size, role_of(id, &roles))?);
        }

        Ok(Dataset {
            label: raw.label,
            source: raw.source,
            updated: raw.updated,
            ids,
            sizes,
            dimensions,
            value,
            status,
        })
    }

    /// Dimension ids in declared order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Cardinality of each dimension, aligned with `ids()`.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Looks a dimension up by id.
    pub fn dim(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    /// Position of a dimension id in declared order.
    pub fn dim_position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    /// First dimension carrying the given role.
    pub fn dim_by_role(&self, role: DimensionRole) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.role == role)
    }

    /// Total number of cells (`∏ size`).
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The flat value sequence.
    pub fn values(&self) -> &[Option<f64>] {
        &self.value
    }

    pub fn value_at(&self, offset: usize) -> Option<f64> {
        self.value.get(offset).copied().flatten()
    }

    pub fn status_at(&self, offset: usize) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.get(offset))
            .and_then(|s| s.as_deref())
    }

    /// True when every cell is null — the "no data" cube.
    pub fn is_empty_cube(&self) -> bool {
        self.value.iter().all(Option::is_none)
    }
}

fn role_of(id: &str, roles: &RawRoles) -> DimensionRole {
    if roles.time.iter().any(|r| r == id) {
        DimensionRole::Time
    } else if roles.geo.iter().any(|r| r == id) {
        DimensionRole::Geo
    } else if roles.metric.iter().any(|r| r == id) {
        DimensionRole::Metric
    } else {
        DimensionRole::Classification
    }
}

fn decode_values(raw: RawValues, total: usize) -> Result<Vec<Option<f64>>, DecodeError> {
    match raw {
        RawValues::Array(values) => {
            if values.len() != total {
                return Err(DecodeError::ValueLengthMismatch {
                    got: values.len(),
                    want: total,
                });
            }
            Ok(values)
        }
        RawValues::Sparse(map) => {
            let mut values = vec![None; total];
            for (key, value) in &map {
                let offset: usize = key
                    .parse()
                    .map_err(|_| DecodeError::BadSparseOffset(key.clone()))?;
                let slot = values
                    .get_mut(offset)
                    .ok_or_else(|| DecodeError::BadSparseOffset(key.clone()))?;
                *slot = value.as_f64();
            }
            Ok(values)
        }
    }
}

fn decode_status(raw: RawStatus, total: usize) -> Result<Vec<Option<String>>, DecodeError> {
    match raw {
        // One code broadcast to every cell.
        RawStatus::Single(code) => Ok(vec![Some(code); total]),
        RawStatus::Array(status) => {
            if status.len() != total {
                return Err(DecodeError::StatusLengthMismatch {
                    got: status.len(),
                    want: total,
                });
            }
            Ok(status)
        }
        RawStatus::Sparse(map) => {
            let mut status = vec![None; total];
            for (key, value) in &map {
                let offset: usize = key
                    .parse()
                    .map_err(|_| DecodeError::BadSparseOffset(key.clone()))?;
                let slot = status
                    .get_mut(offset)
                    .ok_or_else(|| DecodeError::BadSparseOffset(key.clone()))?;
                *slot = value.as_str().map(String::from);
            }
            Ok(status)
        }
    }
}

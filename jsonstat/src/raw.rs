//! FILENAME: jsonstat/src/raw.rs
//! Wire-format shapes for JSON-stat payloads.
//!
//! These structs mirror the JSON as it arrives from the API, before any
//! validation. The decoder in `dataset.rs` turns them into the typed cube.
//! JSON-stat v1 and v2 disagree on where `id`/`size`/`role` live (v1 nests
//! them under `dimension`, v2 hoists them to the root), so both spots are
//! modeled and reconciled during decoding.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A dataset as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawDataset {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub updated: Option<String>,

    /// v2: dimension ids at the dataset root.
    #[serde(default)]
    pub id: Option<Vec<String>>,

    /// v2: size list at the dataset root.
    #[serde(default)]
    pub size: Option<Vec<usize>>,

    /// v2: role buckets at the dataset root.
    #[serde(default)]
    pub role: Option<RawRoles>,

    pub dimension: RawDimensionBlock,

    pub value: RawValues,

    #[serde(default)]
    pub status: Option<RawStatus>,
}

/// The `dimension` object. In v1 it also carries `id`, `size` and `role`;
/// every remaining key is a dimension id mapping to its dimension object.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawDimensionBlock {
    #[serde(default)]
    pub id: Option<Vec<String>>,

    #[serde(default)]
    pub size: Option<Vec<usize>>,

    #[serde(default)]
    pub role: Option<RawRoles>,

    /// Dimension id -> dimension object. Kept as raw values so a broken
    /// dimension can be reported by id instead of failing the whole parse.
    #[serde(flatten)]
    pub entries: Map<String, Value>,
}

/// Role buckets classifying dimension ids.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawRoles {
    #[serde(default)]
    pub time: Vec<String>,

    #[serde(default)]
    pub geo: Vec<String>,

    #[serde(default)]
    pub metric: Vec<String>,
}

/// A single dimension object.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawDimension {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub category: Option<RawCategory>,
}

/// The `category` block of a dimension.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCategory {
    #[serde(default)]
    pub index: Option<RawIndex>,

    /// Code -> human label. Key order is meaningful when `index` is absent.
    #[serde(default)]
    pub label: Option<Map<String, Value>>,

    /// Code -> child category codes (hierarchy, round-tripped only).
    #[serde(default)]
    pub child: Option<HashMap<String, Vec<String>>>,

    /// Code -> unit record, present on metric dimensions.
    #[serde(default)]
    pub unit: Option<HashMap<String, RawUnit>>,

    /// Code -> [longitude, latitude], present on geo dimensions.
    #[serde(default)]
    pub coordinates: Option<HashMap<String, Vec<f64>>>,
}

/// `category.index`: either ordinal-by-position or an explicit code->ordinal map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawIndex {
    Array(Vec<String>),
    Object(Map<String, Value>),
}

/// Unit metadata attached to a category.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawUnit {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub decimals: Option<u8>,

    #[serde(default)]
    pub position: Option<String>,
}

/// The flat value sequence: a dense array or a sparse object keyed by
/// stringified offsets (missing offsets are null).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValues {
    Array(Vec<Option<f64>>),
    Sparse(Map<String, Value>),
}

/// Status annotations: one string for every cell, a dense array, or a
/// sparse object keyed by stringified offsets.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawStatus {
    Single(String),
    Array(Vec<Option<String>>),
    Sparse(Map<String, Value>),
}

/// A collection response: a list of links, some of which may embed whole
/// datasets inline.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCollection {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawLink {
    #[serde(default)]
    pub item: Vec<Value>,
}

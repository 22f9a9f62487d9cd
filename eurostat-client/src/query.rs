//! FILENAME: eurostat-client/src/query.rs
//! Dataset query parameters and cache-key canonicalization.

use std::collections::BTreeMap;

/// Query parameters for one dataset request. Multi-valued parameters keep
/// their insertion order for the wire, but canonicalize for cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetQuery {
    params: BTreeMap<String, Vec<String>>,
}

impl DatasetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single-valued parameter, replacing any previous values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), vec![value.into()]);
    }

    /// Appends one value to a multi-valued parameter.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Builder form of `add`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical cache key: the dataset id, then parameters with keys in
    /// lexicographic order and each parameter's values sorted, so permuted
    /// inputs collide to the same key.
    pub fn cache_key(&self, dataset_id: &str) -> String {
        let mut parts = vec![dataset_id.to_string()];
        for (key, values) in &self.params {
            let mut values = values.clone();
            values.sort();
            parts.push(format!("{key}={}", values.join(",")));
        }
        parts.join("&")
    }

    /// Wire query string: repeated `key=value` pairs, the way the
    /// statistics API expects multi-valued parameters.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (key, values) in &self.params {
            for value in values {
                pairs.push(format!("{key}={value}"));
            }
        }
        pairs.join("&")
    }
}

/// Fetch key for a consumption-band drill-down: geography + dataset +
/// breakdown mode, so repeat clicks on the same geography and mode are
/// served without a new request.
pub fn drilldown_key(dataset_id: &str, geo: &str, component: bool) -> String {
    let mode = if component { "component" } else { "tax" };
    format!("{dataset_id}:{geo}:{mode}")
}

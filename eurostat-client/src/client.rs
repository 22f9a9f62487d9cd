//! FILENAME: eurostat-client/src/client.rs
//! Fetch coordinator: one network round trip per distinct request key.
//!
//! On every fetch: a fresh cache entry short-circuits; an in-flight shared
//! future for the same key is awaited instead of issuing a second call;
//! otherwise the transport call goes out, registered in the in-flight map
//! and unregistered again on success and failure alike. The cache and the
//! in-flight map are the only shared mutable state in this subsystem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use jsonstat::{decode, Dataset, JsonStatResponse};

use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::query::DatasetQuery;

/// Fetch failures. `Clone` because a coalesced fetch hands every awaiter
/// the same result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed statistics payload: {0}")]
    Decode(String),
}

/// The transport issuing the actual HTTP round trip. Abstracted so tests
/// can count and stall calls.
pub trait Transport: Send + Sync {
    fn fetch_json(&self, url: &str) -> BoxFuture<'static, Result<Value, FetchError>>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn fetch_json(&self, url: &str) -> BoxFuture<'static, Result<Value, FetchError>> {
        let client = self.client.clone();
        let url = url.to_string();
        async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            response
                .json::<Value>()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))
        }
        .boxed()
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data"
                .to_string(),
            ttl: DEFAULT_TTL,
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Dataset>, FetchError>>>;

struct ClientState {
    cache: TtlCache,
    inflight: HashMap<String, SharedFetch>,
}

/// Statistics API client with TTL caching and single-flight coalescing.
pub struct StatClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<ClientState>>,
}

impl StatClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let state = ClientState {
            cache: TtlCache::new(config.ttl),
            inflight: HashMap::new(),
        };
        StatClient {
            config,
            transport,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_http(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(HttpTransport::new()))
    }

    /// Request URL for a dataset and its parameters.
    pub fn url_for(&self, dataset_id: &str, query: &DatasetQuery) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if query.is_empty() {
            format!("{base}/{dataset_id}?format=JSON")
        } else {
            format!("{base}/{dataset_id}?format=JSON&{}", query.to_query_string())
        }
    }

    /// Fetches one cube. Identical concurrent requests coalesce into a
    /// single round trip; fresh cached results never touch the network.
    pub async fn fetch(
        &self,
        dataset_id: &str,
        query: &DatasetQuery,
    ) -> Result<Arc<Dataset>, FetchError> {
        let key = query.cache_key(dataset_id);
        let shared = {
            let mut state = self.state.lock().unwrap();
            if let Some(cube) = state.cache.lookup(&key) {
                debug!("cache hit for {key}");
                return Ok(cube);
            }
            if let Some(inflight) = state.inflight.get(&key) {
                debug!("coalescing concurrent fetch for {key}");
                inflight.clone()
            } else {
                debug!("fetching {key}");
                let shared = self.start_fetch(dataset_id, query, key.clone());
                state.inflight.insert(key, shared.clone());
                shared
            }
        };
        shared.await
    }

    /// Builds the shared in-flight future. The future itself does the
    /// completion bookkeeping: unregister from the in-flight map, then
    /// persist a successful result under the key.
    fn start_fetch(&self, dataset_id: &str, query: &DatasetQuery, key: String) -> SharedFetch {
        let url = self.url_for(dataset_id, query);
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        async move {
            let result = match transport.fetch_json(&url).await {
                Ok(payload) => decode_cube(&payload),
                Err(err) => Err(err),
            };
            let mut state = state.lock().unwrap();
            state.inflight.remove(&key);
            match &result {
                Ok(cube) => state.cache.store(key, Arc::clone(cube)),
                Err(err) => warn!("fetch for {key} failed: {err}"),
            }
            result
        }
        .boxed()
        .shared()
    }
}

/// Decodes a fetched payload into one cube. A collection embedding a
/// single dataset already passes through in the decoder; anything that
/// yields no dataset is a decode failure, surfaced as "no data" upstream.
fn decode_cube(payload: &Value) -> Result<Arc<Dataset>, FetchError> {
    match decode(payload) {
        Ok(JsonStatResponse::Dataset(dataset)) => Ok(Arc::new(*dataset)),
        Ok(JsonStatResponse::Bundle(datasets)) => datasets
            .into_iter()
            .next()
            .map(|(_, dataset)| Arc::new(dataset))
            .ok_or_else(|| FetchError::Decode("empty bundle".to_string())),
        Ok(JsonStatResponse::Collection(_)) => Err(FetchError::Decode(
            "collection without an embedded dataset".to_string(),
        )),
        Err(err) => Err(FetchError::Decode(err.to_string())),
    }
}

/// Superseded-response guard for drill-down fetches.
///
/// The selection may change while a drill-down is in flight; a resolved
/// fetch is applied only when its key still matches the most recently
/// issued one. This is a guard, not cancellation: the stale result is
/// discarded, the request itself is not aborted.
#[derive(Debug, Default)]
pub struct DrilldownGuard {
    current: Mutex<Option<String>>,
}

impl DrilldownGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the key of the drill-down being issued.
    pub fn begin(&self, key: impl Into<String>) {
        *self.current.lock().unwrap() = Some(key.into());
    }

    /// True when `key` is still the active drill-down.
    pub fn is_current(&self, key: &str) -> bool {
        self.current.lock().unwrap().as_deref() == Some(key)
    }

    pub fn clear(&self) {
        *self.current.lock().unwrap() = None;
    }
}

//! FILENAME: eurostat-client/src/lib.rs
//! PURPOSE: Statistics API client for the energy-price viewer.
//! CONTEXT: Canonicalizes request parameters into cache keys, serves 24h
//! TTL-cached cubes, and coalesces concurrent identical fetches into one
//! network round trip. Decoding is delegated to `jsonstat`; chart
//! semantics live in `chartdata`.

pub mod cache;
pub mod client;
pub mod query;

pub use cache::{TtlCache, DEFAULT_TTL};
pub use client::{
    ClientConfig, DrilldownGuard, FetchError, HttpTransport, StatClient, Transport,
};
pub use query::{drilldown_key, DatasetQuery};

//! Data-fetch collaborator
//!
//! The engine only talks to the backend through [`RankingSource`].
//! `HttpRankingSource` calls the real API; `MockRankingSource` generates demo data.

use airrank_common::models::{AirlineFlights, FlightQuery, RankingQuery, RankingsResponse};
use airrank_common::{Destination, Result};
use async_trait::async_trait;

pub mod http;
pub mod mock;

pub use http::HttpRankingSource;
pub use mock::MockRankingSource;

/// Source of rankings, destination reference data and drill-down flights
#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Source identifier for logging (e.g. "http", "mock")
    fn source_id(&self) -> &'static str;

    /// Fetch airline records for the filter snapshot in `query`
    ///
    /// # Returns
    /// * `Ok(RankingsResponse)` - Full replacement dataset
    /// * `Err(_)` - FetchFailure class error (network, status, decode)
    async fn fetch_rankings(&self, query: &RankingQuery) -> Result<RankingsResponse>;

    /// Fetch the destination reference list
    async fn fetch_destinations(&self) -> Result<Vec<Destination>>;

    /// Fetch the per-flight drill-down for one airline
    async fn fetch_airline_flights(&self, code: &str, query: &FlightQuery)
        -> Result<AirlineFlights>;
}

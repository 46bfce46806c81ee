//! HTTP rankings backend client

use airrank_common::models::{AirlineFlights, FlightQuery, RankingQuery, RankingsResponse};
use airrank_common::{Destination, Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::RankingSource;

const USER_AGENT: &str = concat!("airrank-engine/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend endpoints
#[derive(Debug, Clone)]
pub struct HttpEndpoints {
    /// `GET <rankings>?days=&flight_type=&min_flights=[&destination=]`
    pub rankings: Url,
    /// `GET <destinations>`
    pub destinations: Url,
    /// `GET <airlines>/<code>/flights?days=&flight_type=`
    pub airlines: Url,
}

impl HttpEndpoints {
    pub fn parse(rankings: &str, destinations: &str, airlines: &str) -> Result<Self> {
        let parse = |name: &str, value: &str| {
            Url::parse(value).map_err(|e| Error::Config(format!("Invalid {} URL {}: {}", name, value, e)))
        };
        Ok(Self {
            rankings: parse("rankings", rankings)?,
            destinations: parse("destinations", destinations)?,
            airlines: parse("airlines", airlines)?,
        })
    }
}

/// Rankings backend client
pub struct HttpRankingSource {
    http_client: reqwest::Client,
    endpoints: HttpEndpoints,
}

impl HttpRankingSource {
    pub fn new(endpoints: HttpEndpoints) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoints,
        })
    }

    /// `<airlines>/<code>/flights`, with the code percent-encoded as one segment
    fn flights_url(&self, code: &str) -> Result<Url> {
        let mut url = self.endpoints.airlines.clone();
        let shown = url.to_string();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Airlines URL cannot be a base: {}", shown)))?
            .pop_if_empty()
            .push(code)
            .push("flights");
        Ok(url)
    }

    async fn get_json<T, Q>(&self, url: Url, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(url = %url, "Requesting backend");

        let mut request = self.http_client.get(url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl RankingSource for HttpRankingSource {
    fn source_id(&self) -> &'static str {
        "http"
    }

    async fn fetch_rankings(&self, query: &RankingQuery) -> Result<RankingsResponse> {
        self.get_json(self.endpoints.rankings.clone(), Some(query))
            .await
    }

    async fn fetch_destinations(&self) -> Result<Vec<Destination>> {
        self.get_json::<_, ()>(self.endpoints.destinations.clone(), None)
            .await
    }

    async fn fetch_airline_flights(
        &self,
        code: &str,
        query: &FlightQuery,
    ) -> Result<AirlineFlights> {
        let url = self.flights_url(code)?;
        self.get_json(url, Some(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HttpRankingSource {
        let endpoints = HttpEndpoints::parse(
            "http://localhost:5000/api/rankings",
            "http://localhost:5000/api/destinations",
            "http://localhost:5000/api/airlines",
        )
        .unwrap();
        HttpRankingSource::new(endpoints).unwrap()
    }

    #[test]
    fn test_flights_url() {
        let url = source().flights_url("KL").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/airlines/KL/flights");
    }

    #[test]
    fn test_flights_url_trailing_slash_and_encoding() {
        let endpoints = HttpEndpoints::parse(
            "http://localhost/api/rankings",
            "http://localhost/api/destinations",
            "http://localhost/api/airlines/",
        )
        .unwrap();
        let source = HttpRankingSource::new(endpoints).unwrap();
        let url = source.flights_url("A B").unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/airlines/A%20B/flights");
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let result = HttpEndpoints::parse("not a url", "http://x/d", "http://x/a");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_flights_url_rejects_cannot_be_base() {
        let endpoints = HttpEndpoints::parse(
            "http://localhost/api/rankings",
            "http://localhost/api/destinations",
            "mailto:ops@example.com",
        )
        .unwrap();
        let source = HttpRankingSource::new(endpoints).unwrap();
        let err = source.flights_url("KL").unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("mailto:ops@example.com")));
    }

    #[tokio::test]
    async fn test_request_error_is_fetch_failure() {
        // reqwest refuses non-HTTP schemes before touching the network
        let endpoints = HttpEndpoints::parse(
            "ftp://localhost/api/rankings",
            "ftp://localhost/api/destinations",
            "ftp://localhost/api/airlines",
        )
        .unwrap();
        let source = HttpRankingSource::new(endpoints).unwrap();
        let err = source.fetch_destinations().await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(err.is_fetch_failure());
    }
}

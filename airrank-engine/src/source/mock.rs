//! Demo data source
//!
//! Generates plausible rankings for 25 carriers when no backend is
//! available. Synthetic on-time percentages are clamped to [0,100] before a
//! record is built, so consumers never see out-of-range values.

use airrank_common::metrics::clamp_on_time_percentage;
use airrank_common::models::{
    AirlineFlights, AirlineRef, FlightQuery, FlightRecord, RankingQuery, RankingsResponse,
};
use airrank_common::{AirlineRecord, Destination, FlightType, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::RankingSource;

/// Carrier profile: (code, name, base on-time %, variance)
const CARRIERS: [(&str, &str, f64, f64); 25] = [
    ("KL", "KLM Royal Dutch Airlines", 92.0, 5.0),
    ("BA", "British Airways", 88.0, 6.0),
    ("LH", "Lufthansa", 90.0, 4.0),
    ("AF", "Air France", 85.0, 7.0),
    ("DL", "Delta Air Lines", 91.0, 5.0),
    ("UA", "United Airlines", 84.0, 8.0),
    ("AA", "American Airlines", 83.0, 9.0),
    ("EK", "Emirates", 94.0, 3.0),
    ("QR", "Qatar Airways", 93.0, 4.0),
    ("SQ", "Singapore Airlines", 95.0, 2.0),
    ("TK", "Turkish Airlines", 87.0, 6.0),
    ("EY", "Etihad Airways", 89.0, 5.0),
    ("VS", "Virgin Atlantic", 86.0, 7.0),
    ("IB", "Iberia", 82.0, 8.0),
    ("AZ", "ITA Airways", 81.0, 9.0),
    ("TP", "TAP Air Portugal", 80.0, 10.0),
    ("SK", "SAS Scandinavian", 88.0, 6.0),
    ("AY", "Finnair", 91.0, 4.0),
    ("LX", "Swiss International", 92.0, 3.0),
    ("OS", "Austrian Airlines", 89.0, 5.0),
    ("SN", "Brussels Airlines", 85.0, 7.0),
    ("U2", "easyJet", 78.0, 12.0),
    ("FR", "Ryanair", 76.0, 14.0),
    ("VY", "Vueling", 79.0, 11.0),
    ("W6", "Wizz Air", 75.0, 15.0),
];

/// Built-in destinations: (code, name, country, continent)
const DESTINATIONS: [(&str, &str, &str, &str); 12] = [
    ("LHR", "London Heathrow", "United Kingdom", "Europe"),
    ("LGW", "London Gatwick", "United Kingdom", "Europe"),
    ("CDG", "Paris Charles de Gaulle", "France", "Europe"),
    ("NCE", "Nice Côte d'Azur", "France", "Europe"),
    ("BCN", "Barcelona El Prat", "Spain", "Europe"),
    ("MAD", "Madrid Barajas", "Spain", "Europe"),
    ("JFK", "New York John F. Kennedy", "United States", "North America"),
    ("ATL", "Atlanta Hartsfield-Jackson", "United States", "North America"),
    ("YYZ", "Toronto Pearson", "Canada", "North America"),
    ("DXB", "Dubai International", "United Arab Emirates", "Asia"),
    ("SIN", "Singapore Changi", "Singapore", "Asia"),
    ("CPT", "Cape Town International", "South Africa", "Africa"),
];

const STATUSES: [&str; 5] = ["DEP", "SCH", "DEL", "BRD", "CNX"];

/// Number of flights in a synthetic drill-down
const DEMO_FLIGHT_COUNT: usize = 12;

/// Demo data generator with simulated latency
pub struct MockRankingSource {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl MockRankingSource {
    /// Entropy-seeded generator
    pub fn new(latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency,
        }
    }

    /// Deterministic generator for tests and reproducible demos
    pub fn with_seed(seed: u64, latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned generator still yields valid random numbers
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut rng)
    }

    fn generate_airlines(&self) -> Result<Vec<AirlineRecord>> {
        self.with_rng(|rng| {
            CARRIERS
                .iter()
                .map(|&(code, name, base, variance)| {
                    let raw_on_time = base + (rng.gen::<f64>() - 0.5) * variance;
                    let on_time = clamp_on_time_percentage(raw_on_time);
                    let avg_delay = (100.0 - on_time) * 2.0 - 10.0;
                    let total_flights = rng.gen_range(50..550);
                    let trend = (rng.gen::<f64>() - 0.5) * 10.0;
                    let flight_type = if rng.gen_bool(0.5) {
                        FlightType::Departures
                    } else {
                        FlightType::Arrivals
                    };

                    AirlineRecord::new(
                        code,
                        name,
                        on_time,
                        avg_delay,
                        total_flights,
                        trend,
                        Some(flight_type),
                    )
                })
                .collect()
        })
    }

    fn generate_flights(&self, code: &str, query: &FlightQuery) -> Vec<FlightRecord> {
        let today = Utc::now().date_naive();
        let span_days = i64::from(query.days.max(1));

        self.with_rng(|rng| {
            (0..DEMO_FLIGHT_COUNT)
                .map(|i| {
                    let destination = match &query.destination {
                        Some(dest_code) => DESTINATIONS
                            .iter()
                            .find(|d| d.0 == dest_code.as_str())
                            .map(|d| d.1.to_string())
                            .unwrap_or_else(|| dest_code.clone()),
                        None => DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())].1.to_string(),
                    };
                    let delay = f64::from(rng.gen_range(-10i32..45));
                    let hour = rng.gen_range(6..23);
                    let minute = rng.gen_range(0..12) * 5;
                    let sched_total = hour * 60 + minute;
                    let actual_total = (sched_total + delay as i32).clamp(0, 24 * 60 - 1);
                    let direction = match query.flight_type {
                        FlightType::Arrivals => "A",
                        FlightType::Departures => "D",
                        FlightType::All if rng.gen_bool(0.5) => "D",
                        FlightType::All => "A",
                    };

                    FlightRecord {
                        flight_number: format!("{}{}", code, 1000 + i * 7),
                        date: Some(today - ChronoDuration::days(rng.gen_range(0..span_days))),
                        sched_time: format!("{:02}:{:02}", hour, minute),
                        actual_time: Some(format!(
                            "{:02}:{:02}",
                            actual_total / 60,
                            actual_total % 60
                        )),
                        delay,
                        on_time: delay <= 15.0,
                        destination: Some(destination),
                        gate: Some(format!(
                            "{}{}",
                            ['B', 'C', 'D', 'E'][rng.gen_range(0..4)],
                            rng.gen_range(1..30)
                        )),
                        status: Some(STATUSES[rng.gen_range(0..STATUSES.len())].to_string()),
                        direction: Some(direction.to_string()),
                        terminal: None,
                    }
                })
                .collect()
        })
    }
}

#[async_trait]
impl RankingSource for MockRankingSource {
    fn source_id(&self) -> &'static str {
        "mock"
    }

    async fn fetch_rankings(&self, query: &RankingQuery) -> Result<RankingsResponse> {
        self.simulate_latency().await;

        let airlines = self.generate_airlines()?;
        debug!(days = query.days, airlines = airlines.len(), "Generated demo rankings");

        let total_flights = airlines.iter().map(|a| a.total_flights).sum();
        Ok(RankingsResponse {
            airlines,
            first_update: None,
            last_update: Some(Utc::now().to_rfc3339()),
            total_flights: Some(total_flights),
        })
    }

    async fn fetch_destinations(&self) -> Result<Vec<Destination>> {
        self.simulate_latency().await;

        Ok(DESTINATIONS
            .iter()
            .map(|&(code, name, country, continent)| Destination {
                code: code.to_string(),
                name: Some(name.to_string()),
                country: Some(country.to_string()),
                continent: Some(continent.to_string()),
            })
            .collect())
    }

    async fn fetch_airline_flights(
        &self,
        code: &str,
        query: &FlightQuery,
    ) -> Result<AirlineFlights> {
        self.simulate_latency().await;

        let name = CARRIERS
            .iter()
            .find(|c| c.0 == code)
            .map(|c| c.1.to_string())
            .unwrap_or_else(|| code.to_string());

        Ok(AirlineFlights {
            airline: AirlineRef {
                code: Some(code.to_string()),
                name,
            },
            flights: self.generate_flights(code, query),
        })
    }
}

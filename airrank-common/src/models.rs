//! Wire models shared between the rankings backend and the engine
//!
//! Field names follow the backend's camelCase JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::metrics::{self, Metrics};
use crate::{Error, Result};

// ========================================
// Flight type
// ========================================

/// Flight direction filter / record classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightType {
    #[default]
    All,
    Departures,
    Arrivals,
}

impl FlightType {
    /// Value used in the `flight_type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightType::All => "all",
            FlightType::Departures => "departures",
            FlightType::Arrivals => "arrivals",
        }
    }

    /// Whether the destination cascade is shown for this flight type
    ///
    /// Destinations are only tracked for departing flights; `all` includes them.
    pub fn supports_destination(&self) -> bool {
        matches!(self, FlightType::All | FlightType::Departures)
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(FlightType::All),
            "departures" => Ok(FlightType::Departures),
            "arrivals" => Ok(FlightType::Arrivals),
            other => Err(Error::InvalidInput(format!("unknown flight type: {}", other))),
        }
    }
}

// ========================================
// Airline record
// ========================================

/// One airline's statistics for one query window
///
/// `reliability_score` is derived on construction and never read from the wire,
/// so it always equals `on_time_percentage - avg_delay / 10`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AirlineRecordWire", into = "AirlineRecordWire")]
pub struct AirlineRecord {
    pub code: String,
    pub name: String,
    on_time_percentage: f64,
    avg_delay: f64,
    reliability_score: f64,
    pub total_flights: u64,
    pub trend: f64,
    pub flight_type: Option<FlightType>,
}

impl AirlineRecord {
    /// Build a record, rejecting an on-time percentage outside [0,100]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        on_time_percentage: f64,
        avg_delay: f64,
        total_flights: u64,
        trend: f64,
        flight_type: Option<FlightType>,
    ) -> Result<Self> {
        let on_time_percentage = metrics::validate_on_time_percentage(on_time_percentage)?;
        let avg_delay = metrics::validate_avg_delay(avg_delay)?;

        Ok(Self {
            code: code.into(),
            name: name.into(),
            on_time_percentage,
            avg_delay,
            reliability_score: metrics::reliability_score(on_time_percentage, avg_delay),
            total_flights,
            trend,
            flight_type,
        })
    }

    pub fn on_time_percentage(&self) -> f64 {
        self.on_time_percentage
    }

    pub fn avg_delay(&self) -> f64 {
        self.avg_delay
    }

    pub fn reliability_score(&self) -> f64 {
        self.reliability_score
    }

    /// Derived classifications for display
    pub fn metrics(&self) -> Metrics {
        Metrics {
            reliability_score: self.reliability_score,
            score_band: metrics::ScoreBand::classify(self.on_time_percentage),
            trend_direction: metrics::TrendDirection::classify(self.trend),
            delay_direction: metrics::DelayDirection::classify(self.avg_delay),
        }
    }
}

/// Sortable numeric fields of [`AirlineRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    #[default]
    ReliabilityScore,
    OnTimePercentage,
    AvgDelay,
    TotalFlights,
    Trend,
}

impl SortColumn {
    /// Numeric sort key of `record` for this column
    pub fn key(&self, record: &AirlineRecord) -> f64 {
        match self {
            SortColumn::ReliabilityScore => record.reliability_score,
            SortColumn::OnTimePercentage => record.on_time_percentage,
            SortColumn::AvgDelay => record.avg_delay,
            SortColumn::TotalFlights => record.total_flights as f64,
            SortColumn::Trend => record.trend,
        }
    }
}

/// JSON shape of an airline record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirlineRecordWire {
    code: String,
    #[serde(default)]
    name: Option<String>,
    on_time_percentage: f64,
    avg_delay: f64,
    /// Ignored on input, always recomputed
    #[serde(default)]
    reliability_score: Option<f64>,
    total_flights: u64,
    #[serde(default)]
    trend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flight_type: Option<FlightType>,
}

impl TryFrom<AirlineRecordWire> for AirlineRecord {
    type Error = Error;

    fn try_from(wire: AirlineRecordWire) -> Result<Self> {
        // Backend falls back to the code when it has no display name
        let name = wire.name.unwrap_or_else(|| wire.code.clone());
        AirlineRecord::new(
            wire.code,
            name,
            wire.on_time_percentage,
            wire.avg_delay,
            wire.total_flights,
            wire.trend,
            wire.flight_type,
        )
    }
}

impl From<AirlineRecord> for AirlineRecordWire {
    fn from(record: AirlineRecord) -> Self {
        Self {
            code: record.code,
            name: Some(record.name),
            on_time_percentage: record.on_time_percentage,
            avg_delay: record.avg_delay,
            reliability_score: Some(record.reliability_score),
            total_flights: record.total_flights,
            trend: record.trend,
            flight_type: record.flight_type,
        }
    }
}

/// Response of `GET <endpoint>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub airlines: Vec<AirlineRecord>,
    /// Date of the earliest collected flight (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_flights: Option<u64>,
}

// ========================================
// Destinations
// ========================================

/// Airport reference entry with optional classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
}

impl Destination {
    /// Display name, empty when absent
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

// ========================================
// Drill-down flights
// ========================================

/// Single flight in the per-airline drill-down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub flight_number: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub sched_time: String,
    #[serde(default)]
    pub actual_time: Option<String>,
    /// Minutes, > 0 means late
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub on_time: bool,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub gate: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<u16>,
}

impl FlightRecord {
    /// Display label for the status code (raw code when unknown, empty when absent)
    pub fn status_label(&self) -> String {
        self.status
            .as_deref()
            .map(|code| flight_status_label(code).to_string())
            .unwrap_or_default()
    }
}

/// Map a short flight status code to its display label
///
/// Unrecognized codes are returned unchanged.
pub fn flight_status_label(code: &str) -> &str {
    match code {
        "SCH" => "Scheduled",
        "DEL" => "Delayed",
        "WIL" => "Wait in Lounge",
        "GTO" => "Gate Open",
        "BRD" => "Boarding",
        "GCL" => "Gate Closing",
        "GTD" => "Gate Closed",
        "DEP" => "Departed",
        "CNX" => "Cancelled",
        "GCH" => "Gate Change",
        "TOM" => "Tomorrow",
        "AIR" => "Airborne",
        "EXP" => "Expected Landing",
        "FIR" => "Flight in Dutch Airspace",
        "LND" => "Landed",
        "FIB" => "FIBAG",
        "ARR" => "Arrived",
        "DIV" => "Diverted",
        other => other,
    }
}

/// Airline identity in the drill-down response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineRef {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
}

/// Response of `GET <endpoint>/<code>/flights`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineFlights {
    pub airline: AirlineRef,
    pub flights: Vec<FlightRecord>,
}

// ========================================
// Query parameters
// ========================================

/// Query string of `GET <endpoint>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub days: u32,
    pub flight_type: FlightType,
    pub min_flights: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Query string of `GET <endpoint>/<code>/flights`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    pub days: u32,
    pub flight_type: FlightType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_recomputes_score_from_wire() {
        let record: AirlineRecord = serde_json::from_value(json!({
            "code": "KL",
            "name": "KLM Royal Dutch Airlines",
            "onTimePercentage": 92.0,
            "avgDelay": -3.0,
            "reliabilityScore": 12.0,
            "totalFlights": 412,
            "trend": 0.5,
            "flightType": "departures"
        }))
        .unwrap();

        assert!((record.reliability_score() - 92.3).abs() < 1e-9);
        assert_eq!(record.flight_type, Some(FlightType::Departures));
    }

    #[test]
    fn test_record_rejects_out_of_range_on_time() {
        let result: std::result::Result<AirlineRecord, _> = serde_json::from_value(json!({
            "code": "XX",
            "name": "Broken",
            "onTimePercentage": 104.0,
            "avgDelay": 1.0,
            "totalFlights": 10
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_defaults_missing_optional_fields() {
        let record: AirlineRecord = serde_json::from_value(json!({
            "code": "HV",
            "onTimePercentage": 81.5,
            "avgDelay": 6.2,
            "totalFlights": 230
        }))
        .unwrap();

        assert_eq!(record.name, "HV");
        assert_eq!(record.trend, 0.0);
        assert_eq!(record.flight_type, None);
    }

    #[test]
    fn test_record_serializes_camel_case_with_score() {
        let record =
            AirlineRecord::new("FR", "Ryanair", 76.0, 12.0, 300, -1.0, None).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["onTimePercentage"], 76.0);
        assert!((value["reliabilityScore"].as_f64().unwrap() - 74.8).abs() < 1e-9);
        assert!(value.get("flightType").is_none());
    }

    #[test]
    fn test_flight_type_round_trip_str() {
        for ft in [FlightType::All, FlightType::Departures, FlightType::Arrivals] {
            assert_eq!(ft.as_str().parse::<FlightType>().unwrap(), ft);
        }
        assert!("both".parse::<FlightType>().is_err());
    }

    #[test]
    fn test_flight_type_destination_support() {
        assert!(FlightType::All.supports_destination());
        assert!(FlightType::Departures.supports_destination());
        assert!(!FlightType::Arrivals.supports_destination());
    }

    #[test]
    fn test_status_label_lookup() {
        assert_eq!(flight_status_label("DEP"), "Departed");
        assert_eq!(flight_status_label("CNX"), "Cancelled");
        assert_eq!(flight_status_label("ZZZ"), "ZZZ");
    }

    #[test]
    fn test_flight_record_parses_backend_shape() {
        let flight: FlightRecord = serde_json::from_value(json!({
            "flightNumber": "KL1001",
            "date": "2025-03-14",
            "schedTime": "07:05",
            "actualTime": null,
            "delay": 12.0,
            "onTime": false,
            "destination": "London Heathrow",
            "gate": "D7",
            "status": "DEP",
            "direction": "D",
            "terminal": 2
        }))
        .unwrap();

        assert_eq!(flight.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(flight.actual_time, None);
        assert_eq!(flight.status_label(), "Departed");
    }

    #[test]
    fn test_query_omits_absent_destination() {
        let query = RankingQuery {
            days: 30,
            flight_type: FlightType::All,
            min_flights: 10,
            destination: None,
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({"days": 30, "flight_type": "all", "min_flights": 10}));
    }
}

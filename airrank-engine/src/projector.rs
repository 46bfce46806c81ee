//! Ranking projector
//!
//! Combines the raw dataset with sort state (and, in client-filtered mode,
//! filter state) into ranked rows plus summary statistics.

use airrank_common::metrics::{DelayDirection, ScoreBand, TrendDirection};
use airrank_common::{AirlineRecord, FlightType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::filters::FilterState;
use crate::sort::SortState;

/// Where predicate filtering happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    /// Backend already applied every filter
    #[default]
    Backend,
    /// Flight type and minimum flights are applied here
    Client,
}

/// One render-ready table row
///
/// The score itself travels inside `airline`; only the display
/// classifications are added alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    /// 1-based position in display order
    pub rank: usize,
    pub airline: AirlineRecord,
    pub score_band: ScoreBand,
    pub trend_direction: TrendDirection,
    pub delay_direction: DelayDirection,
}

/// Highest reliability airline in the filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestAirline {
    pub code: String,
    pub name: String,
    pub reliability_score: f64,
}

/// Aggregates over a non-empty filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub best: BestAirline,
    pub avg_on_time_percentage: f64,
    pub avg_delay: f64,
    pub total_airlines: usize,
    pub total_flights: u64,
}

/// Summary, with an explicit marker for an empty result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Summary {
    Empty,
    Computed(SummaryStats),
}

impl Summary {
    pub fn total_airlines(&self) -> usize {
        match self {
            Summary::Empty => 0,
            Summary::Computed(stats) => stats.total_airlines,
        }
    }

    pub fn stats(&self) -> Option<&SummaryStats> {
        match self {
            Summary::Empty => None,
            Summary::Computed(stats) => Some(stats),
        }
    }
}

/// Projection output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub rows: Vec<RankedRow>,
    pub summary: Summary,
}

/// Client-side predicates: flight type exact match (skipped for `all`), then minimum flights
pub fn filter_records<'a>(records: &'a [AirlineRecord], filters: &FilterState) -> Vec<&'a AirlineRecord> {
    records
        .iter()
        .filter(|r| passes_flight_type(r, filters.flight_type))
        .filter(|r| r.total_flights >= u64::from(filters.min_flights))
        .collect()
}

fn passes_flight_type(record: &AirlineRecord, flight_type: FlightType) -> bool {
    flight_type == FlightType::All || record.flight_type == Some(flight_type)
}

/// Stable sort by the active column; equal keys keep input order
pub fn sort_records(records: &mut [&AirlineRecord], sort: &SortState) {
    records.sort_by(|a, b| {
        let ka = sort.column.key(a);
        let kb = sort.column.key(b);
        let ord = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
        if sort.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// Summary over the filtered set
///
/// `best` is the argmax of reliability score regardless of display sort;
/// ties go to the earliest record.
pub fn summarize(records: &[&AirlineRecord]) -> Summary {
    let Some(first) = records.first() else {
        return Summary::Empty;
    };

    let best = records.iter().skip(1).fold(*first, |best, r| {
        if r.reliability_score() > best.reliability_score() {
            r
        } else {
            best
        }
    });

    let count = records.len();
    let avg_on_time_percentage =
        records.iter().map(|r| r.on_time_percentage()).sum::<f64>() / count as f64;
    let avg_delay = records.iter().map(|r| r.avg_delay()).sum::<f64>() / count as f64;
    let total_flights = records.iter().map(|r| r.total_flights).sum();

    Summary::Computed(SummaryStats {
        best: BestAirline {
            code: best.code.clone(),
            name: best.name.clone(),
            reliability_score: best.reliability_score(),
        },
        avg_on_time_percentage,
        avg_delay,
        total_airlines: count,
        total_flights,
    })
}

/// Project `records` into ranked rows and a summary
pub fn project(
    records: &[AirlineRecord],
    sort: &SortState,
    filters: &FilterState,
    mode: FilterMode,
) -> Ranking {
    let mut selected: Vec<&AirlineRecord> = match mode {
        FilterMode::Backend => records.iter().collect(),
        FilterMode::Client => filter_records(records, filters),
    };

    let summary = summarize(&selected);
    sort_records(&mut selected, sort);

    let rows = selected
        .into_iter()
        .enumerate()
        .map(|(index, airline)| {
            let metrics = airline.metrics();
            RankedRow {
                rank: index + 1,
                airline: airline.clone(),
                score_band: metrics.score_band,
                trend_direction: metrics.trend_direction,
                delay_direction: metrics.delay_direction,
            }
        })
        .collect();

    Ranking { rows, summary }
}

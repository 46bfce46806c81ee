//! Metric calculator
//!
//! Pure functions deriving the ranking metric and display classifications
//! from raw on-time performance values.
//!
//! reliability_score = on_time_percentage - avg_delay / 10
//!
//! A carrier with the same on-time rate but a lower average delay always
//! scores higher. Classifications are lower-bound inclusive.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Weight divisor applied to average delay minutes
pub const DELAY_PENALTY_DIVISOR: f64 = 10.0;

/// Lowest valid on-time percentage
pub const ON_TIME_MIN: f64 = 0.0;

/// Highest valid on-time percentage
pub const ON_TIME_MAX: f64 = 100.0;

/// Compute the reliability score for an (on-time %, average delay) pair
///
/// # Examples
/// ```
/// use airrank_common::metrics::reliability_score;
///
/// let score = reliability_score(76.0, 12.0);
/// assert!((score - 74.8).abs() < 1e-9);
/// ```
pub fn reliability_score(on_time_percentage: f64, avg_delay: f64) -> f64 {
    on_time_percentage - (avg_delay / DELAY_PENALTY_DIVISOR)
}

/// Reject on-time percentages outside [0,100] (never clamps)
pub fn validate_on_time_percentage(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidMetricInput(format!(
            "on-time percentage must be finite, got {}",
            value
        )));
    }
    if !(ON_TIME_MIN..=ON_TIME_MAX).contains(&value) {
        return Err(Error::InvalidMetricInput(format!(
            "on-time percentage {} outside [{}, {}]",
            value, ON_TIME_MIN, ON_TIME_MAX
        )));
    }
    Ok(value)
}

/// Reject non-finite delay values
pub fn validate_avg_delay(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidMetricInput(format!(
            "average delay must be finite, got {}",
            value
        )))
    }
}

/// Clamp a synthetic on-time percentage into [0,100]
///
/// Only the demo generator uses this; real inputs go through
/// [`validate_on_time_percentage`].
pub fn clamp_on_time_percentage(value: f64) -> f64 {
    value.clamp(ON_TIME_MIN, ON_TIME_MAX)
}

/// Score band derived from on-time percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub fn classify(on_time_percentage: f64) -> Self {
        if on_time_percentage >= 90.0 {
            ScoreBand::Excellent
        } else if on_time_percentage >= 80.0 {
            ScoreBand::Good
        } else if on_time_percentage >= 70.0 {
            ScoreBand::Average
        } else {
            ScoreBand::Poor
        }
    }
}

/// Direction of the trend delta versus the prior period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn classify(trend: f64) -> Self {
        if trend > 0.0 {
            TrendDirection::Up
        } else if trend < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }
}

/// Whether the average delay is favorable (early or on time) or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayDirection {
    /// avg_delay <= 0
    Positive,
    /// avg_delay > 0
    Negative,
}

impl DelayDirection {
    pub fn classify(avg_delay: f64) -> Self {
        if avg_delay <= 0.0 {
            DelayDirection::Positive
        } else {
            DelayDirection::Negative
        }
    }
}

/// All derived values for one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub reliability_score: f64,
    pub score_band: ScoreBand,
    pub trend_direction: TrendDirection,
    pub delay_direction: DelayDirection,
}

impl Metrics {
    /// Validate inputs and derive every metric
    pub fn evaluate(on_time_percentage: f64, avg_delay: f64, trend: f64) -> Result<Self> {
        let on_time_percentage = validate_on_time_percentage(on_time_percentage)?;
        let avg_delay = validate_avg_delay(avg_delay)?;

        Ok(Self {
            reliability_score: reliability_score(on_time_percentage, avg_delay),
            score_band: ScoreBand::classify(on_time_percentage),
            trend_direction: TrendDirection::classify(trend),
            delay_direction: DelayDirection::classify(avg_delay),
        })
    }
}

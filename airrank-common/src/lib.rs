//! # Airrank Common Library
//!
//! Shared code for the airline reliability rankings workspace:
//! - Wire models (airline records, destinations, drill-down flights)
//! - Metric calculator (reliability score and classifications)
//! - Event types (EngineEvent enum) and EventBus
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;

pub use error::{Error, Result};
pub use models::{AirlineRecord, Destination, FlightType, SortColumn};

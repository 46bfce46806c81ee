//! Event types for the ranking engine
//!
//! Provides the EngineEvent enum and the broadcast EventBus. Events are
//! serialized for SSE transmission to the render collaborator.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{RankingQuery, SortColumn};

/// Engine event types
///
/// All events carry their emission timestamp. Generation numbers identify
/// the reload request an event belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A reload request was issued to the data source
    ReloadStarted {
        generation: u64,
        query: RankingQuery,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A reload response replaced the dataset
    ///
    /// Triggers:
    /// - SSE: Re-fetch the view and re-render the table
    DataReloaded {
        generation: u64,
        airline_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A reload failed (network error, non-success status, bad body)
    ReloadFailed {
        generation: u64,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A response settled after a newer request was issued and was dropped
    StaleResponseDiscarded {
        generation: u64,
        latest_generation: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Destination reference data was loaded and cached
    DestinationsLoaded {
        count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Destination reference data failed to load (not cached, retried on next need)
    DestinationsFailed {
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Filter state changed; carries the new query snapshot
    FiltersChanged {
        query: RankingQuery,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sort state changed
    SortChanged {
        column: SortColumn,
        descending: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl EngineEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::ReloadStarted { .. } => "ReloadStarted",
            EngineEvent::DataReloaded { .. } => "DataReloaded",
            EngineEvent::ReloadFailed { .. } => "ReloadFailed",
            EngineEvent::StaleResponseDiscarded { .. } => "StaleResponseDiscarded",
            EngineEvent::DestinationsLoaded { .. } => "DestinationsLoaded",
            EngineEvent::DestinationsFailed { .. } => "DestinationsFailed",
            EngineEvent::FiltersChanged { .. } => "FiltersChanged",
            EngineEvent::SortChanged { .. } => "SortChanged",
        }
    }
}

/// Broadcast bus for engine events
///
/// Events emitted before a subscription are not received by it.
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use airrank_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightType;

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(EngineEvent::DataReloaded {
            generation: 3,
            airline_count: 25,
            timestamp: chrono::Utc::now(),
        });

        match rx.recv().await.unwrap() {
            EngineEvent::DataReloaded {
                generation,
                airline_count,
                ..
            } => {
                assert_eq!(generation, 3);
                assert_eq!(airline_count, 25);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.emit_lossy(EngineEvent::DestinationsFailed {
            message: "timeout".into(),
            timestamp: chrono::Utc::now(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = EngineEvent::FiltersChanged {
            query: RankingQuery {
                days: 7,
                flight_type: FlightType::Departures,
                min_flights: 10,
                destination: Some("LHR".into()),
            },
            timestamp: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "FiltersChanged");
        assert_eq!(value["query"]["flight_type"], "departures");
        assert_eq!(event.event_type(), "FiltersChanged");
    }
}

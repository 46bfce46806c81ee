//! Ranking controller
//!
//! Single owner of engine state. User actions arrive as [`Command`]s and are
//! run through the pure filter/sort transitions; reloads go through the
//! [`RankingSource`] with a monotonically increasing generation so a response
//! that settles after a newer request was issued is discarded.
//!
//! The state lock is never held across a fetch.

use airrank_common::config::FilterDefaults;
use airrank_common::events::{EngineEvent, EventBus};
use airrank_common::models::{AirlineRef, FlightRecord, RankingsResponse};
use airrank_common::{Error, Result, SortColumn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, OnceCell, RwLock};
use tracing::{debug, info, warn};

use crate::cascade::{CascadeOptions, DestinationCatalog, DestinationSelection};
use crate::filters::{FilterCommand, FilterEffect, FilterState};
use crate::projector::{self, FilterMode, RankedRow, Summary};
use crate::sort::SortState;
use crate::source::RankingSource;

/// Default event channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Named user actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Filter(FilterCommand),
    ToggleSort(SortColumn),
    Refresh,
    /// Restore default filters and sort, then reload
    Reset,
}

/// Loading / success / error tri-state of the main rankings fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed { message: String },
}

/// What happened to one reload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied { airline_count: usize },
    Failed { message: String },
    /// A newer request was issued before this one settled
    Discarded,
}

/// Controller construction options
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub filter_mode: FilterMode,
    pub filter_defaults: FilterDefaults,
    pub event_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Backend,
            filter_defaults: FilterDefaults::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Destination cascade as shown to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeView {
    /// Hidden when the flight type does not support destination filtering
    pub visible: bool,
    /// Whether reference data has been loaded
    pub loaded: bool,
    pub selection: DestinationSelection,
    pub options: CascadeOptions,
}

/// Render-ready snapshot of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingView {
    pub status: LoadStatus,
    pub generation: u64,
    pub filters: FilterState,
    pub sort: SortState,
    pub filter_mode: FilterMode,
    pub rows: Vec<RankedRow>,
    pub summary: Summary,
    pub destinations: CascadeView,
    pub first_update: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Drill-down flight with its display status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRow {
    #[serde(flatten)]
    pub flight: FlightRecord,
    pub status_label: String,
}

/// Drill-down detail for one airline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineDetail {
    pub airline: AirlineRef,
    pub flights: Vec<FlightRow>,
    pub count: usize,
}

struct EngineState {
    filters: FilterState,
    sort: SortState,
    dataset: Option<RankingsResponse>,
    status: LoadStatus,
    last_update: Option<DateTime<Utc>>,
}

/// Owner of filters, sort, dataset and destination catalog
pub struct RankingController {
    source: Arc<dyn RankingSource>,
    state: RwLock<EngineState>,
    catalog: OnceCell<DestinationCatalog>,
    /// Latest issued reload generation
    generation: AtomicU64,
    events: EventBus,
    filter_mode: FilterMode,
    filter_defaults: FilterDefaults,
}

impl RankingController {
    pub fn new(source: Arc<dyn RankingSource>, options: ControllerOptions) -> Self {
        Self {
            source,
            state: RwLock::new(EngineState {
                filters: FilterState::from_defaults(&options.filter_defaults),
                sort: SortState::default(),
                dataset: None,
                status: LoadStatus::Loading,
                last_update: None,
            }),
            catalog: OnceCell::new(),
            generation: AtomicU64::new(0),
            events: EventBus::new(options.event_capacity),
            filter_mode: options.filter_mode,
            filter_defaults: options.filter_defaults,
        }
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn source_id(&self) -> &'static str {
        self.source.source_id()
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    /// Latest issued reload generation (0 before the first reload)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn filters(&self) -> FilterState {
        self.state.read().await.filters.clone()
    }

    pub async fn sort(&self) -> SortState {
        self.state.read().await.sort
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status.clone()
    }

    /// Initial load: rankings, plus destinations when the cascade is visible
    pub async fn initialize(&self) -> ReloadOutcome {
        let cascade_visible = self.state.read().await.filters.cascade_visible();
        self.reload_with_effect(FilterEffect {
            reload: true,
            load_destinations: cascade_visible,
        })
        .await
        .unwrap_or(ReloadOutcome::Discarded)
    }

    /// Run one command and return the resulting view
    pub async fn dispatch(&self, command: Command) -> Result<RankingView> {
        debug!(?command, "Dispatching command");

        match command {
            Command::Filter(filter_command) => {
                self.apply_filter(filter_command).await?;
            }
            Command::ToggleSort(column) => {
                self.toggle_sort(column).await;
            }
            Command::Refresh => {
                self.reload().await;
            }
            Command::Reset => {
                self.reset().await;
            }
        }

        Ok(self.view().await)
    }

    async fn apply_filter(&self, command: FilterCommand) -> Result<()> {
        // Rejected cascade commands must not trigger a reference data load
        self.state.read().await.filters.check_command(&command)?;

        let catalog = if command.needs_catalog() {
            Some(self.ensure_destinations().await?)
        } else {
            self.catalog.get()
        };

        let effect = {
            let mut state = self.state.write().await;
            let (next, effect) = state.filters.apply(command, catalog)?;
            state.filters = next;
            self.events.emit_lossy(EngineEvent::FiltersChanged {
                query: state.filters.ranking_query(),
                timestamp: Utc::now(),
            });
            effect
        };

        self.reload_with_effect(effect).await;
        Ok(())
    }

    async fn toggle_sort(&self, column: SortColumn) {
        let mut state = self.state.write().await;
        state.sort = state.sort.toggle(column);
        debug!(column = ?state.sort.column, descending = state.sort.descending, "Sort changed");
        self.events.emit_lossy(EngineEvent::SortChanged {
            column: state.sort.column,
            descending: state.sort.descending,
            timestamp: Utc::now(),
        });
    }

    async fn reset(&self) {
        let cascade_visible = {
            let mut state = self.state.write().await;
            state.filters = FilterState::from_defaults(&self.filter_defaults);
            state.sort = SortState::default();
            self.events.emit_lossy(EngineEvent::FiltersChanged {
                query: state.filters.ranking_query(),
                timestamp: Utc::now(),
            });
            self.events.emit_lossy(EngineEvent::SortChanged {
                column: state.sort.column,
                descending: state.sort.descending,
                timestamp: Utc::now(),
            });
            state.filters.cascade_visible()
        };
        info!("Filters and sort reset to defaults");

        self.reload_with_effect(FilterEffect {
            reload: true,
            load_destinations: cascade_visible,
        })
        .await;
    }

    /// Run the effects of a transition; the destination load and the reload
    /// proceed concurrently and fail independently
    async fn reload_with_effect(&self, effect: FilterEffect) -> Option<ReloadOutcome> {
        let load_destinations = async {
            if effect.load_destinations {
                // Failure is already logged and broadcast; the cascade stays empty
                let _ = self.ensure_destinations().await;
            }
        };
        let reload = async {
            if effect.reload {
                Some(self.reload().await)
            } else {
                None
            }
        };

        let ((), outcome) = tokio::join!(load_destinations, reload);
        outcome
    }

    /// Fetch rankings for the current filter snapshot and replace the dataset
    ///
    /// Only the latest issued generation is applied. A failure keeps the
    /// previous dataset and is not retried.
    pub async fn reload(&self) -> ReloadOutcome {
        let (generation, query) = {
            let mut state = self.state.write().await;
            state.status = LoadStatus::Loading;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (generation, state.filters.ranking_query())
        };

        info!(
            generation,
            source = self.source.source_id(),
            days = query.days,
            flight_type = %query.flight_type,
            min_flights = query.min_flights,
            destination = ?query.destination,
            "Reloading rankings"
        );
        self.events.emit_lossy(EngineEvent::ReloadStarted {
            generation,
            query: query.clone(),
            timestamp: Utc::now(),
        });

        let result = self.source.fetch_rankings(&query).await;

        let mut state = self.state.write().await;
        let latest_generation = self.generation.load(Ordering::SeqCst);
        if generation != latest_generation {
            debug!(generation, latest_generation, "Discarding stale rankings response");
            self.events.emit_lossy(EngineEvent::StaleResponseDiscarded {
                generation,
                latest_generation,
                timestamp: Utc::now(),
            });
            return ReloadOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                let airline_count = response.airlines.len();
                state.dataset = Some(response);
                state.status = LoadStatus::Ready;
                state.last_update = Some(Utc::now());
                info!(generation, airlines = airline_count, "Rankings loaded");
                self.events.emit_lossy(EngineEvent::DataReloaded {
                    generation,
                    airline_count,
                    timestamp: Utc::now(),
                });
                ReloadOutcome::Applied { airline_count }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(generation, error = %message, "Rankings fetch failed");
                state.status = LoadStatus::Failed {
                    message: message.clone(),
                };
                self.events.emit_lossy(EngineEvent::ReloadFailed {
                    generation,
                    message: message.clone(),
                    timestamp: Utc::now(),
                });
                ReloadOutcome::Failed { message }
            }
        }
    }

    /// Load destination reference data once; later calls reuse the cache
    ///
    /// A failed load is not cached, so the next call retries.
    pub async fn ensure_destinations(&self) -> Result<&DestinationCatalog> {
        let result = self
            .catalog
            .get_or_try_init(|| async {
                let destinations = self.source.fetch_destinations().await?;
                let catalog = DestinationCatalog::new(destinations);
                info!(count = catalog.len(), "Destination reference data loaded");
                self.events.emit_lossy(EngineEvent::DestinationsLoaded {
                    count: catalog.len(),
                    timestamp: Utc::now(),
                });
                Ok::<_, Error>(catalog)
            })
            .await;

        if let Err(e) = &result {
            warn!(error = %e, "Destination reference data failed to load");
            self.events.emit_lossy(EngineEvent::DestinationsFailed {
                message: e.to_string(),
                timestamp: Utc::now(),
            });
        }
        result
    }

    /// Cascade option lists for the current selection, loading reference data if needed
    pub async fn destination_options(&self) -> Result<CascadeView> {
        self.ensure_destinations().await?;
        let state = self.state.read().await;
        Ok(self.cascade_view(&state.filters))
    }

    fn cascade_view(&self, filters: &FilterState) -> CascadeView {
        let catalog = self.catalog.get();
        CascadeView {
            visible: filters.cascade_visible(),
            loaded: catalog.is_some(),
            selection: filters.destination.clone(),
            options: catalog
                .map(|c| c.options(&filters.destination))
                .unwrap_or_default(),
        }
    }

    /// Drill-down flights for `code` under the current filters
    ///
    /// Does not touch engine state; failures are returned to the caller only.
    pub async fn airline_flights(&self, code: &str) -> Result<AirlineDetail> {
        let code = code.trim();
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!("invalid airline code: {:?}", code)));
        }

        let query = self.state.read().await.filters.flight_query();
        debug!(code, days = query.days, "Fetching airline drill-down");

        let detail = self.source.fetch_airline_flights(code, &query).await?;
        let flights: Vec<FlightRow> = detail
            .flights
            .into_iter()
            .map(|flight| FlightRow {
                status_label: flight.status_label(),
                flight,
            })
            .collect();

        Ok(AirlineDetail {
            airline: detail.airline,
            count: flights.len(),
            flights,
        })
    }

    /// Project the current state for rendering
    pub async fn view(&self) -> RankingView {
        let state = self.state.read().await;
        let records = state
            .dataset
            .as_ref()
            .map(|d| d.airlines.as_slice())
            .unwrap_or_default();

        let ranking = projector::project(records, &state.sort, &state.filters, self.filter_mode);

        RankingView {
            status: state.status.clone(),
            generation: self.generation(),
            filters: state.filters.clone(),
            sort: state.sort,
            filter_mode: self.filter_mode,
            rows: ranking.rows,
            summary: ranking.summary,
            destinations: self.cascade_view(&state.filters),
            first_update: state.dataset.as_ref().and_then(|d| d.first_update.clone()),
            last_update: state.last_update,
        }
    }
}

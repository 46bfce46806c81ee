//! Filter state machine
//!
//! Transitions are pure: [`FilterState::apply`] returns the next state and the
//! effects the controller must run (reload, destination catalog load). The
//! current state is never mutated in place, so a rejected command leaves it
//! untouched.

use airrank_common::config::FilterDefaults;
use airrank_common::models::{FlightQuery, RankingQuery};
use airrank_common::{Error, FlightType, Result};
use serde::{Deserialize, Serialize};

use crate::cascade::{DestinationCatalog, DestinationSelection};

/// Active filter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub flight_type: FlightType,
    pub date_range_days: u32,
    pub min_flights: u32,
    pub destination: DestinationSelection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::from_defaults(&FilterDefaults::default())
    }
}

/// Named user actions on the filter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCommand {
    SetFlightType(FlightType),
    SetDateRange(u32),
    SetMinFlights(u32),
    /// `None` clears the continent and everything below it
    SelectContinent(Option<String>),
    /// `None` clears the country and the airport
    SelectCountry(Option<String>),
    /// `None` clears the destination filter
    SelectAirport(Option<String>),
}

impl FilterCommand {
    /// Whether validating this command needs the destination catalog
    pub fn needs_catalog(&self) -> bool {
        matches!(
            self,
            FilterCommand::SelectContinent(Some(_))
                | FilterCommand::SelectCountry(Some(_))
                | FilterCommand::SelectAirport(Some(_))
        )
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterEffect {
    /// Issue exactly one data reload with the new snapshot
    pub reload: bool,
    /// Make sure destination reference data is loaded
    pub load_destinations: bool,
}

impl FilterState {
    /// Initial state from configured defaults (no destination selected)
    pub fn from_defaults(defaults: &FilterDefaults) -> Self {
        Self {
            flight_type: defaults.flight_type,
            date_range_days: defaults.date_range_days.max(1),
            min_flights: defaults.min_flights,
            destination: DestinationSelection::default(),
        }
    }

    /// Whether the destination cascade is visible
    pub fn cascade_visible(&self) -> bool {
        self.flight_type.supports_destination()
    }

    /// Active destination filter, only meaningful when the cascade is visible
    pub fn destination_airport_code(&self) -> Option<&str> {
        if self.cascade_visible() {
            self.destination.airport_code.as_deref()
        } else {
            None
        }
    }

    /// Snapshot serialized as the rankings query string
    pub fn ranking_query(&self) -> RankingQuery {
        RankingQuery {
            days: self.date_range_days,
            flight_type: self.flight_type,
            min_flights: self.min_flights,
            destination: self.destination_airport_code().map(str::to_string),
        }
    }

    /// Snapshot used for the per-airline drill-down
    pub fn flight_query(&self) -> FlightQuery {
        FlightQuery {
            days: self.date_range_days,
            flight_type: self.flight_type,
            destination: self.destination_airport_code().map(str::to_string),
        }
    }

    /// Preconditions of `command` that do not depend on reference data
    ///
    /// Cascade selections need a visible cascade and their parent selection.
    /// Run before loading the catalog so a rejected command fetches nothing.
    pub fn check_command(&self, command: &FilterCommand) -> Result<()> {
        match command {
            FilterCommand::SelectContinent(_) => self.ensure_cascade_visible(),
            FilterCommand::SelectCountry(country) => {
                self.ensure_cascade_visible()?;
                if country.is_some() && self.destination.continent.is_none() {
                    return Err(Error::InvalidState(
                        "select a continent before a country".to_string(),
                    ));
                }
                Ok(())
            }
            FilterCommand::SelectAirport(airport_code) => {
                self.ensure_cascade_visible()?;
                if airport_code.is_some() && self.destination.country.is_none() {
                    return Err(Error::InvalidState(
                        "select a country before an airport".to_string(),
                    ));
                }
                Ok(())
            }
            FilterCommand::SetFlightType(_)
            | FilterCommand::SetDateRange(_)
            | FilterCommand::SetMinFlights(_) => Ok(()),
        }
    }

    /// Apply `command`, returning the next state and the effects to run
    ///
    /// `catalog` must be provided for cascade selections (see
    /// [`FilterCommand::needs_catalog`]); values outside the current option
    /// lists are rejected.
    pub fn apply(
        &self,
        command: FilterCommand,
        catalog: Option<&DestinationCatalog>,
    ) -> Result<(FilterState, FilterEffect)> {
        self.check_command(&command)?;
        let mut next = self.clone();
        let mut effect = FilterEffect {
            reload: true,
            load_destinations: false,
        };

        match command {
            FilterCommand::SetFlightType(flight_type) => {
                next.flight_type = flight_type;
                if flight_type.supports_destination() {
                    effect.load_destinations = true;
                } else {
                    next.destination = DestinationSelection::default();
                }
            }

            FilterCommand::SetDateRange(days) => {
                if days == 0 {
                    return Err(Error::InvalidInput(
                        "date range must be at least 1 day".to_string(),
                    ));
                }
                next.date_range_days = days;
            }

            FilterCommand::SetMinFlights(min_flights) => {
                next.min_flights = min_flights;
            }

            FilterCommand::SelectContinent(continent) => {
                if let Some(c) = &continent {
                    let catalog = require_catalog(catalog)?;
                    if !catalog.continents().iter().any(|known| known == c) {
                        return Err(Error::InvalidInput(format!("unknown continent: {}", c)));
                    }
                }
                next.destination = DestinationSelection {
                    continent,
                    country: None,
                    airport_code: None,
                };
            }

            FilterCommand::SelectCountry(country) => {
                if let Some(c) = &country {
                    let continent = self.destination.continent.as_deref().unwrap_or_default();
                    let catalog = require_catalog(catalog)?;
                    if !catalog.countries(continent).iter().any(|known| known == c) {
                        return Err(Error::InvalidInput(format!(
                            "country {} is not on continent {}",
                            c, continent
                        )));
                    }
                }
                next.destination.country = country;
                next.destination.airport_code = None;
            }

            FilterCommand::SelectAirport(airport_code) => {
                if let Some(code) = &airport_code {
                    let country = self.destination.country.as_deref().unwrap_or_default();
                    let catalog = require_catalog(catalog)?;
                    if !catalog.airports(country).iter().any(|a| &a.code == code) {
                        return Err(Error::InvalidInput(format!(
                            "airport {} is not in {}",
                            code, country
                        )));
                    }
                }
                next.destination.airport_code = airport_code;
            }
        }

        Ok((next, effect))
    }

    fn ensure_cascade_visible(&self) -> Result<()> {
        if self.cascade_visible() {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "destination filtering is unavailable for {}",
                self.flight_type
            )))
        }
    }
}

fn require_catalog(catalog: Option<&DestinationCatalog>) -> Result<&DestinationCatalog> {
    catalog.ok_or_else(|| {
        Error::InvalidState("destination reference data is not loaded".to_string())
    })
}

//! Destination catalog and cascading option lists
//!
//! continent -> country -> airport. A child list is derived only from
//! destinations matching the selected parent, so every option offered is
//! a subset of the parent's destinations.

use airrank_common::Destination;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selected values of the continent -> country -> airport chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSelection {
    pub continent: Option<String>,
    pub country: Option<String>,
    pub airport_code: Option<String>,
}

impl DestinationSelection {
    pub fn is_empty(&self) -> bool {
        self.continent.is_none() && self.country.is_none() && self.airport_code.is_none()
    }
}

/// Airport entry offered in the airport select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportOption {
    pub code: String,
    pub name: String,
}

/// Option lists for the three selects, given the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeOptions {
    pub continents: Vec<String>,
    pub countries: Vec<String>,
    pub airports: Vec<AirportOption>,
}

/// Immutable destination reference data, cached for the session
#[derive(Debug, Clone, Default)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
}

impl DestinationCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Distinct continents, case-sensitive lexicographic order; unclassified entries skipped
    pub fn continents(&self) -> Vec<String> {
        self.destinations
            .iter()
            .filter_map(|d| d.continent.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct countries of destinations on `continent`, case-sensitive order
    pub fn countries(&self, continent: &str) -> Vec<String> {
        self.destinations
            .iter()
            .filter(|d| d.continent.as_deref() == Some(continent))
            .filter_map(|d| d.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Destinations in `country`, ordered by display name ignoring case
    ///
    /// Absent names sort as the empty string. Equal names keep catalog order.
    pub fn airports(&self, country: &str) -> Vec<AirportOption> {
        let mut airports: Vec<&Destination> = self
            .destinations
            .iter()
            .filter(|d| d.country.as_deref() == Some(country))
            .collect();

        airports.sort_by_cached_key(|d| d.display_name().to_lowercase());

        airports
            .into_iter()
            .map(|d| AirportOption {
                code: d.code.clone(),
                name: d.display_name().to_string(),
            })
            .collect()
    }

    /// Option lists for `selection`; a child list is empty until its parent is chosen
    pub fn options(&self, selection: &DestinationSelection) -> CascadeOptions {
        let countries = selection
            .continent
            .as_deref()
            .map(|c| self.countries(c))
            .unwrap_or_default();
        let airports = selection
            .country
            .as_deref()
            .map(|c| self.airports(c))
            .unwrap_or_default();

        CascadeOptions {
            continents: self.continents(),
            countries,
            airports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(code: &str, name: Option<&str>, country: Option<&str>, continent: Option<&str>) -> Destination {
        Destination {
            code: code.to_string(),
            name: name.map(str::to_string),
            country: country.map(str::to_string),
            continent: continent.map(str::to_string),
        }
    }

    fn catalog() -> DestinationCatalog {
        DestinationCatalog::new(vec![
            dest("LHR", Some("London Heathrow"), Some("United Kingdom"), Some("Europe")),
            dest("CDG", Some("Paris Charles de Gaulle"), Some("France"), Some("Europe")),
            dest("LGW", Some("london Gatwick"), Some("United Kingdom"), Some("Europe")),
            dest("ORY", Some("Paris Orly"), Some("France"), Some("Europe")),
            dest("JFK", Some("New York JFK"), Some("United States"), Some("North America")),
            dest("XXX", None, Some("United Kingdom"), Some("Europe")),
            dest("ZZZ", Some("Unclassified Field"), None, None),
            dest("aaa", Some("Lowercase Country"), Some("belgium"), Some("Europe")),
        ])
    }

    #[test]
    fn test_continents_distinct_sorted_skip_absent() {
        assert_eq!(catalog().continents(), vec!["Europe", "North America"]);
    }

    #[test]
    fn test_countries_case_sensitive_order() {
        // Uppercase sorts before lowercase
        assert_eq!(
            catalog().countries("Europe"),
            vec!["France", "United Kingdom", "belgium"]
        );
    }

    #[test]
    fn test_countries_subset_of_continent() {
        let cat = catalog();
        for continent in cat.continents() {
            for country in cat.countries(&continent) {
                assert!(cat.destinations().iter().any(|d| {
                    d.continent.as_deref() == Some(continent.as_str())
                        && d.country.as_deref() == Some(country.as_str())
                }));
            }
        }
    }

    #[test]
    fn test_airports_sorted_by_name_ignoring_case() {
        let codes: Vec<String> = catalog()
            .airports("United Kingdom")
            .into_iter()
            .map(|a| a.code)
            .collect();
        // Missing name sorts as "" first
        assert_eq!(codes, vec!["XXX", "LGW", "LHR"]);
    }

    #[test]
    fn test_airports_subset_of_country() {
        let cat = catalog();
        for airport in cat.airports("France") {
            let d = cat
                .destinations()
                .iter()
                .find(|d| d.code == airport.code)
                .unwrap();
            assert_eq!(d.country.as_deref(), Some("France"));
        }
    }

    #[test]
    fn test_options_children_empty_without_parent() {
        let options = catalog().options(&DestinationSelection::default());
        assert_eq!(options.continents.len(), 2);
        assert!(options.countries.is_empty());
        assert!(options.airports.is_empty());

        let options = catalog().options(&DestinationSelection {
            continent: Some("Europe".into()),
            country: Some("France".into()),
            airport_code: None,
        });
        assert_eq!(options.countries.len(), 3);
        assert_eq!(options.airports.len(), 2);
    }
}

//! Sort state machine
//!
//! Exactly one active column at a time. Reselecting the active column flips
//! the direction; selecting another column resets to descending.

use airrank_common::SortColumn;
use serde::{Deserialize, Serialize};

/// Current display sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for SortState {
    /// Reliability score, descending
    fn default() -> Self {
        Self {
            column: SortColumn::ReliabilityScore,
            descending: true,
        }
    }
}

impl SortState {
    /// Return the state after the user selects `column`
    pub fn toggle(self, column: SortColumn) -> Self {
        if column == self.column {
            Self {
                column,
                descending: !self.descending,
            }
        } else {
            Self {
                column,
                descending: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sort = SortState::default();
        assert_eq!(sort.column, SortColumn::ReliabilityScore);
        assert!(sort.descending);
    }

    #[test]
    fn test_same_column_flips_direction() {
        let sort = SortState::default().toggle(SortColumn::ReliabilityScore);
        assert_eq!(sort.column, SortColumn::ReliabilityScore);
        assert!(!sort.descending);

        let sort = sort.toggle(SortColumn::ReliabilityScore);
        assert!(sort.descending);
    }

    #[test]
    fn test_new_column_resets_to_descending() {
        let sort = SortState::default()
            .toggle(SortColumn::ReliabilityScore)
            .toggle(SortColumn::OnTimePercentage);
        assert_eq!(sort.column, SortColumn::OnTimePercentage);
        assert!(sort.descending);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(SortState::default()).unwrap();
        assert_eq!(value["column"], "reliabilityScore");
        assert_eq!(value["descending"], true);
    }
}

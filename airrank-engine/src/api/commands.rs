//! Command endpoint
//!
//! Accepts one JSON command per request, tagged by `"command"`:
//!
//! ```json
//! {"command": "set_flight_type", "value": "departures"}
//! {"command": "select_continent", "value": "Europe"}
//! {"command": "select_continent", "value": null}
//! {"command": "toggle_sort", "column": "onTimePercentage"}
//! {"command": "refresh"}
//! ```

use airrank_common::{FlightType, SortColumn};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::api::{ApiError, ApiResult};
use crate::controller::{Command, RankingView};
use crate::filters::FilterCommand;
use crate::AppState;

/// Wire form of [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandRequest {
    SetFlightType { value: FlightType },
    SetDateRange { value: u32 },
    SetMinFlights { value: u32 },
    SelectContinent {
        #[serde(default)]
        value: Option<String>,
    },
    SelectCountry {
        #[serde(default)]
        value: Option<String>,
    },
    SelectAirport {
        #[serde(default)]
        value: Option<String>,
    },
    ToggleSort { column: SortColumn },
    Refresh,
    Reset,
}

impl From<CommandRequest> for Command {
    fn from(request: CommandRequest) -> Self {
        match request {
            CommandRequest::SetFlightType { value } => {
                Command::Filter(FilterCommand::SetFlightType(value))
            }
            CommandRequest::SetDateRange { value } => {
                Command::Filter(FilterCommand::SetDateRange(value))
            }
            CommandRequest::SetMinFlights { value } => {
                Command::Filter(FilterCommand::SetMinFlights(value))
            }
            CommandRequest::SelectContinent { value } => {
                Command::Filter(FilterCommand::SelectContinent(non_blank(value)))
            }
            CommandRequest::SelectCountry { value } => {
                Command::Filter(FilterCommand::SelectCountry(non_blank(value)))
            }
            CommandRequest::SelectAirport { value } => {
                Command::Filter(FilterCommand::SelectAirport(non_blank(value)))
            }
            CommandRequest::ToggleSort { column } => Command::ToggleSort(column),
            CommandRequest::Refresh => Command::Refresh,
            CommandRequest::Reset => Command::Reset,
        }
    }
}

/// An empty dropdown value means "no selection"
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/commands
///
/// Runs the command and returns the resulting view. Reload-triggering
/// commands return after the reload settles.
pub async fn post_command(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> ApiResult<Json<RankingView>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let view = state.controller.dispatch(request.into()).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CommandRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::from(parse(r#"{"command":"set_flight_type","value":"arrivals"}"#)),
            Command::Filter(FilterCommand::SetFlightType(FlightType::Arrivals))
        );
        assert_eq!(
            Command::from(parse(r#"{"command":"toggle_sort","column":"avgDelay"}"#)),
            Command::ToggleSort(SortColumn::AvgDelay)
        );
        assert_eq!(Command::from(parse(r#"{"command":"refresh"}"#)), Command::Refresh);
    }

    #[test]
    fn test_blank_selection_clears() {
        assert_eq!(
            Command::from(parse(r#"{"command":"select_continent","value":""}"#)),
            Command::Filter(FilterCommand::SelectContinent(None))
        );
        assert_eq!(
            Command::from(parse(r#"{"command":"select_country"}"#)),
            Command::Filter(FilterCommand::SelectCountry(None))
        );
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(serde_json::from_str::<CommandRequest>(r#"{"command":"fly"}"#).is_err());
        assert!(serde_json::from_str::<CommandRequest>(
            r#"{"command":"set_date_range","value":-1}"#
        )
        .is_err());
    }
}

//! HTTP API handlers for airrank-engine

pub mod commands;
pub mod destinations;
pub mod error;
pub mod flights;
pub mod health;
pub mod sse;
pub mod view;

pub use commands::post_command;
pub use destinations::get_destination_options;
pub use error::{ApiError, ApiResult};
pub use flights::get_airline_flights;
pub use health::health_routes;
pub use sse::event_stream;
pub use view::get_view;

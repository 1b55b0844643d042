//! Web layer for the bike-share dashboard.
//!
//! Serves the dashboard page, its HTML fragment, and JSON views of the
//! latest published station data.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;

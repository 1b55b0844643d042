//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::present::{InvalidSort, TableSort, sort_table_rows};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/fragment/dashboard", get(dashboard_fragment))
        .route("/api/dashboard", get(dashboard_json))
        .route("/api/stations", get(stations_json))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dashboard page, rendered with whatever state is current.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let current = state.cell.current().await;

    let template = IndexTemplate {
        title: state.title.to_string(),
        refresh_ms: state.refresh_interval.as_millis(),
        panel: PanelView::from_state(&current, TableSort::default()),
    };
    render(&template)
}

/// KPI strip, error banner and station table, for in-place refresh.
async fn dashboard_fragment(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> Result<Html<String>, AppError> {
    let sort = query.table_sort()?;
    let current = state.cell.current().await;

    render(&DashboardPanelTemplate {
        panel: PanelView::from_state(&current, sort),
    })
}

/// Full dashboard state as JSON.
async fn dashboard_json(State(state): State<AppState>) -> Json<DashboardResponse> {
    let current = state.cell.current().await;
    Json(DashboardResponse::from_state(&current))
}

/// Table rows of the current (or last good) snapshot, sorted.
async fn stations_json(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> Result<Json<StationsResponse>, AppError> {
    let sort = query.table_sort()?;
    let current = state.cell.current().await;

    let mut rows = current
        .snapshot()
        .map(|s| s.table_rows.clone())
        .unwrap_or_default();
    sort_table_rows(&mut rows, sort);

    Ok(Json(StationsResponse {
        stale: current.is_stale(),
        sort: sort.column.to_string(),
        order: if sort.descending { "desc" } else { "asc" },
        rows,
    }))
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<InvalidSort> for AppError {
    fn from(e: InvalidSort) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "Bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

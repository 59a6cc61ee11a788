use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use sea_orm::DatabaseBackend;
use serde::Serialize;

use crate::{
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub database: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

/// Liveness only; the database is reported by backend name, not pinged.
async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let database = match state.db.get_database_backend() {
        DatabaseBackend::Postgres => "postgres",
        DatabaseBackend::Sqlite => "sqlite",
        _ => "other",
    };
    JsonApiResponse::ok(HealthResponse { ok: true, database })
}

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

/// The full application over a mock Postgres connection.
pub fn mock_app(mock: MockDatabase) -> Router {
    mock_app_with_db(mock.into_connection())
}

pub fn mock_app_with_db(db: DatabaseConnection) -> Router {
    app(AppState::new(AppConfig::default(), db))
}

pub fn empty_mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// The full application over a fresh in-memory SQLite database with the
/// schema synced from the entities.
pub async fn sqlite_app() -> anyhow::Result<(Router, DatabaseConnection)> {
    let cfg = AppConfig {
        database: DatabaseConfig::in_memory_sqlite(),
        ..AppConfig::default()
    };
    let db = connection::connect(&cfg.database).await?;
    let router = app(AppState::new(cfg, db.clone()));
    Ok((router, db))
}

use std::time::Duration;

use anyhow::{Context, Result, bail};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
const ENTITY_REGISTRY_PREFIX: &str = "restaurant_api::db::entities::*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Option<Self> {
        let normalized = url.trim().to_ascii_lowercase();
        if normalized.starts_with("postgres://") || normalized.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if normalized.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Opens the pool, applies backend session settings and syncs the schema
/// from the registered entities.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let Some(backend) = Backend::from_url(&cfg.url) else {
        bail!(
            "unsupported database url '{}'; expected scheme postgres://, postgresql:// or sqlite:",
            redact_url(&cfg.url)
        );
    };

    let db = Database::connect(connect_options(cfg, backend))
        .await
        .with_context(|| format!("failed to connect to {} database", backend.as_str()))?;

    if backend == Backend::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
    }

    sync_schema(&db).await?;
    info!(backend = backend.as_str(), "database ready");
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry(ENTITY_REGISTRY_PREFIX)
        .sync(db)
        .await
        .context("schema sync failed")?;
    Ok(())
}

fn connect_options(cfg: &DatabaseConfig, backend: Backend) -> ConnectOptions {
    // sqlite runs on a single pooled connection
    let (max, min) = match backend {
        Backend::Sqlite => (1, cfg.min_idle.min(1)),
        Backend::Postgres => (cfg.max_connections, cfg.min_idle),
    };

    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(false);
    options
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}

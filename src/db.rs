use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::DbConfig;

/// Failure reported by a repository. Uniqueness and foreign key violations
/// are kept apart so services can turn them into conflicts or not-founds.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    /// Carries the violated constraint's name when the database reports it.
    #[error("referenced row does not exist")]
    MissingReference(Option<String>),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingReference(db.constraint().map(str::to_string));
            }
        }
        StoreError::Other(e.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect(&cfg.url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    Ok(())
}

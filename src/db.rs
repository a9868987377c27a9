use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Raised by repositories when a write hits a unique constraint.
#[derive(Debug, Error)]
#[error("duplicate value for unique key {0}")]
pub struct DuplicateKey(pub &'static str);

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgRepo {
    pub(crate) pool: PgPool,
}

impl PgRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")
}

/// Maps a unique violation to `DuplicateKey`, anything else to a contextual error.
pub(crate) fn map_write_err(e: sqlx::Error, key: &'static str, what: &'static str) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return DuplicateKey(key).into();
        }
    }
    anyhow::Error::new(e).context(what)
}

pub(crate) fn is_duplicate(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DuplicateKey>().is_some()
}

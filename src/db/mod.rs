//! Database module for PostgreSQL persistence of prediction logs

pub mod models;
pub mod repository;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

use crate::model::PredictionLogEntry;

// Environment variable names
const ENV_DATABASE_URL: &str = "DATABASE_URL";
const ENV_POSTGRES_HOST: &str = "ATTRITION_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "ATTRITION_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "ATTRITION_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "ATTRITION_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "ATTRITION_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "attrition_user";
const DEFAULT_POSTGRES_PASSWORD: &str = "attrition_pass";
const DEFAULT_POSTGRES_DB: &str = "attrition_db";

const MAX_CONNECTIONS: u32 = 10;
/// Bounds how long a prediction waits on the log when PostgreSQL stops answering
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

/// Append-only sink for prediction audit records
#[async_trait]
pub trait PredictionLog: Send + Sync {
    async fn record(&self, entry: &PredictionLogEntry) -> Result<(), DbError>;

    /// Check that the underlying store is reachable
    async fn ping(&self) -> Result<(), DbError>;
}

/// Build the connection URL, preferring `DATABASE_URL` when set
fn database_url() -> String {
    if let Ok(url) = env::var(ENV_DATABASE_URL) {
        return url;
    }

    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    )
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let pool = pool_options().connect(&database_url()).await?;

    tracing::info!("PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            id BIGSERIAL PRIMARY KEY,
            date_prediction TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            age BIGINT NOT NULL,
            revenu_mensuel DOUBLE PRECISION NOT NULL,
            departement VARCHAR(64) NOT NULL,
            poste VARCHAR(64) NOT NULL,
            heure_supplementaires VARCHAR(8) NOT NULL,
            frequence_deplacement VARCHAR(32) NOT NULL,
            prediction SMALLINT NOT NULL,
            label VARCHAR(64) NOT NULL,
            probabilite_depart DOUBLE PRECISION NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_predictions_date_prediction ON predictions(date_prediction)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_gives_up_quickly_on_unreachable_database() {
        let options = pool_options();
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
        assert!(options.get_acquire_timeout() <= Duration::from_secs(5));
        assert_eq!(options.get_max_connections(), MAX_CONNECTIONS);
    }
}

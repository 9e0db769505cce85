//! Repository for prediction log database operations

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::StoredPrediction;
use super::{DbError, PredictionLog};
use crate::model::PredictionLogEntry;

/// Repository for prediction log operations
#[derive(Clone)]
pub struct PredictionRepository {
    pool: PgPool,
}

impl PredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a prediction log entry
    pub async fn insert(&self, entry: &PredictionLogEntry) -> Result<StoredPrediction, DbError> {
        let stored: StoredPrediction = sqlx::query_as(
            r#"
            INSERT INTO predictions (
                date_prediction, age, revenu_mensuel, departement, poste,
                heure_supplementaires, frequence_deplacement,
                prediction, label, probabilite_depart
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, date_prediction
            "#,
        )
        .bind(entry.logged_at)
        .bind(entry.age)
        .bind(entry.revenu_mensuel)
        .bind(&entry.departement)
        .bind(&entry.poste)
        .bind(&entry.heure_supplementaires)
        .bind(&entry.frequence_deplacement)
        .bind(i16::from(entry.prediction))
        .bind(&entry.label)
        .bind(entry.probabilite_depart)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            id = stored.id,
            date_prediction = %stored.date_prediction,
            "Inserted prediction log"
        );
        Ok(stored)
    }
}

#[async_trait]
impl PredictionLog for PredictionRepository {
    async fn record(&self, entry: &PredictionLogEntry) -> Result<(), DbError> {
        self.insert(entry).await.map(|_| ())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

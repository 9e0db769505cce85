//! Database models for prediction logs

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Keys assigned to a prediction log row on insert
#[derive(Debug, Clone, FromRow)]
pub struct StoredPrediction {
    pub id: i64,
    pub date_prediction: DateTime<Utc>,
}

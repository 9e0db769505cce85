//! Prediction service: encode, classify, then log the outcome

use std::sync::Arc;

use crate::db::PredictionLog;
use crate::model::{EmployeeRecord, PredictionLogEntry, PredictionResult};

use super::encoder::encode;
use super::predictor::{ModelState, PredictionError, Predictor};

/// Service turning employee records into logged predictions
pub struct PredictionService {
    model: ModelState,
    log: Option<Arc<dyn PredictionLog>>,
}

impl PredictionService {
    pub fn new(model: ModelState, log: Option<Arc<dyn PredictionLog>>) -> Self {
        Self { model, log }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    pub fn log(&self) -> Option<&Arc<dyn PredictionLog>> {
        self.log.as_ref()
    }

    /// Loaded predictor, or `ModelUnavailable`
    pub fn predictor(&self) -> Result<&Predictor, PredictionError> {
        self.model.predictor()
    }

    /// Predict attrition for one employee
    ///
    /// The log write is best-effort: its failure is reported in the service
    /// log and never affects the returned result.
    pub async fn predict(&self, record: &EmployeeRecord) -> Result<PredictionResult, PredictionError> {
        let predictor = self.predictor()?;
        let row = encode(record, predictor.schema());
        let result = predictor.predict(&row)?;

        tracing::info!(
            prediction = result.class.as_u8(),
            probability = result.probability,
            "Prediction computed"
        );

        self.record(record, &result).await;

        Ok(result)
    }

    async fn record(&self, record: &EmployeeRecord, result: &PredictionResult) {
        let Some(log) = &self.log else {
            tracing::debug!("Prediction log disabled, skipping");
            return;
        };

        let entry = PredictionLogEntry::new(record, result);
        if let Err(e) = log.record(&entry).await {
            tracing::warn!(error = %e, "Failed to record prediction, continuing");
        }
    }
}

//! Attrition predictor and process-wide model state

use std::sync::Arc;

use crate::model::{AttritionClass, ModelConfig, PredictionResult};

use super::classifier::{Classifier, ClassifierError, ModelArtifact};
use super::encoder::{FeatureVector, unencoded_columns};
use super::schema::{FeatureSchema, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Feature row does not match the model schema")]
    SchemaMismatch,

    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Classifier returned an undefined class: {0}")]
    InvalidClass(String),

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Errors raised while loading the model artifacts at startup
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Model expects {model} features but the schema lists {schema}")]
    WidthMismatch { model: usize, schema: usize },
}

/// Fitted classifier bound to the feature schema it was trained on
pub struct Predictor {
    schema: FeatureSchema,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("features", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl Predictor {
    pub fn new(
        schema: FeatureSchema,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ModelLoadError> {
        if classifier.n_features() != schema.len() {
            return Err(ModelLoadError::WidthMismatch {
                model: classifier.n_features(),
                schema: schema.len(),
            });
        }
        Ok(Self { schema, classifier })
    }

    /// Load the classifier and its feature schema from disk
    pub fn load(config: &ModelConfig) -> Result<Self, ModelLoadError> {
        let schema = FeatureSchema::load(&config.feature_names_path)?;

        let unencoded = unencoded_columns(&schema);
        if !unencoded.is_empty() {
            tracing::warn!(
                columns = ?unencoded,
                "Feature schema lists columns the encoder never produces, they will be zero"
            );
        }

        let artifact = ModelArtifact::load(&config.path)?;
        Self::new(schema, Box::new(artifact))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Classify one encoded row
    pub fn predict(&self, row: &FeatureVector) -> Result<PredictionResult, PredictionError> {
        if row.schema() != &self.schema {
            return Err(PredictionError::SchemaMismatch);
        }

        let probability = self.classifier.predict_proba(row.values())?;
        if probability.is_nan() {
            return Err(PredictionError::InvalidProbability(probability));
        }

        let class = AttritionClass::try_from(self.classifier.decide(probability))
            .map_err(PredictionError::InvalidClass)?;

        Ok(PredictionResult {
            class,
            probability: round4(probability.clamp(0.0, 1.0)),
        })
    }
}

/// Model availability, decided once at startup and never changed
#[derive(Debug, Clone)]
pub enum ModelState {
    Ready(Arc<Predictor>),
    Unavailable { reason: String },
}

impl ModelState {
    /// Load the model artifacts, degrading to `Unavailable` on any failure
    pub fn load(config: &ModelConfig) -> Self {
        match Predictor::load(config) {
            Ok(predictor) => {
                tracing::info!(
                    model = %config.path.display(),
                    features = predictor.schema().len(),
                    "Model loaded"
                );
                ModelState::Ready(Arc::new(predictor))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model = %config.path.display(),
                    feature_names = %config.feature_names_path.display(),
                    "Model unavailable, predictions will be refused"
                );
                ModelState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    pub fn predictor(&self) -> Result<&Predictor, PredictionError> {
        match self {
            ModelState::Ready(predictor) => Ok(predictor),
            ModelState::Unavailable { reason } => {
                Err(PredictionError::ModelUnavailable(reason.clone()))
            }
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

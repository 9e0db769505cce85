//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use actix_web::web;

use crate::api::ApiKeyVerifier;
use crate::db::PredictionLog;
use crate::db::repository::PredictionRepository;
use crate::model::Config;
use crate::service::{ModelState, PredictionService};

/// Application state containing all services and shared resources
///
/// Everything here is built once before the server starts and is read-only
/// afterwards; handlers receive it through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Prediction service holding the loaded model and the prediction log
    pub prediction_service: web::Data<PredictionService>,
    /// API key check for protected endpoints
    pub api_key: web::Data<ApiKeyVerifier>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Model and feature schema loading (degrades to "model unavailable")
    /// 2. Database connection and schema initialization (optional)
    /// 3. API key setup
    pub async fn new(config: Config) -> Self {
        let model = ModelState::load(&config.model);
        let log = Self::build_prediction_log().await;

        let api_key = ApiKeyVerifier::new(config.api_key.as_deref());
        if !api_key.is_configured() {
            tracing::warn!("API_KEY is not set, every prediction request will be rejected");
        }

        Self::from_parts(PredictionService::new(model, log), api_key)
    }

    pub fn from_parts(prediction_service: PredictionService, api_key: ApiKeyVerifier) -> Self {
        Self {
            prediction_service: web::Data::new(prediction_service),
            api_key: web::Data::new(api_key),
        }
    }

    /// Connect the prediction log (optional - will log warning if PostgreSQL is unavailable)
    async fn build_prediction_log() -> Option<Arc<dyn PredictionLog>> {
        let pool = match crate::db::create_pool().await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL unavailable, predictions will not be logged");
                return None;
            }
        };

        if let Err(e) = crate::db::init_schema(&pool).await {
            tracing::warn!(error = %e, "Failed to initialize database schema, predictions will not be logged");
            return None;
        }

        tracing::info!("Prediction log enabled");
        Some(Arc::new(PredictionRepository::new(pool)))
    }

    /// Register shared state and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.prediction_service.clone())
            .app_data(self.api_key.clone())
            .configure(crate::api::health::configure)
            .configure(crate::api::predict::configure)
            .configure(crate::api::openapi::configure);
    }
}

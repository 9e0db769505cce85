//! Root, liveness and readiness endpoints

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::PredictionService;

#[derive(Serialize, ToSchema)]
pub struct RootMessage {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub model: String,
    pub database: String,
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = RootMessage)
    ),
    tag = "health"
)]
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(RootMessage {
        message: "API Attrition RH opérationnelle".to_string(),
    })
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the process is serving requests, even when the
/// model failed to load.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
    })
}

/// Readiness probe endpoint
///
/// Ready means the model is loaded. The prediction log is reported but not
/// required, since predictions are served without it.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Model not loaded", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(service: web::Data<PredictionService>) -> impl Responder {
    let model_ready = service.model().is_ready();
    let model_status = if model_ready { "loaded" } else { "unavailable" };

    let database_status = match service.log() {
        Some(log) => match log.ping().await {
            Ok(()) => {
                tracing::debug!("Database health check passed");
                "healthy"
            }
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                "unhealthy"
            }
        },
        None => "disabled",
    };

    let status = ReadinessStatus {
        status: if model_ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            model: model_status.to_string(),
            database: database_status.to_string(),
        },
    };

    if model_ready {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(liveness).service(readiness);
}

//! OpenAPI specification endpoint

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use super::error::ErrorResponse;
use super::health::{DependencyHealth, HealthStatus, ReadinessStatus, RootMessage};
use crate::model::{
    Department, EmployeeRecord, FieldOfStudy, Gender, JobRole, MaritalStatus, Overtime,
    PredictionOutput, TravelFrequency,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Attrition RH",
        description = "Prédit si un employé va quitter l'entreprise"
    ),
    paths(
        crate::api::health::root,
        crate::api::health::liveness,
        crate::api::health::readiness,
        crate::api::predict::predict,
    ),
    components(schemas(
        EmployeeRecord,
        Overtime,
        TravelFrequency,
        Gender,
        MaritalStatus,
        Department,
        JobRole,
        FieldOfStudy,
        PredictionOutput,
        ErrorResponse,
        RootMessage,
        HealthStatus,
        ReadinessStatus,
        DependencyHealth,
    )),
    tags(
        (name = "prediction", description = "Attrition risk prediction"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json);
}

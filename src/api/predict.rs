//! Attrition prediction endpoint

use actix_web::{HttpRequest, HttpResponse, post, web};

use super::auth::ApiKeyVerifier;
use super::error::{ApiError, ErrorResponse};
use crate::model::{EmployeeRecord, PredictionOutput};
use crate::service::PredictionService;

/// Predict whether an employee is likely to leave
///
/// Checks run in order: API key, model availability, body validation.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = EmployeeRecord,
    params(
        ("X-API-Key" = String, Header, description = "API key")
    ),
    responses(
        (status = 200, description = "Prediction computed", body = PredictionOutput),
        (status = 401, description = "Missing API key", body = ErrorResponse),
        (status = 403, description = "Invalid API key", body = ErrorResponse),
        (status = 422, description = "Invalid employee record", body = ErrorResponse),
        (status = 503, description = "Model not available", body = ErrorResponse),
        (status = 500, description = "Prediction failed", body = ErrorResponse)
    ),
    tag = "prediction"
)]
#[post("/predict")]
pub async fn predict(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<ApiKeyVerifier>,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse, ApiError> {
    verifier.verify(req.headers())?;
    service.predictor()?;

    let record: EmployeeRecord =
        serde_json::from_slice(&body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let result = service.predict(&record).await?;

    Ok(HttpResponse::Ok().json(PredictionOutput::from(result)))
}

/// Configure prediction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(predict);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::app::AppState;
    use crate::service::classifier::{Classifier, ClassifierError, LogisticRegression};
    use crate::service::encoder::encoded_columns;
    use crate::service::ModelState;
    use crate::service::predictor::Predictor;
    use crate::service::schema::FeatureSchema;

    const API_KEY: &str = "ma_cle_secrete";

    fn valid_input() -> Value {
        json!({
            "age": 35,
            "revenu_mensuel": 5000.0,
            "heure_supplementaires": "Oui",
            "satisfaction_employee_environnement": 2,
            "frequence_deplacement": "Frequent"
        })
    }

    fn ready_model() -> ModelState {
        let schema = FeatureSchema::new(encoded_columns()).unwrap();
        let coefficients = schema
            .columns()
            .iter()
            .map(|c| match c.as_str() {
                "heure_supplementaires_encoded" => 1.8,
                "frequence_deplacement_encoded" => 0.6,
                "satisfaction_employee_environnement" => -0.7,
                _ => 0.0,
            })
            .collect();
        let classifier = LogisticRegression {
            coefficients,
            intercept: -0.4,
            scaler: None,
        };
        ModelState::Ready(Arc::new(
            Predictor::new(schema, Box::new(classifier)).unwrap(),
        ))
    }

    fn state(model: ModelState) -> AppState {
        AppState::from_parts(
            PredictionService::new(model, None),
            ApiKeyVerifier::new(Some(API_KEY)),
        )
    }

    async fn post_predict(model: ModelState, key: Option<&str>, body: Value) -> (StatusCode, Value) {
        let state = state(model);
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let mut req = test::TestRequest::post().uri("/predict").set_json(body);
        if let Some(key) = key {
            req = req.insert_header(("X-API-Key", key));
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_predict_valid_input() {
        let (status, body) = post_predict(ready_model(), Some(API_KEY), valid_input()).await;

        assert_eq!(status, StatusCode::OK);
        let prediction = body["prediction"].as_u64().unwrap();
        let probability = body["probabilite_depart"].as_f64().unwrap();
        assert!(prediction <= 1);
        assert!((0.0..=1.0).contains(&probability));

        let expected_label = if prediction == 1 {
            "Risque de départ"
        } else {
            "Employé stable"
        };
        assert_eq!(body["label"], expected_label);
    }

    #[actix_web::test]
    async fn test_predict_without_api_key() {
        let (status, body) = post_predict(ready_model(), None, valid_input()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing_api_key");
    }

    #[actix_web::test]
    async fn test_predict_invalid_api_key() {
        let (status, _) = post_predict(ready_model(), Some("mauvaise_cle"), valid_input()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_auth_checked_before_validation() {
        let (status, _) = post_predict(ready_model(), None, json!({"age": 35})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_predict_missing_required_field() {
        let (status, body) = post_predict(ready_model(), Some(API_KEY), json!({"age": 35})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[actix_web::test]
    async fn test_predict_invalid_satisfaction_value() {
        let mut input = valid_input();
        input["satisfaction_employee_environnement"] = json!(10);

        let (status, _) = post_predict(ready_model(), Some(API_KEY), input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_predict_invalid_overtime_value() {
        let mut input = valid_input();
        input["heure_supplementaires"] = json!("Maybe");

        let (status, _) = post_predict(ready_model(), Some(API_KEY), input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_predict_wrong_field_type() {
        let mut input = valid_input();
        input["age"] = json!("thirty-five");

        let (status, _) = post_predict(ready_model(), Some(API_KEY), input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_model_unavailable_regardless_of_input() {
        let unavailable = || ModelState::Unavailable {
            reason: "models/model.json not found".to_string(),
        };

        let (status, body) = post_predict(unavailable(), Some(API_KEY), valid_input()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "model_unavailable");

        let (status, _) = post_predict(unavailable(), Some(API_KEY), json!({"age": 35})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    /// Classifier whose inference always fails
    struct BrokenClassifier {
        width: usize,
    }

    impl Classifier for BrokenClassifier {
        fn n_features(&self) -> usize {
            self.width
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<f64, ClassifierError> {
            Err(ClassifierError::Malformed("corrupted leaf table".to_string()))
        }
    }

    #[actix_web::test]
    async fn test_internal_error_exposes_message() {
        let schema = FeatureSchema::new(encoded_columns()).unwrap();
        let classifier = BrokenClassifier {
            width: schema.len(),
        };
        let predictor = Predictor::new(schema, Box::new(classifier)).unwrap();

        let (status, body) = post_predict(
            ModelState::Ready(Arc::new(predictor)),
            Some(API_KEY),
            valid_input(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("corrupted leaf table")
        );
    }
}

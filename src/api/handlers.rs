//! HTTP request handlers for the Calculator Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::evaluate;

use super::request::{CalculationRequest, LocaleQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/calculators", get(list_calculators_handler))
        .route("/calculators/:id", get(get_calculator_handler))
        .route("/calculators/:id/calculate", post(calculate_handler))
        .with_state(state)
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the server is answering.
    pub status: String,
    /// Engine version.
    pub version: String,
    /// Number of configured calculators.
    pub calculators: usize,
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        calculators: state.config().calculators().len(),
    })
}

/// Handler for GET /calculators.
///
/// Returns the localised catalog grouped by category.
async fn list_calculators_handler(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Response {
    let locale = state.negotiate_locale(query.locale.as_deref(), accept_language(&headers));
    info!(locale = %locale, "Listing calculators");
    json_ok(state.config().catalog(locale))
}

/// Handler for GET /calculators/:id.
///
/// Returns one calculator's inputs, labels, presets and FAQ in the
/// negotiated locale.
async fn get_calculator_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Response {
    let locale = state.negotiate_locale(query.locale.as_deref(), accept_language(&headers));

    match state.config().localize(&id, locale) {
        Ok(calculator) => json_ok(calculator),
        Err(err) => {
            warn!(calculator = %id, error = %err, "Calculator lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /calculators/:id/calculate.
///
/// Invalid calculator input is not an HTTP error: the response is 200 with
/// `is_valid: false` and the list of problems.
async fn calculate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, calculator = %id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::malformed_json(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let config = state.config();
    let definition = match config.get_calculator(&id) {
        Ok(definition) => definition,
        Err(err) => {
            warn!(correlation_id = %correlation_id, calculator = %id, "Calculator not found");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let raw = match request.merged_values(definition) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Preset lookup failed");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let requested = request.locale.as_deref().or(query.locale.as_deref());
    let locale = state.negotiate_locale(requested, accept_language(&headers));

    let start_time = Instant::now();
    match evaluate(definition, &raw, locale, config.default_locale()) {
        Ok(outcome) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                calculator = %id,
                locale = %locale,
                is_valid = outcome.is_valid,
                warnings = outcome.audit_trace.warnings.len(),
                duration_us = duration.as_micros(),
                "Calculation completed"
            );
            json_ok(outcome)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{CalculationOutcome, Locale};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config").expect("Failed to load config");
        AppState::new(config)
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_calculator_count() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.calculators, 6);
    }

    #[tokio::test]
    async fn test_catalog_uses_accept_language() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/calculators")
                    .header("Accept-Language", "es-MX,es;q=0.9,en;q=0.5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let catalog: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(catalog["locale"], "es");
    }

    #[tokio::test]
    async fn test_query_locale_beats_header() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/calculators/bmi?locale=de")
                    .header("Accept-Language", "fr")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let calculator: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(calculator["locale"], "de");
        assert_eq!(calculator["id"], "bmi");
    }

    #[tokio::test]
    async fn test_unknown_calculator_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/calculators/tip/calculate", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "CALCULATOR_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculators/bmi/calculate")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{ not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculators/bmi/calculate")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_bmi_calculation() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/calculators/bmi/calculate",
                serde_json::json!({
                    "values": {"unit_system": "metric", "height_cm": 175, "weight_kg": 70}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let outcome: CalculationOutcome =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.calculator, "bmi");
        assert_eq!(outcome.values["category"], "normal");
        assert!(!outcome.audit_trace.steps.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_200_with_errors() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/calculators/bmi/calculate",
                serde_json::json!({"values": {"weight_kg": 70}}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let outcome: CalculationOutcome =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!outcome.is_valid);
        assert!(outcome.errors.iter().any(|e| e.field == "height_cm"));
    }

    #[tokio::test]
    async fn test_body_locale_is_used() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/calculators/bmi/calculate",
                serde_json::json!({
                    "values": {"height_cm": 175, "weight_kg": 70},
                    "locale": "fr"
                }),
            ))
            .await
            .unwrap();

        let outcome: CalculationOutcome =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(outcome.locale, Locale::Fr);
    }
}

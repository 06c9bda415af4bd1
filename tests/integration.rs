//! Integration tests for the Calculator Engine HTTP API.
//!
//! This test suite drives the router against the shipped `./config` catalog:
//! - Catalog listing and localisation
//! - Each calculator's published reference values
//! - Presets
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use calculator_engine::api::{AppState, create_router};
use calculator_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    create_router(AppState::new(config))
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_calculate(router: Router, id: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/calculators/{}/calculate", id))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("expected a number, got {}", value))
}

// =============================================================================
// SECTION 1: Catalog
// =============================================================================

#[tokio::test]
async fn test_catalog_lists_every_calculator() {
    let (status, catalog) = get(create_router_for_test(), "/calculators?locale=en").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = catalog["categories"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["calculators"].as_array().unwrap())
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    for id in [
        "bmi",
        "ideal_weight",
        "gender_predictor",
        "ovulation",
        "transfer_time",
        "emergency_fund",
    ] {
        assert!(ids.contains(&id), "{} missing from catalog", id);
    }
}

#[tokio::test]
async fn test_catalog_in_spanish() {
    let (_, catalog) = get(create_router_for_test(), "/calculators?locale=es").await;

    assert_eq!(catalog["locale"], "es");
    let health = &catalog["categories"][0];
    assert_eq!(health["id"], "health");
    assert_eq!(health["name"], "Salud y forma física");
}

#[tokio::test]
async fn test_missing_translation_falls_back_to_default_locale() {
    let (status, bmi) = get(create_router_for_test(), "/calculators/bmi?locale=pt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bmi["title"], "Calculadora de IMC");
    let inputs = bmi["inputs"].as_array().unwrap();
    let label = |key: &str| {
        inputs
            .iter()
            .find(|i| i["key"] == key)
            .map(|i| i["label"].clone())
            .unwrap()
    };
    assert_eq!(label("height_cm"), "Altura");
    // No Portuguese label for the unit selector; English is used
    assert_eq!(label("unit_system"), "Units");
}

#[tokio::test]
async fn test_unknown_calculator_detail_returns_404() {
    let (status, error) = get(create_router_for_test(), "/calculators/mortgage").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "CALCULATOR_NOT_FOUND");
}

// =============================================================================
// SECTION 2: BMI
// =============================================================================

#[tokio::test]
async fn test_bmi_boundary_25_is_overweight() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"values": {"height_cm": 200, "weight_kg": 100}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], true);
    assert_eq!(as_f64(&outcome["values"]["bmi"]), 25.0);
    assert_eq!(outcome["values"]["category"], "overweight");
    assert_eq!(outcome["value_labels"]["category"], "Overweight");
}

#[tokio::test]
async fn test_bmi_boundary_18_5_is_normal() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"values": {"height_cm": 200, "weight_kg": 74}, "locale": "es"}),
    )
    .await;

    assert_eq!(outcome["values"]["category"], "normal");
    assert_eq!(outcome["value_labels"]["category"], "Peso normal");
    assert_eq!(outcome["labels"]["bmi"], "Tu IMC");
}

#[tokio::test]
async fn test_bmi_imperial_preset() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"preset": "imperial_example"}),
    )
    .await;

    assert_eq!(outcome["is_valid"], true);
    // 165 lb at 69 in is about 24.4
    let bmi = as_f64(&outcome["values"]["bmi"]);
    assert!((bmi - 24.37).abs() < 0.05, "bmi = {}", bmi);
}

#[tokio::test]
async fn test_bmi_out_of_range_input_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"values": {"height_cm": 175, "weight_kg": 70, "age": 12}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["values"], json!({}));
    assert_eq!(outcome["errors"][0]["field"], "age");
    assert_eq!(outcome["errors"][0]["message"], "must be between 18 and 100");
}

// =============================================================================
// SECTION 3: Ideal Weight
// =============================================================================

#[tokio::test]
async fn test_ideal_weight_average_of_formulas() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "ideal_weight",
        json!({"values": {"height_cm": 175, "sex": "male"}}),
    )
    .await;

    let values = &outcome["values"];
    let formulas = values["formulas"].as_array().unwrap();
    assert_eq!(formulas.len(), 7);

    let mean = formulas.iter().map(|f| as_f64(&f["kg"])).sum::<f64>() / 7.0;
    assert!((as_f64(&values["average_kg"]) - mean).abs() < 1e-9);
    assert!((mean - 69.148).abs() < 0.01, "mean = {}", mean);
}

#[tokio::test]
async fn test_ideal_weight_large_frame_adds_ten_percent() {
    let router = create_router_for_test();
    let (_, medium) = post_calculate(
        router.clone(),
        "ideal_weight",
        json!({"values": {"height_cm": 175, "sex": "male"}}),
    )
    .await;
    let (_, large) = post_calculate(
        router,
        "ideal_weight",
        json!({"values": {"height_cm": 175, "sex": "male", "frame": "large"}}),
    )
    .await;

    let base = as_f64(&medium["values"]["ideal_weight_kg"]);
    let adjusted = as_f64(&large["values"]["ideal_weight_kg"]);
    assert!((adjusted - base * 1.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_ideal_weight_requires_sex() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "ideal_weight",
        json!({"values": {"height_cm": 175}}),
    )
    .await;

    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "sex");
}

// =============================================================================
// SECTION 4: Pregnancy
// =============================================================================

#[tokio::test]
async fn test_ovulation_reference_dates() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "ovulation",
        json!({"values": {"last_period_date": "2025-02-01"}}),
    )
    .await;

    let values = &outcome["values"];
    assert_eq!(values["ovulation_date"], "2025-02-14");
    assert_eq!(values["fertile_window"]["start"], "2025-02-09");
    assert_eq!(values["fertile_window"]["end"], "2025-02-14");
    assert_eq!(values["next_period"], "2025-03-01");
    assert_eq!(values["due_date"], "2025-11-08");
    assert_eq!(values["upcoming_cycles"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ovulation_bad_date_is_invalid_outcome() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "ovulation",
        json!({"values": {"last_period_date": "01/02/2025"}}),
    )
    .await;

    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["message"], "expected a date (YYYY-MM-DD)");
}

#[tokio::test]
async fn test_gender_chart_lookup_is_stable() {
    let router = create_router_for_test();
    let body = json!({
        "values": {"mother_birth_date": "1993-06-10", "conception_date": "2024-06-20"}
    });

    let (_, first) = post_calculate(router.clone(), "gender_predictor", body.clone()).await;
    let (_, second) = post_calculate(router, "gender_predictor", body).await;

    assert_eq!(first["values"]["lunar_age"], 32);
    assert_eq!(first["values"]["lunar_month"], 5);
    assert_eq!(first["values"]["prediction"], second["values"]["prediction"]);
    assert_eq!(first["audit_trace"]["warnings"][0]["code"], "FOLKLORE");
}

#[tokio::test]
async fn test_gender_due_date_mode() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "gender_predictor",
        json!({"values": {
            "mother_birth_date": "1992-08-01",
            "mode": "due_date",
            "due_date": "2025-03-10"
        }}),
    )
    .await;

    assert_eq!(outcome["is_valid"], true);
    assert_eq!(outcome["values"]["conception_date"], "2024-06-17");
}

#[tokio::test]
async fn test_gender_age_outside_chart_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "gender_predictor",
        json!({"values": {"mother_birth_date": "2010-05-01", "conception_date": "2024-06-20"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "mother_birth_date");
}

// =============================================================================
// SECTION 5: Transfer Time
// =============================================================================

#[tokio::test]
async fn test_transfer_50gb_at_200mbps() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "transfer_time",
        json!({"values": {"data_size": 50, "data_unit": "GB", "speed": 200, "speed_unit": "Mbps"}}),
    )
    .await;

    let values = &outcome["values"];
    assert!((as_f64(&values["seconds"]) - 2222.22).abs() < 0.01);
    assert_eq!(values["duration"]["minutes"], 37);
    assert_eq!(values["comparison"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_transfer_interface_preset() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "transfer_time",
        json!({"preset": "usb_backup"}),
    )
    .await;

    // 1 TB over 5 Gbps at 80%: 8e12 / 4e9 = 2000 s
    assert!((as_f64(&outcome["values"]["seconds"]) - 2000.0).abs() < 1e-6);
}

// =============================================================================
// SECTION 6: Emergency Fund
// =============================================================================

#[tokio::test]
async fn test_emergency_fund_with_preset_override() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "emergency_fund",
        json!({"preset": "single_renter", "values": {"monthly_contribution": "500"}}),
    )
    .await;

    let values = &outcome["values"];
    assert_eq!(values["target"], "13200");
    assert_eq!(values["shortfall"], "10200");
    assert_eq!(values["months_to_goal"], 21);
    assert_eq!(values["is_funded"], false);
}

#[tokio::test]
async fn test_emergency_fund_months_override_profile() {
    let (_, outcome) = post_calculate(
        create_router_for_test(),
        "emergency_fund",
        json!({"values": {"monthly_expenses": 1000, "months_of_coverage": 4, "risk_profile": "high"}}),
    )
    .await;

    assert_eq!(outcome["values"]["months"], 4);
    assert_eq!(outcome["values"]["months_source"], "custom");
    assert_eq!(outcome["values"]["target"], "4000");
}

// =============================================================================
// SECTION 7: Error Cases
// =============================================================================

#[tokio::test]
async fn test_unknown_preset_returns_400() {
    let (status, error) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"preset": "sumo_wrestler"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "PRESET_NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_calculator_returns_404() {
    let (status, error) = post_calculate(create_router_for_test(), "tip", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "CALCULATOR_NOT_FOUND");
}

#[tokio::test]
async fn test_values_must_be_an_object() {
    let (status, error) = post_calculate(
        create_router_for_test(),
        "bmi",
        json!({"values": [1, 2, 3]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_health() {
    let (status, health) = get(create_router_for_test(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["calculators"], 6);
}

// =============================================================================
// SECTION 8: Extreme Inputs
// =============================================================================

#[tokio::test]
async fn test_far_future_period_date_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "ovulation",
        json!({"values": {"last_period_date": "+262142-12-01"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "last_period_date");
    assert_eq!(outcome["errors"][0]["message"], "is out of range");
}

#[tokio::test]
async fn test_ancient_due_date_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "gender_predictor",
        json!({"values": {
            "mother_birth_date": "1990-01-01",
            "mode": "due_date",
            "due_date": "-262143-01-05"
        }}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "due_date");
}

#[tokio::test]
async fn test_maximum_decimal_expenses_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "emergency_fund",
        json!({"values": {"monthly_expenses": "79228162514264337593543950335"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "monthly_expenses");
}

#[tokio::test]
async fn test_tiny_contribution_against_huge_target_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "emergency_fund",
        json!({"values": {"monthly_expenses": "1000000000000", "monthly_contribution": "0.01"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["field"], "monthly_contribution");
}

#[tokio::test]
async fn test_data_size_beyond_f64_is_invalid_outcome() {
    let (status, outcome) = post_calculate(
        create_router_for_test(),
        "transfer_time",
        json!({"values": {"data_size": 1e300, "data_unit": "PB"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_valid"], false);
    assert_eq!(outcome["errors"][0]["message"], "is too large");
}

#[tokio::test]
async fn test_unoffered_query_locale_falls_through_to_header() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .uri("/calculators?locale=ja")
                .header("Accept-Language", "fr-CA, en;q=0.5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, catalog) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["locale"], "fr");
}

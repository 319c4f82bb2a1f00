//! End-to-end tests against a running server.
//!
//! These require:
//! 1. The API server running with real VModel and Anthropic credentials
//! 2. SESSION_SECRET set to the same value the server uses
//! 3. Test images under tests/ (person.jpg, garment.jpg)
//!
//! Run with: cargo test --test e2e_test -- --ignored --nocapture
//!
//! Set API_BASE_URL to override default (http://localhost:3000)

use jsonwebtoken::{encode, EncodingKey, Header};
use std::path::PathBuf;

use virtual_stylist::auth::SessionClaims;

fn get_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn get_tests_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests")
}

fn mint_session_token() -> String {
    let secret = std::env::var("SESSION_SECRET").expect("SESSION_SECRET not set");
    let claims = SessionClaims {
        sub: "e2e-test-user".to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to mint session token")
}

#[tokio::test]
#[ignore] // Requires a running API server
async fn test_e2e_health_check() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", get_base_url()))
        .send()
        .await
        .expect("Health check failed");

    assert!(
        response.status().is_success(),
        "Health check returned non-success status: {}",
        response.status()
    );
}

#[tokio::test]
#[ignore] // Requires a running API server
async fn test_e2e_rejects_missing_session_token() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/analyze", get_base_url()))
        .json(&serde_json::json!({ "image": "AAAA" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[ignore] // Requires a running API server with real provider credentials
async fn test_e2e_tryon_round_trip() {
    let client = reqwest::Client::new();
    let token = mint_session_token();

    let person = std::fs::read(get_tests_dir().join("person.jpg")).expect("person.jpg missing");
    let garment = std::fs::read(get_tests_dir().join("garment.jpg")).expect("garment.jpg missing");

    let form = reqwest::multipart::Form::new()
        .part(
            "custom_model",
            reqwest::multipart::Part::bytes(person).file_name("person.jpg"),
        )
        .part(
            "clothes_image",
            reqwest::multipart::Part::bytes(garment).file_name("garment.jpg"),
        )
        .text("clothes_type", "upper_body");

    let response = client
        .post(format!("{}/api/v1/tryon", get_base_url()))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Try-on request failed");

    let status = response.status();
    let body: serde_json::Value = response.json().await.expect("Invalid JSON body");

    if status.is_success() {
        let url = body["result"]["output_image_url"][0]
            .as_str()
            .expect("No output image URL in response");
        println!("Try-on result: {url}");
    } else {
        // Provider-side failures are possible in e2e; surface the error.
        println!("Try-on failed ({}): {}", status, body["error"]);
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router fixtures for server tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use merch_checkout_api::{CheckoutConfig, LoginResponse};
use merch_checkout_domain::{CheckoutSession, SavedAddress};
use merch_checkout_persistence::Persistence;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use time::Duration;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_PASSWORD: &str = "Safari-Rally-2026";

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, CheckoutConfig::default(), Duration::hours(24))
}

pub fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Status and raw body of a routed request.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        body: body.to_vec(),
    }
}

pub async fn register_customer(app: &Router, email: &str) -> TestResponse {
    send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "displayName": "Amina Odhiambo",
            "phone": "+254 722 000111",
            "password": TEST_PASSWORD,
            "passwordConfirmation": TEST_PASSWORD,
        })),
    )
    .await
}

/// Registers a customer and returns a bearer token for them.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let registered: TestResponse = register_customer(app, email).await;
    assert_eq!(registered.status, StatusCode::OK);

    let login: TestResponse = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    login.json::<LoginResponse>().session_token
}

pub fn test_address_body(country: &str) -> Value {
    json!({
        "addressType": "SHIPPING",
        "isDefault": true,
        "recipientName": "Amina Odhiambo",
        "street": "22 Kenyatta Avenue",
        "city": "Nairobi",
        "postalCode": "00100",
        "country": country,
        "phone": "+254 722 000111",
    })
}

pub async fn save_address(app: &Router, token: &str, country: &str) -> SavedAddress {
    let response: TestResponse = send(
        app,
        "POST",
        "/addresses",
        Some(token),
        Some(test_address_body(country)),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()
}

/// Opens a session for two tees at 500 with a discount of 50.
pub async fn open_session(app: &Router, token: &str) -> CheckoutSession {
    let response: TestResponse = send(
        app,
        "POST",
        "/checkout/sessions",
        Some(token),
        Some(json!({
            "items": [{
                "productId": "tee-black-l",
                "name": "Logo Tee",
                "quantity": 2,
                "unitPrice": "500.00",
            }],
            "discount": "50",
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()
}

pub fn shipping_body(address_id: i64, urgency: &str) -> Value {
    json!({ "addressId": address_id, "urgencyLevel": urgency })
}

pub fn validation_body(address_id: i64, option_id: &str, payment_method: &str) -> Value {
    json!({
        "shippingAddressId": address_id,
        "selectedShippingOption": option_id,
        "paymentMethod": payment_method,
    })
}

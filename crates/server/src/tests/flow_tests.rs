// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use merch_checkout_domain::{CheckoutBundle, CheckoutSession, SavedAddress, SessionStatus};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use super::helpers::{
    TestResponse, create_test_app, open_session, register_and_login, save_address, send,
};

fn flow_uri(session: &CheckoutSession) -> String {
    format!("/checkout/sessions/{}/flow", session.session_id)
}

async fn flow_action(app: &Router, token: &str, session: &CheckoutSession, body: Value) -> TestResponse {
    send(app, "POST", &flow_uri(session), Some(token), Some(body)).await
}

#[tokio::test]
async fn test_new_flow_waits_for_an_address() {
    let app: Router = create_test_app();
    let token: String = register_and_login(&app, "amina@example.com").await;
    let session: CheckoutSession = open_session(&app, &token).await;

    let response: TestResponse = send(&app, "GET", &flow_uri(&session), Some(&token), None).await;

    assert_eq!(response.status, StatusCode::OK);
    let state: Value = response.json();
    assert_eq!(state["phase"], "SelectingAddress");
    assert_eq!(state["sessionId"], session.session_id.as_str());
}

#[tokio::test]
async fn test_flow_drives_checkout_to_ready() {
    let app: Router = create_test_app();
    let token: String = register_and_login(&app, "amina@example.com").await;
    let address: SavedAddress = save_address(&app, &token, "KE").await;
    let session: CheckoutSession = open_session(&app, &token).await;

    let selected: TestResponse = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "selectAddress", "addressId": address.address_id }),
    )
    .await;
    assert_eq!(selected.status, StatusCode::OK);
    let body: Value = selected.json();
    assert_eq!(body["state"]["phase"], "SelectingOption");
    assert_eq!(body["state"]["selectedOptionId"], "domestic-standard");
    let actions: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["action"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["SelectAddress", "ShippingCalculated"]);

    let urgent: Value = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "changeUrgency", "urgencyLevel": "emergency" }),
    )
    .await
    .json();
    assert_eq!(urgent["state"]["urgency"], "EMERGENCY");

    let submitted: Value = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "submit", "paymentMethod": "mobile-money" }),
    )
    .await
    .json();
    assert_eq!(submitted["state"]["phase"], "Ready");

    let stored: CheckoutSession = send(
        &app,
        "GET",
        &format!("/checkout/sessions/{}", session.session_id),
        Some(&token),
        None,
    )
    .await
    .json();
    assert_eq!(stored.status, SessionStatus::Validated);

    let bundle: CheckoutBundle = send(
        &app,
        "POST",
        &format!("/checkout/sessions/{}/bundle/consume", session.session_id),
        Some(&token),
        None,
    )
    .await
    .json();
    // Standard at EMERGENCY: 300 * 3 = 900; 1000 + 900 + 160 - 50.
    assert_eq!(bundle.calculated_totals.estimated_total, dec!(2010));
}

#[tokio::test]
async fn test_flow_rejects_unknown_address_and_urgency() {
    let app: Router = create_test_app();
    let token: String = register_and_login(&app, "amina@example.com").await;
    let session: CheckoutSession = open_session(&app, &token).await;

    let address: TestResponse = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "selectAddress", "addressId": 4242 }),
    )
    .await;
    assert_eq!(address.status, StatusCode::NOT_FOUND);

    let urgency: TestResponse = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "changeUrgency", "urgencyLevel": "LATER" }),
    )
    .await;
    assert_eq!(urgency.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_without_address_violates_flow() {
    let app: Router = create_test_app();
    let token: String = register_and_login(&app, "amina@example.com").await;
    let session: CheckoutSession = open_session(&app, &token).await;

    let response: TestResponse = flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "submit", "paymentMethod": "card" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reset_returns_flow_to_address_selection() {
    let app: Router = create_test_app();
    let token: String = register_and_login(&app, "amina@example.com").await;
    let address: SavedAddress = save_address(&app, &token, "UG").await;
    let session: CheckoutSession = open_session(&app, &token).await;
    flow_action(
        &app,
        &token,
        &session,
        json!({ "action": "selectAddress", "addressId": address.address_id }),
    )
    .await;

    let reset: Value = flow_action(&app, &token, &session, json!({ "action": "reset" }))
        .await
        .json();

    assert_eq!(reset["state"]["phase"], "SelectingAddress");
    assert_eq!(reset["state"]["nextRequest"], 2);
    assert!(reset["state"]["selectedAddress"].is_null());
}

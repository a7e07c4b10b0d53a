// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for payment method listing.

use merch_checkout_domain::{CheckoutSession, SavedAddress};
use merch_checkout_persistence::Persistence;
use rust_decimal_macros::dec;

use crate::handlers::{calculate_shipping, list_payment_methods};
use crate::tests::helpers::{
    create_test_persistence, open_test_session, register_test_customer, save_test_address,
};
use crate::{
    ApiError, AuthenticatedCustomer, CalculateShippingRequest, CheckoutConfig,
    PaymentMethodsResponse,
};

fn quoted_methods(country: &str) -> PaymentMethodsResponse {
    let mut persistence: Persistence = create_test_persistence();
    let config: CheckoutConfig = CheckoutConfig::default();
    let customer: AuthenticatedCustomer =
        register_test_customer(&mut persistence, "amina@example.com");
    let address: SavedAddress = save_test_address(&mut persistence, &customer, country);
    let session: CheckoutSession = open_test_session(&mut persistence, &customer);

    calculate_shipping(
        &mut persistence,
        &config,
        &customer,
        &session.session_id,
        &CalculateShippingRequest {
            address_id: address.address_id,
            urgency_level: String::from("NORMAL"),
        },
    )
    .unwrap();

    list_payment_methods(&mut persistence, &config, &customer, &session.session_id).unwrap()
}

#[test]
fn test_domestic_order_offers_every_method_with_fees() {
    let response: PaymentMethodsResponse = quoted_methods("KE");

    assert_eq!(response.country, "KE");
    assert_eq!(response.order_total, dec!(1410));

    let priced: Vec<(&str, _, _)> = response
        .methods
        .iter()
        .map(|m| (m.method.id.as_str(), m.fee, m.total_with_fees))
        .collect();
    assert_eq!(
        priced,
        vec![
            ("mobile-money", dec!(21.15), dec!(1431.15)),
            ("bank-transfer", dec!(100), dec!(1510)),
            ("card", dec!(35.25), dec!(1445.25)),
        ]
    );
}

#[test]
fn test_international_order_excludes_regional_methods() {
    let response: PaymentMethodsResponse = quoted_methods("US");

    let ids: Vec<&str> = response
        .methods
        .iter()
        .map(|m| m.method.id.as_str())
        .collect();
    assert_eq!(ids, vec!["bank-transfer", "card"]);
}

#[test]
fn test_methods_need_a_shipping_address() {
    let mut persistence: Persistence = create_test_persistence();
    let customer: AuthenticatedCustomer =
        register_test_customer(&mut persistence, "amina@example.com");
    let session: CheckoutSession = open_test_session(&mut persistence, &customer);

    let result = list_payment_methods(
        &mut persistence,
        &CheckoutConfig::default(),
        &customer,
        &session.session_id,
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "shippingAddress"
    ));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_quoted_state, create_test_actor, create_test_saved_address, step,
};
use crate::{
    CheckoutFlowState, CheckoutPhase, Command, CoreError, Effect, FlowFailure, TransitionResult,
    apply, find_address,
};
use merch_checkout_domain::{CheckoutBundle, DomainError, SavedAddress, UrgencyLevel};
use rust_decimal_macros::dec;

fn begin(state: &CheckoutFlowState, address: SavedAddress) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        Command::BeginValidation {
            address,
            payment_method: String::from("mobile-money"),
            customer_phone: Some(String::from("+254 712 345678")),
        },
        create_test_actor(),
    )
}

#[test]
fn test_begin_validation_requests_server_check() {
    let state: CheckoutFlowState = create_quoted_state();

    let result: TransitionResult = begin(&state, create_test_saved_address(1)).unwrap();

    assert_eq!(result.new_state.phase, CheckoutPhase::Validating);
    match result.effect {
        Some(Effect::ValidateCheckout {
            shipping_address,
            selected_shipping_option,
            payment_method,
            customer_phone,
        }) => {
            assert_eq!(shipping_address.address_id, 1);
            assert_eq!(selected_shipping_option.id, "domestic-standard");
            assert_eq!(payment_method, "mobile-money");
            assert!(customer_phone.is_some());
        }
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn test_success_assembles_bundle() {
    let validating: CheckoutFlowState = begin(&create_quoted_state(), create_test_saved_address(1))
        .unwrap()
        .new_state;

    let result: TransitionResult = step(&validating, Command::ValidationSucceeded);

    assert_eq!(result.new_state.phase, CheckoutPhase::Ready);
    let bundle: CheckoutBundle = result.new_state.bundle.unwrap();
    assert_eq!(bundle.session_id, "cs_test");
    assert_eq!(bundle.customer_id, 7);
    assert_eq!(bundle.urgency_level, UrgencyLevel::Normal);
    assert_eq!(bundle.selected_shipping_option.id, "domestic-standard");
    assert_eq!(bundle.shipping_options.len(), 2);
    assert_eq!(bundle.calculated_totals.estimated_total, dec!(1460));
    assert_eq!(bundle.items.len(), 1);
}

#[test]
fn test_rejection_keeps_selections() {
    let quoted: CheckoutFlowState = create_quoted_state();
    let validating: CheckoutFlowState = begin(&quoted, create_test_saved_address(1))
        .unwrap()
        .new_state;

    let result: TransitionResult = step(
        &validating,
        Command::ValidationRejected {
            reason: String::from("Checkout validation failed"),
        },
    );

    assert_eq!(result.new_state.phase, CheckoutPhase::SelectingOption);
    assert_eq!(result.new_state.selected_option_id, quoted.selected_option_id);
    assert_eq!(result.new_state.selected_address, quoted.selected_address);
    assert!(matches!(
        result.new_state.error,
        Some(FlowFailure::ValidationRejected { .. })
    ));

    // The customer can resubmit.
    assert!(begin(&result.new_state, create_test_saved_address(1)).is_ok());
}

#[test]
fn test_address_with_different_shipping_key_is_refused() {
    let mut elsewhere: SavedAddress = create_test_saved_address(4);
    elsewhere.address.city = String::from("Eldoret");

    let result: Result<TransitionResult, CoreError> = begin(&create_quoted_state(), elsewhere);

    assert_eq!(
        result.unwrap_err(),
        CoreError::AddressNotQuoted { address_id: 4 }
    );
}

#[test]
fn test_malformed_phone_is_refused() {
    let result: Result<TransitionResult, CoreError> = apply(
        &create_quoted_state(),
        Command::BeginValidation {
            address: create_test_saved_address(1),
            payment_method: String::from("card"),
            customer_phone: Some(String::from("not a phone")),
        },
        create_test_actor(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidPhone(_)))
    ));
}

#[test]
fn test_commands_are_locked_while_validating() {
    let validating: CheckoutFlowState = begin(&create_quoted_state(), create_test_saved_address(1))
        .unwrap()
        .new_state;

    let result: Result<TransitionResult, CoreError> = apply(
        &validating,
        Command::ChangeUrgency {
            level: UrgencyLevel::Rush,
        },
        create_test_actor(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::InvalidTransition {
            phase: CheckoutPhase::Validating,
            command: "ChangeUrgency",
        }
    );
}

#[test]
fn test_fallback_address_matches_quoted_key() {
    let state: CheckoutFlowState = create_quoted_state();

    let fallback: &SavedAddress = state.fallback_address().unwrap();
    assert_eq!(fallback.address_id, 1);

    let moved: CheckoutFlowState = step(
        &state,
        Command::SelectAddress {
            address: {
                let mut a: SavedAddress = create_test_saved_address(2);
                a.address.postal_code = String::from("20100");
                a
            },
        },
    )
    .new_state;
    assert!(moved.fallback_address().is_none());
}

#[test]
fn test_find_address_by_id() {
    let addresses: Vec<SavedAddress> =
        vec![create_test_saved_address(1), create_test_saved_address(2)];

    assert_eq!(find_address(&addresses, 2).unwrap().address_id, 2);
    assert!(find_address(&addresses, 3).is_none());
}

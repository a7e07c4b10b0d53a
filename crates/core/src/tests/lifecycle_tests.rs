// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_quoted_state, create_test_actor, create_test_saved_address, pending_seq, step,
};
use crate::{
    CheckoutFlowState, CheckoutPhase, Command, CoreError, FlowFailure, TransitionResult, apply,
};
use merch_checkout_domain::UrgencyLevel;

fn create_ready_state() -> CheckoutFlowState {
    let validating: CheckoutFlowState = step(
        &create_quoted_state(),
        Command::BeginValidation {
            address: create_test_saved_address(1),
            payment_method: String::from("card"),
            customer_phone: None,
        },
    )
    .new_state;
    step(&validating, Command::ValidationSucceeded).new_state
}

#[test]
fn test_changing_option_after_ready_discards_bundle() {
    let ready: CheckoutFlowState = create_ready_state();
    assert!(ready.bundle.is_some());

    let result: TransitionResult = step(
        &ready,
        Command::SelectShippingOption {
            option_id: String::from("domestic-express"),
        },
    );

    assert_eq!(result.new_state.phase, CheckoutPhase::SelectingOption);
    assert!(result.new_state.bundle.is_none());
}

#[test]
fn test_unresolvable_address_fails_the_flow() {
    let ready: CheckoutFlowState = create_ready_state();

    let failed: CheckoutFlowState = step(
        &ready,
        Command::AddressResolutionFailed {
            reason: String::from("Shipping address no longer exists"),
        },
    )
    .new_state;

    assert_eq!(failed.phase, CheckoutPhase::Failed);
    assert!(matches!(
        failed.error,
        Some(FlowFailure::AddressUnavailable { .. })
    ));

    let result: Result<TransitionResult, CoreError> = apply(
        &failed,
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
        create_test_actor(),
    );
    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            phase: CheckoutPhase::Failed,
            ..
        })
    ));
}

#[test]
fn test_reset_starts_over_but_keeps_sequence_increasing() {
    let state: CheckoutFlowState = create_quoted_state();
    let rush: TransitionResult = step(
        &state,
        Command::ChangeUrgency {
            level: UrgencyLevel::Rush,
        },
    );
    let in_flight: u64 = pending_seq(&rush);

    let reset: CheckoutFlowState = step(&rush.new_state, Command::Reset).new_state;
    assert_eq!(reset.phase, CheckoutPhase::SelectingAddress);
    assert!(reset.selected_address.is_none());
    assert!(reset.shipping_options.is_empty());
    assert_eq!(reset.urgency, UrgencyLevel::Normal);
    assert!(reset.next_request > in_flight);

    // The response to the request issued before the reset is stale.
    let late: TransitionResult = step(
        &reset,
        Command::ShippingFailed {
            seq: in_flight,
            reason: String::from("timeout"),
            transient: true,
        },
    );
    assert_eq!(late.event.action.name, "IgnoreStaleShippingResponse");
    assert_eq!(late.new_state, reset);

    let reselected: TransitionResult = step(
        &reset,
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );
    assert!(pending_seq(&reselected) > in_flight);
}

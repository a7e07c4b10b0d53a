// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_actor, create_test_saved_address, create_test_state, pending_seq, step,
};
use crate::{
    CheckoutFlowState, CheckoutPhase, Command, CoreError, Effect, FlowFailure,
    MAX_SHIPPING_ATTEMPTS, RetryTrigger, TransitionResult, apply,
};

/// Selects an address and fails the resulting calculation.
fn create_failed_state() -> CheckoutFlowState {
    let selected: TransitionResult = step(
        &create_test_state(),
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );
    let seq: u64 = pending_seq(&selected);
    step(
        &selected.new_state,
        Command::ShippingFailed {
            seq,
            reason: String::from("calculator unavailable"),
            transient: true,
        },
    )
    .new_state
}

fn retry_and_fail(state: &CheckoutFlowState, trigger: RetryTrigger) -> CheckoutFlowState {
    let retried: TransitionResult = step(state, Command::RetryShipping { trigger });
    let seq: u64 = pending_seq(&retried);
    step(
        &retried.new_state,
        Command::ShippingFailed {
            seq,
            reason: String::from("calculator unavailable"),
            transient: true,
        },
    )
    .new_state
}

#[test]
fn test_failure_surfaces_retryable_error() {
    let state: CheckoutFlowState = create_failed_state();

    assert_eq!(state.phase, CheckoutPhase::SelectingAddress);
    assert_eq!(state.failed_attempts, 1);
    assert_eq!(
        state.error,
        Some(FlowFailure::ShippingUnavailable {
            reason: String::from("calculator unavailable"),
            attempts: 1,
            retryable: true,
        })
    );
    assert!(state.selected_address.is_some());
}

#[test]
fn test_three_failures_stop_automatic_retries() {
    let mut state: CheckoutFlowState = create_failed_state();
    state = retry_and_fail(&state, RetryTrigger::Automatic);
    state = retry_and_fail(&state, RetryTrigger::Automatic);

    assert_eq!(state.failed_attempts, MAX_SHIPPING_ATTEMPTS);
    assert!(matches!(
        state.error,
        Some(FlowFailure::ShippingUnavailable {
            retryable: false,
            ..
        })
    ));

    let result: Result<TransitionResult, CoreError> = apply(
        &state,
        Command::RetryShipping {
            trigger: RetryTrigger::Automatic,
        },
        create_test_actor(),
    );
    assert_eq!(
        result.unwrap_err(),
        CoreError::RetryLimitReached { attempts: 3 }
    );
}

#[test]
fn test_manual_retry_resets_the_counter() {
    let mut state: CheckoutFlowState = create_failed_state();
    state = retry_and_fail(&state, RetryTrigger::Automatic);
    state = retry_and_fail(&state, RetryTrigger::Automatic);

    let result: TransitionResult = step(
        &state,
        Command::RetryShipping {
            trigger: RetryTrigger::Manual,
        },
    );

    assert_eq!(result.new_state.failed_attempts, 0);
    assert_eq!(result.new_state.phase, CheckoutPhase::CalculatingShipping);
    assert!(matches!(
        result.effect,
        Some(Effect::CalculateShipping { .. })
    ));

    let failed_again: CheckoutFlowState = retry_and_fail(&state, RetryTrigger::Manual);
    assert_eq!(failed_again.failed_attempts, 1);
    assert!(failed_again.can_auto_retry());
}

#[test]
fn test_retry_requires_a_selected_address() {
    let result: Result<TransitionResult, CoreError> = apply(
        &create_test_state(),
        Command::RetryShipping {
            trigger: RetryTrigger::Manual,
        },
        create_test_actor(),
    );

    assert_eq!(result.unwrap_err(), CoreError::NoAddressSelected);
}

#[test]
fn test_retry_while_calculating_is_invalid() {
    let selected: TransitionResult = step(
        &create_test_state(),
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );

    let result: Result<TransitionResult, CoreError> = apply(
        &selected.new_state,
        Command::RetryShipping {
            trigger: RetryTrigger::Manual,
        },
        create_test_actor(),
    );

    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            phase: CheckoutPhase::CalculatingShipping,
            ..
        })
    ));
}

#[test]
fn test_reselecting_address_after_failure_requests_shipping() {
    let state: CheckoutFlowState = create_failed_state();

    let result: TransitionResult = step(
        &state,
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );

    assert!(matches!(
        result.effect,
        Some(Effect::CalculateShipping { .. })
    ));
}

#[test]
fn test_permanent_failure_is_not_retryable() {
    let selected: TransitionResult = step(
        &create_test_state(),
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );
    let seq: u64 = pending_seq(&selected);
    let state: CheckoutFlowState = step(
        &selected.new_state,
        Command::ShippingFailed {
            seq,
            reason: String::from("no zone serves AQ"),
            transient: false,
        },
    )
    .new_state;

    assert_eq!(state.failed_attempts, 1);
    assert_eq!(
        state.error,
        Some(FlowFailure::ShippingUnavailable {
            reason: String::from("no zone serves AQ"),
            attempts: 1,
            retryable: false,
        })
    );

    let automatic: Result<TransitionResult, CoreError> = apply(
        &state,
        Command::RetryShipping {
            trigger: RetryTrigger::Automatic,
        },
        create_test_actor(),
    );
    assert!(matches!(
        automatic,
        Err(CoreError::InvalidTransition {
            phase: CheckoutPhase::SelectingAddress,
            command: "RetryShipping",
        })
    ));

    let manual: TransitionResult = step(
        &state,
        Command::RetryShipping {
            trigger: RetryTrigger::Manual,
        },
    );
    assert_eq!(manual.new_state.phase, CheckoutPhase::CalculatingShipping);
    assert_eq!(manual.new_state.failed_attempts, 0);
}

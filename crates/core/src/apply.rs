// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, RetryTrigger};
use crate::error::CoreError;
use crate::event::{Actor, FlowAction, FlowEvent, FlowSnapshot};
use crate::state::{CheckoutFlowState, CheckoutPhase, Effect, FlowFailure, TransitionResult};
use merch_checkout_domain::{
    CheckoutBundle, CheckoutTotals, DomainError, SavedAddress, ShippingOption, UrgencyLevel,
    validate_address, validate_phone, validate_shipping_option,
};

/// Outcome of a single command before it is wrapped into a `TransitionResult`.
struct Step {
    state: CheckoutFlowState,
    effect: Option<Effect>,
    action: &'static str,
    details: String,
}

impl Step {
    const fn new(state: CheckoutFlowState, action: &'static str, details: String) -> Self {
        Self {
            state,
            effect: None,
            action,
            details,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Applies a command to the flow state, producing a new state, an optional
/// effect and a flow event.
///
/// The input state is never modified. A failed command leaves no trace.
///
/// # Arguments
///
/// * `state` - The current flow state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
///
/// # Errors
///
/// Returns an error if:
/// - The command is not accepted in the current phase
/// - The command violates a domain rule
/// - An automatic retry is requested after the attempt limit
pub fn apply(
    state: &CheckoutFlowState,
    command: Command,
    actor: Actor,
) -> Result<TransitionResult, CoreError> {
    let before: FlowSnapshot = state.to_snapshot();

    let step: Step = match command {
        Command::SelectAddress { address } => select_address(state, address)?,
        Command::ChangeUrgency { level } => change_urgency(state, level)?,
        Command::ShippingCalculated {
            seq,
            options,
            totals,
        } => shipping_calculated(state, seq, options, &totals)?,
        Command::ShippingFailed {
            seq,
            reason,
            transient,
        } => shipping_failed(state, seq, reason, transient),
        Command::RetryShipping { trigger } => retry_shipping(state, trigger)?,
        Command::SelectShippingOption { option_id } => select_option(state, option_id)?,
        Command::BeginValidation {
            address,
            payment_method,
            customer_phone,
        } => begin_validation(state, address, payment_method, customer_phone)?,
        Command::ValidationSucceeded => validation_succeeded(state)?,
        Command::ValidationRejected { reason } => validation_rejected(state, reason)?,
        Command::AddressResolutionFailed { reason } => address_resolution_failed(state, reason)?,
        Command::Reset => reset(state),
    };

    let after: FlowSnapshot = step.state.to_snapshot();
    let event: FlowEvent = FlowEvent::new(
        state.session_id.clone(),
        actor,
        FlowAction::new(String::from(step.action), Some(step.details)),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state: step.state,
        effect: step.effect,
        event,
    })
}

const fn reject(state: &CheckoutFlowState, command: &'static str) -> CoreError {
    CoreError::InvalidTransition {
        phase: state.phase,
        command,
    }
}

/// Issues a new shipping calculation for the selected address.
///
/// Any earlier calculation still in flight becomes stale.
fn issue_calculation(mut next: CheckoutFlowState) -> Result<(CheckoutFlowState, Effect), CoreError> {
    let address: SavedAddress = next
        .selected_address
        .clone()
        .ok_or(CoreError::NoAddressSelected)?;

    let seq: u64 = next.next_request;
    next.next_request = seq + 1;
    next.pending_request = Some(seq);
    next.quoted_key = Some(address.address.shipping_key());
    next.phase = CheckoutPhase::CalculatingShipping;
    next.error = None;
    next.bundle = None;

    let effect: Effect = Effect::CalculateShipping {
        seq,
        address_id: address.address_id,
        address: address.address,
        urgency: next.urgency,
    };
    Ok((next, effect))
}

fn select_address(state: &CheckoutFlowState, address: SavedAddress) -> Result<Step, CoreError> {
    match state.phase {
        CheckoutPhase::SelectingAddress
        | CheckoutPhase::CalculatingShipping
        | CheckoutPhase::SelectingOption
        | CheckoutPhase::Ready => {}
        CheckoutPhase::Validating | CheckoutPhase::Failed => {
            return Err(reject(state, "SelectAddress"));
        }
    }

    validate_address(&address.address)?;

    let address_id: i64 = address.address_id;
    let needs_quote: bool = state.needs_quote_for(&address.address);

    let mut next: CheckoutFlowState = state.clone();
    next.selected_address = Some(address);
    next.bundle = None;

    if needs_quote {
        let (next, effect) = issue_calculation(next)?;
        let details: String = format!(
            "Selected address {address_id}; requested shipping (request {})",
            next.next_request - 1
        );
        return Ok(Step::new(next, "SelectAddress", details).with_effect(effect));
    }

    if next.phase == CheckoutPhase::Ready {
        next.phase = CheckoutPhase::SelectingOption;
    }
    let details: String = format!(
        "Selected address {address_id}; shipping key unchanged, keeping {} options",
        next.shipping_options.len()
    );
    Ok(Step::new(next, "SelectAddress", details))
}

fn change_urgency(state: &CheckoutFlowState, level: UrgencyLevel) -> Result<Step, CoreError> {
    match state.phase {
        CheckoutPhase::SelectingAddress
        | CheckoutPhase::CalculatingShipping
        | CheckoutPhase::SelectingOption
        | CheckoutPhase::Ready => {}
        CheckoutPhase::Validating | CheckoutPhase::Failed => {
            return Err(reject(state, "ChangeUrgency"));
        }
    }

    if level == state.urgency {
        return Ok(Step::new(
            state.clone(),
            "ChangeUrgency",
            format!("Urgency already {level}"),
        ));
    }

    let mut next: CheckoutFlowState = state.clone();
    next.urgency = level;
    next.bundle = None;

    if next.selected_address.is_none() {
        return Ok(Step::new(
            next,
            "ChangeUrgency",
            format!("Urgency set to {level}; no address selected yet"),
        ));
    }

    let (next, effect) = issue_calculation(next)?;
    let details: String = format!(
        "Urgency changed from {} to {level}; requested shipping (request {})",
        state.urgency,
        next.next_request - 1
    );
    Ok(Step::new(next, "ChangeUrgency", details).with_effect(effect))
}

fn stale_response(state: &CheckoutFlowState, seq: u64) -> Step {
    let latest: String = state
        .pending_request
        .map_or_else(|| String::from("none pending"), |s| format!("latest is {s}"));
    Step::new(
        state.clone(),
        "IgnoreStaleShippingResponse",
        format!("Ignored shipping response {seq}; {latest}"),
    )
}

fn shipping_calculated(
    state: &CheckoutFlowState,
    seq: u64,
    options: Vec<ShippingOption>,
    totals: &CheckoutTotals,
) -> Result<Step, CoreError> {
    if state.pending_request != Some(seq) {
        return Ok(stale_response(state, seq));
    }

    for option in &options {
        validate_shipping_option(option)?;
    }
    totals.verify()?;

    let mut next: CheckoutFlowState = state.clone();
    next.pending_request = None;

    let Some(first) = options.first() else {
        next.phase = CheckoutPhase::SelectingAddress;
        next.shipping_options = Vec::new();
        next.totals = None;
        next.quoted_key = None;
        next.failed_attempts = 0;
        next.error = Some(FlowFailure::NoShippingOptions);
        return Ok(Step::new(
            next,
            "ShippingCalculated",
            format!("Request {seq} returned no shipping options"),
        ));
    };

    // Keep the customer's choice when it survived the re-quote.
    let selected: ShippingOption = state
        .selected_option_id
        .as_deref()
        .and_then(|id| options.iter().find(|option| option.id == id))
        .unwrap_or(first)
        .clone();

    next.totals = Some(totals.with_shipping(selected.cost));
    next.selected_option_id = Some(selected.id.clone());
    next.shipping_options = options;
    next.phase = CheckoutPhase::SelectingOption;
    next.failed_attempts = 0;
    next.error = None;
    next.last_known_good_address.clone_from(&next.selected_address);

    let details: String = format!(
        "Request {seq} returned {} options; selected '{}'",
        next.shipping_options.len(),
        selected.id
    );
    Ok(Step::new(next, "ShippingCalculated", details))
}

fn shipping_failed(state: &CheckoutFlowState, seq: u64, reason: String, transient: bool) -> Step {
    if state.pending_request != Some(seq) {
        return stale_response(state, seq);
    }

    let attempts: u8 = state.failed_attempts.saturating_add(1);
    let mut next: CheckoutFlowState = state.clone();
    next.pending_request = None;
    next.phase = CheckoutPhase::SelectingAddress;
    next.shipping_options = Vec::new();
    next.totals = None;
    next.quoted_key = None;
    next.failed_attempts = attempts;
    let retryable: bool = transient && next.can_auto_retry();

    let details: String = format!("Request {seq} failed (attempt {attempts}): {reason}");
    next.error = Some(FlowFailure::ShippingUnavailable {
        reason,
        attempts,
        retryable,
    });
    Step::new(next, "ShippingFailed", details)
}

fn retry_shipping(state: &CheckoutFlowState, trigger: RetryTrigger) -> Result<Step, CoreError> {
    if state.phase != CheckoutPhase::SelectingAddress {
        return Err(reject(state, "RetryShipping"));
    }
    if state.selected_address.is_none() {
        return Err(CoreError::NoAddressSelected);
    }

    let mut next: CheckoutFlowState = state.clone();
    match trigger {
        RetryTrigger::Automatic => {
            if !state.can_auto_retry() {
                return Err(CoreError::RetryLimitReached {
                    attempts: state.failed_attempts,
                });
            }
            if matches!(
                state.error,
                Some(FlowFailure::ShippingUnavailable {
                    retryable: false,
                    ..
                })
            ) {
                return Err(reject(state, "RetryShipping"));
            }
        }
        RetryTrigger::Manual => next.failed_attempts = 0,
    }

    let (next, effect) = issue_calculation(next)?;
    let details: String = format!(
        "{trigger:?} retry after {} failed attempts (request {})",
        state.failed_attempts,
        next.next_request - 1
    );
    Ok(Step::new(next, "RetryShipping", details).with_effect(effect))
}

fn select_option(state: &CheckoutFlowState, option_id: String) -> Result<Step, CoreError> {
    if !matches!(
        state.phase,
        CheckoutPhase::SelectingOption | CheckoutPhase::Ready
    ) {
        return Err(reject(state, "SelectShippingOption"));
    }

    let option: &ShippingOption = state
        .shipping_options
        .iter()
        .find(|option| option.id == option_id)
        .ok_or_else(|| DomainError::ShippingOptionNotFound {
            option_id: option_id.clone(),
        })?;
    let totals: &CheckoutTotals = state
        .totals
        .as_ref()
        .ok_or_else(|| reject(state, "SelectShippingOption"))?;

    let mut next: CheckoutFlowState = state.clone();
    next.totals = Some(totals.with_shipping(option.cost));
    next.phase = CheckoutPhase::SelectingOption;
    next.bundle = None;
    next.error = None;
    let details: String = format!("Selected shipping option '{option_id}' at {}", option.cost);
    next.selected_option_id = Some(option_id);

    Ok(Step::new(next, "SelectShippingOption", details))
}

fn begin_validation(
    state: &CheckoutFlowState,
    address: SavedAddress,
    payment_method: String,
    customer_phone: Option<String>,
) -> Result<Step, CoreError> {
    if !matches!(
        state.phase,
        CheckoutPhase::SelectingOption | CheckoutPhase::Ready
    ) {
        return Err(reject(state, "BeginValidation"));
    }

    if state.quoted_key.as_ref() != Some(&address.address.shipping_key()) {
        return Err(CoreError::AddressNotQuoted {
            address_id: address.address_id,
        });
    }

    let option: ShippingOption = state
        .selected_option()
        .cloned()
        .ok_or(CoreError::NoShippingOptionSelected)?;

    if payment_method.trim().is_empty() {
        return Err(CoreError::DomainViolation(DomainError::PaymentMethodNotFound(
            payment_method,
        )));
    }
    if let Some(phone) = &customer_phone {
        validate_phone(phone)?;
    }

    let mut next: CheckoutFlowState = state.clone();
    next.selected_address = Some(address.clone());
    next.phase = CheckoutPhase::Validating;
    next.bundle = None;
    next.error = None;

    let details: String = format!(
        "Validating address {} with option '{}' and payment method '{payment_method}'",
        address.address_id, option.id
    );
    let effect: Effect = Effect::ValidateCheckout {
        shipping_address: address,
        selected_shipping_option: option,
        payment_method,
        customer_phone,
    };
    Ok(Step::new(next, "BeginValidation", details).with_effect(effect))
}

fn validation_succeeded(state: &CheckoutFlowState) -> Result<Step, CoreError> {
    if state.phase != CheckoutPhase::Validating {
        return Err(reject(state, "ValidationSucceeded"));
    }

    let address: SavedAddress = state
        .selected_address
        .clone()
        .ok_or(CoreError::NoAddressSelected)?;
    let option_id: &str = state
        .selected_option_id
        .as_deref()
        .ok_or(CoreError::NoShippingOptionSelected)?;
    let totals: CheckoutTotals = state
        .totals
        .clone()
        .ok_or(CoreError::NoShippingOptionSelected)?;

    let bundle: CheckoutBundle = CheckoutBundle::assemble(
        state.session_id.clone(),
        address.clone(),
        option_id,
        state.shipping_options.clone(),
        totals,
        state.urgency,
        state.customer_id,
        state.items.clone(),
    )?;

    let details: String = format!(
        "Checkout validated; bundle ready with total {}",
        bundle.calculated_totals.estimated_total
    );
    let mut next: CheckoutFlowState = state.clone();
    next.phase = CheckoutPhase::Ready;
    next.bundle = Some(bundle);
    next.last_known_good_address = Some(address);
    next.error = None;

    Ok(Step::new(next, "ValidationSucceeded", details))
}

fn validation_rejected(state: &CheckoutFlowState, reason: String) -> Result<Step, CoreError> {
    if state.phase != CheckoutPhase::Validating {
        return Err(reject(state, "ValidationRejected"));
    }

    let mut next: CheckoutFlowState = state.clone();
    next.phase = CheckoutPhase::SelectingOption;
    let details: String = format!("Checkout rejected: {reason}");
    next.error = Some(FlowFailure::ValidationRejected { reason });

    Ok(Step::new(next, "ValidationRejected", details))
}

fn address_resolution_failed(state: &CheckoutFlowState, reason: String) -> Result<Step, CoreError> {
    if !matches!(
        state.phase,
        CheckoutPhase::SelectingOption | CheckoutPhase::Validating | CheckoutPhase::Ready
    ) {
        return Err(reject(state, "AddressResolutionFailed"));
    }

    let mut next: CheckoutFlowState = state.clone();
    next.phase = CheckoutPhase::Failed;
    next.bundle = None;
    next.pending_request = None;
    let details: String = format!("Shipping address could not be resolved: {reason}");
    next.error = Some(FlowFailure::AddressUnavailable { reason });

    Ok(Step::new(next, "AddressResolutionFailed", details))
}

fn reset(state: &CheckoutFlowState) -> Step {
    let mut next: CheckoutFlowState = CheckoutFlowState::new(
        state.session_id.clone(),
        state.customer_id,
        state.items.clone(),
    );
    next.next_request = state.next_request;

    Step::new(
        next,
        "Reset",
        format!("Flow restarted from {}", state.phase),
    )
}

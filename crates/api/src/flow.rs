// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Drives the checkout flow state machine against the checkout services.
//!
//! The controller owns the flow state. Every change goes through
//! [`merch_checkout::apply`]; the effects it returns are executed here and
//! their outcomes fed back as commands until the flow settles.

use merch_checkout::{
    Actor, CheckoutFlowState, Command, CoreError, Effect, FlowEvent, FlowFailure, RetryTrigger,
    apply, find_address,
};
use merch_checkout_domain::{CheckoutSession, SavedAddress, UrgencyLevel};
use tracing::{debug, info, warn};

use crate::error::{ApiError, translate_core_error};
use crate::request_response::{CalculateShippingRequest, ValidateCheckoutRequest};
use crate::services::CheckoutServices;

/// Shown when the server rejects a checkout.
pub const VALIDATION_FAILED_MESSAGE: &str =
    "We could not validate your order. Please review your details and try again.";

/// Shown when the shipping address cannot be found by any means.
pub const ADDRESS_UNAVAILABLE_MESSAGE: &str =
    "Your shipping address is no longer available. Please select an address again.";

/// Owns one checkout flow and executes its effects.
#[derive(Debug, Clone)]
pub struct CheckoutFlowController {
    state: CheckoutFlowState,
    actor: Actor,
    events: Vec<FlowEvent>,
}

impl CheckoutFlowController {
    /// Creates a controller for an existing flow state.
    #[must_use]
    pub const fn new(state: CheckoutFlowState, actor: Actor) -> Self {
        Self {
            state,
            actor,
            events: Vec::new(),
        }
    }

    /// Starts a flow for a checkout session.
    #[must_use]
    pub fn for_session(session: &CheckoutSession, actor: Actor) -> Self {
        let mut state: CheckoutFlowState = CheckoutFlowState::new(
            session.session_id.clone(),
            session.customer_id,
            session.items.clone(),
        );
        state.urgency = session.urgency_level;
        Self::new(state, actor)
    }

    /// Returns the current flow state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutFlowState {
        &self.state
    }

    /// Returns the events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[FlowEvent] {
        &self.events
    }

    /// Removes and returns the events recorded so far.
    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies a command, then runs effects until none remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected by the flow. Service
    /// failures are fed back into the flow instead.
    pub fn dispatch<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        command: Command,
    ) -> Result<(), ApiError> {
        let mut effect: Option<Effect> = self.transition(command).map_err(translate_core_error)?;
        while let Some(next) = effect {
            effect = self.perform(services, next)?;
        }
        Ok(())
    }

    /// Selects an address from the customer's current address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not in the address book or the
    /// flow does not accept an address now.
    pub fn select_address<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        address_id: i64,
    ) -> Result<(), ApiError> {
        let addresses: Vec<SavedAddress> = services.list_addresses()?;
        let address: SavedAddress = find_address(&addresses, address_id)
            .cloned()
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Address"),
                message: format!("Address {address_id} is not in the address book"),
            })?;
        self.dispatch(services, Command::SelectAddress { address })
    }

    /// Changes the urgency level.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow does not accept an urgency change now.
    pub fn change_urgency<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        level: UrgencyLevel,
    ) -> Result<(), ApiError> {
        self.dispatch(services, Command::ChangeUrgency { level })
    }

    /// Selects one of the quoted shipping options.
    ///
    /// # Errors
    ///
    /// Returns an error if the option was not quoted.
    pub fn select_shipping_option<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        option_id: &str,
    ) -> Result<(), ApiError> {
        self.dispatch(
            services,
            Command::SelectShippingOption {
                option_id: option_id.to_string(),
            },
        )
    }

    /// Retries shipping at the customer's request; resets the attempt count.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to retry.
    pub fn retry_shipping<S: CheckoutServices>(&mut self, services: &mut S) -> Result<(), ApiError> {
        self.dispatch(
            services,
            Command::RetryShipping {
                trigger: RetryTrigger::Manual,
            },
        )
    }

    /// Submits the checkout for validation.
    ///
    /// The selected address is looked up in a fresh address list. When it is
    /// missing the list is fetched once more, then the flow's last-known-good
    /// address is used. When all of that fails the flow moves to `Failed`.
    ///
    /// # Errors
    ///
    /// Returns an error if no address is selected or the flow does not accept
    /// a submission now.
    pub fn submit<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        payment_method: &str,
        customer_phone: Option<String>,
    ) -> Result<(), ApiError> {
        let address_id: i64 = self
            .state
            .selected_address
            .as_ref()
            .map(|address| address.address_id)
            .ok_or_else(|| translate_core_error(CoreError::NoAddressSelected))?;

        match self.resolve_address(services, address_id) {
            Some(address) => self.dispatch(
                services,
                Command::BeginValidation {
                    address,
                    payment_method: payment_method.to_string(),
                    customer_phone,
                },
            ),
            None => {
                warn!(
                    session_id = %self.state.session_id,
                    address_id, "Shipping address could not be resolved"
                );
                self.dispatch(
                    services,
                    Command::AddressResolutionFailed {
                        reason: String::from(ADDRESS_UNAVAILABLE_MESSAGE),
                    },
                )
            }
        }
    }

    /// Starts the flow over.
    ///
    /// # Errors
    ///
    /// Never fails in practice; reset is accepted in every phase.
    pub fn reset<S: CheckoutServices>(&mut self, services: &mut S) -> Result<(), ApiError> {
        self.dispatch(services, Command::Reset)
    }

    fn transition(&mut self, command: Command) -> Result<Option<Effect>, CoreError> {
        let actor: Actor = if Self::is_service_outcome(&command) {
            Actor::system()
        } else {
            self.actor.clone()
        };
        let result = apply(&self.state, command, actor)?;
        debug!(
            session_id = %self.state.session_id,
            action = %result.event.action.name,
            "Flow transition"
        );
        self.state = result.new_state;
        self.events.push(result.event);
        Ok(result.effect)
    }

    /// Commands that report what a service call returned rather than what
    /// the customer asked for.
    const fn is_service_outcome(command: &Command) -> bool {
        matches!(
            command,
            Command::ShippingCalculated { .. }
                | Command::ShippingFailed { .. }
                | Command::ValidationSucceeded
                | Command::ValidationRejected { .. }
                | Command::AddressResolutionFailed { .. }
                | Command::RetryShipping {
                    trigger: RetryTrigger::Automatic
                }
        )
    }

    fn resolve_address<S: CheckoutServices>(
        &self,
        services: &mut S,
        address_id: i64,
    ) -> Option<SavedAddress> {
        for attempt in 1..=2 {
            match services.list_addresses() {
                Ok(addresses) => {
                    if let Some(address) = find_address(&addresses, address_id) {
                        return Some(address.clone());
                    }
                    debug!(attempt, address_id, "Address missing from address book");
                }
                Err(err) => warn!(attempt, error = %err, "Failed to fetch address book"),
            }
        }

        let fallback: Option<SavedAddress> = self.state.fallback_address().cloned();
        if let Some(address) = &fallback {
            info!(
                address_id = address.address_id,
                "Using last-known-good shipping address"
            );
        }
        fallback
    }

    fn perform<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        effect: Effect,
    ) -> Result<Option<Effect>, ApiError> {
        match effect {
            Effect::CalculateShipping {
                seq,
                address_id,
                urgency,
                ..
            } => self.calculate_shipping(services, seq, address_id, urgency),
            Effect::ValidateCheckout {
                shipping_address,
                selected_shipping_option,
                payment_method,
                customer_phone,
            } => {
                let request: ValidateCheckoutRequest = ValidateCheckoutRequest {
                    shipping_address_id: shipping_address.address_id,
                    selected_shipping_option: selected_shipping_option.id,
                    payment_method,
                    customer_phone,
                };
                let command: Command =
                    match services.validate_checkout(&self.state.session_id, &request) {
                        Ok(response) if response.is_valid => Command::ValidationSucceeded,
                        Ok(response) => {
                            info!(
                                session_id = %self.state.session_id,
                                reason = response.reason.as_deref().unwrap_or("unspecified"),
                                "Checkout rejected"
                            );
                            Command::ValidationRejected {
                                reason: String::from(VALIDATION_FAILED_MESSAGE),
                            }
                        }
                        Err(err) => {
                            warn!(session_id = %self.state.session_id, error = %err, "Checkout validation failed");
                            Command::ValidationRejected {
                                reason: String::from(VALIDATION_FAILED_MESSAGE),
                            }
                        }
                    };
                self.transition(command).map_err(translate_core_error)
            }
        }
    }

    fn calculate_shipping<S: CheckoutServices>(
        &mut self,
        services: &mut S,
        seq: u64,
        address_id: i64,
        urgency: UrgencyLevel,
    ) -> Result<Option<Effect>, ApiError> {
        let request: CalculateShippingRequest = CalculateShippingRequest {
            address_id,
            urgency_level: urgency.as_str().to_string(),
        };

        let command: Command = match services.calculate_shipping(&self.state.session_id, &request)
        {
            Ok(response) => Command::ShippingCalculated {
                seq,
                options: response.shipping_options,
                totals: response.updated_totals,
            },
            Err(err) => {
                warn!(seq, error = %err, "Shipping calculation failed");
                Command::ShippingFailed {
                    seq,
                    reason: err.to_string(),
                    transient: matches!(
                        err,
                        ApiError::ShippingUnavailable {
                            retryable: true,
                            ..
                        } | ApiError::Internal { .. }
                    ),
                }
            }
        };

        let effect: Option<Effect> = match self.transition(command) {
            Ok(effect) => effect,
            Err(err) => {
                // A quote that breaks the pricing invariants counts as a failed attempt.
                warn!(seq, error = %err, "Rejected shipping quote");
                self.transition(Command::ShippingFailed {
                    seq,
                    reason: err.to_string(),
                    transient: false,
                })
                .map_err(translate_core_error)?
            }
        };
        if effect.is_some() {
            return Ok(effect);
        }
        Ok(self.auto_retry())
    }

    fn auto_retry(&mut self) -> Option<Effect> {
        let retryable: bool = matches!(
            self.state.error,
            Some(FlowFailure::ShippingUnavailable {
                retryable: true,
                ..
            })
        );
        if !retryable {
            return None;
        }
        match self.transition(Command::RetryShipping {
            trigger: RetryTrigger::Automatic,
        }) {
            Ok(effect) => effect,
            Err(err) => {
                debug!(error = %err, "Automatic retry not possible");
                None
            }
        }
    }
}

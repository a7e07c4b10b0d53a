// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::{FlowEvent, FlowSnapshot};
use merch_checkout_domain::{
    Address, AddressKey, CartItem, CheckoutBundle, CheckoutTotals, SavedAddress, ShippingOption,
    UrgencyLevel,
};
use serde::Serialize;

/// Consecutive failed shipping calculations after which automatic retries stop.
pub const MAX_SHIPPING_ATTEMPTS: u8 = 3;

/// Phases of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum CheckoutPhase {
    /// Waiting for the customer to pick an address.
    #[default]
    SelectingAddress,
    /// A shipping calculation is in flight.
    CalculatingShipping,
    /// Options are quoted; the customer picks one.
    SelectingOption,
    /// Server-side validation is in flight.
    Validating,
    /// A bundle is assembled and waiting for the payment step.
    Ready,
    /// The flow cannot continue; only a reset is accepted.
    Failed,
}

impl CheckoutPhase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelectingAddress => "SelectingAddress",
            Self::CalculatingShipping => "CalculatingShipping",
            Self::SelectingOption => "SelectingOption",
            Self::Validating => "Validating",
            Self::Ready => "Ready",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user-facing error currently held by the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FlowFailure {
    /// The shipping calculator failed.
    ShippingUnavailable {
        /// Reason reported by the calculator.
        reason: String,
        /// Consecutive failed attempts.
        attempts: u8,
        /// Whether an automatic retry is still allowed.
        retryable: bool,
    },
    /// The calculator returned no options for the address.
    NoShippingOptions,
    /// Server-side validation rejected the checkout.
    ValidationRejected {
        /// Generic reason.
        reason: String,
    },
    /// The shipping address could not be resolved.
    AddressUnavailable {
        /// Reason shown to the customer.
        reason: String,
    },
}

/// The checkout flow for one checkout session.
///
/// Owned by the flow controller and only changed through [`crate::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFlowState {
    /// The checkout session this flow drives.
    pub session_id: String,
    /// Customer placing the order.
    pub customer_id: i64,
    /// Cart contents.
    pub items: Vec<CartItem>,
    /// Current phase.
    pub phase: CheckoutPhase,
    /// Address the customer picked.
    pub selected_address: Option<SavedAddress>,
    /// Key of the address the current options were quoted for.
    #[serde(skip)]
    pub quoted_key: Option<AddressKey>,
    /// Urgency level for shipping.
    pub urgency: UrgencyLevel,
    /// Most recently quoted options.
    pub shipping_options: Vec<ShippingOption>,
    /// Id of the selected option.
    pub selected_option_id: Option<String>,
    /// Totals including the selected option.
    pub totals: Option<CheckoutTotals>,
    /// Sequence number of the shipping calculation in flight.
    pub pending_request: Option<u64>,
    /// Sequence number the next calculation will use.
    pub next_request: u64,
    /// Consecutive failed shipping calculations.
    pub failed_attempts: u8,
    /// Error shown to the customer, if any.
    pub error: Option<FlowFailure>,
    /// The last address shipping was successfully quoted for.
    pub last_known_good_address: Option<SavedAddress>,
    /// Bundle produced by the last successful validation.
    pub bundle: Option<CheckoutBundle>,
}

impl CheckoutFlowState {
    /// Creates a flow for a checkout session.
    #[must_use]
    pub fn new(session_id: String, customer_id: i64, items: Vec<CartItem>) -> Self {
        Self {
            session_id,
            customer_id,
            items,
            phase: CheckoutPhase::SelectingAddress,
            selected_address: None,
            quoted_key: None,
            urgency: UrgencyLevel::Normal,
            shipping_options: Vec::new(),
            selected_option_id: None,
            totals: None,
            pending_request: None,
            next_request: 1,
            failed_attempts: 0,
            error: None,
            last_known_good_address: None,
            bundle: None,
        }
    }

    /// Returns the selected shipping option, if it is among the quoted options.
    #[must_use]
    pub fn selected_option(&self) -> Option<&ShippingOption> {
        let id: &str = self.selected_option_id.as_deref()?;
        self.shipping_options.iter().find(|option| option.id == id)
    }

    /// Returns whether an address needs a new shipping calculation.
    ///
    /// Only the street, city, postal code and country are compared.
    #[must_use]
    pub fn needs_quote_for(&self, address: &Address) -> bool {
        self.shipping_options.is_empty()
            || self.quoted_key.as_ref() != Some(&address.shipping_key())
    }

    /// Returns the address to fall back on when the selected address has
    /// disappeared from the customer's address book.
    ///
    /// The last-known-good address only qualifies while it still matches
    /// the address the current options were quoted for.
    #[must_use]
    pub fn fallback_address(&self) -> Option<&SavedAddress> {
        self.last_known_good_address
            .as_ref()
            .filter(|address| self.quoted_key.as_ref() == Some(&address.address.shipping_key()))
    }

    /// Returns whether an automatic shipping retry is still allowed.
    #[must_use]
    pub const fn can_auto_retry(&self) -> bool {
        self.failed_attempts < MAX_SHIPPING_ATTEMPTS
    }

    /// Converts the state to a snapshot for flow events.
    #[must_use]
    pub fn to_snapshot(&self) -> FlowSnapshot {
        FlowSnapshot::new(format!(
            "phase={},address={},urgency={},options={},selected={},pending={},attempts={}",
            self.phase,
            self.selected_address
                .as_ref()
                .map_or_else(|| String::from("none"), |a| a.address_id.to_string()),
            self.urgency,
            self.shipping_options.len(),
            self.selected_option_id.as_deref().unwrap_or("none"),
            self.pending_request
                .map_or_else(|| String::from("none"), |seq| seq.to_string()),
            self.failed_attempts
        ))
    }
}

/// Work the flow controller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    /// Ask the shipping calculator for options.
    CalculateShipping {
        /// Sequence number to report the response under.
        seq: u64,
        /// Id of the address to quote.
        address_id: i64,
        /// Address to quote.
        address: Address,
        /// Urgency to quote at.
        urgency: UrgencyLevel,
    },
    /// Ask the session service to validate the checkout.
    ValidateCheckout {
        /// Address to ship to.
        shipping_address: SavedAddress,
        /// Selected option.
        selected_shipping_option: ShippingOption,
        /// Chosen payment method id.
        payment_method: String,
        /// Contact phone for the order.
        customer_phone: Option<String>,
    },
}

/// The result of a successful flow transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: CheckoutFlowState,
    /// Work to perform, if any.
    pub effect: Option<Effect>,
    /// The event recording this transition.
    pub event: FlowEvent,
}

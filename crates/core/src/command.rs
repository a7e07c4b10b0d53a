// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use merch_checkout_domain::{CheckoutTotals, SavedAddress, ShippingOption, UrgencyLevel};

/// Who asked for a shipping retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTrigger {
    /// The flow retried on its own. Bounded by the attempt limit.
    Automatic,
    /// The customer pressed retry. Resets the attempt counter.
    Manual,
}

/// A command represents customer intent or a service response as data only.
///
/// Commands are the only way to change flow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The customer picked (or edited) the shipping address.
    SelectAddress {
        /// The address.
        address: SavedAddress,
    },
    /// The customer changed the urgency level.
    ChangeUrgency {
        /// The new level.
        level: UrgencyLevel,
    },
    /// A shipping calculation returned.
    ShippingCalculated {
        /// Sequence number the calculation was issued with.
        seq: u64,
        /// Quoted options in server order.
        options: Vec<ShippingOption>,
        /// Updated totals from the calculator.
        totals: CheckoutTotals,
    },
    /// A shipping calculation failed.
    ShippingFailed {
        /// Sequence number the calculation was issued with.
        seq: u64,
        /// Failure reason.
        reason: String,
        /// Whether the failure may clear on its own (timeouts, outages).
        transient: bool,
    },
    /// Retry the last failed shipping calculation.
    RetryShipping {
        /// Who asked for the retry.
        trigger: RetryTrigger,
    },
    /// The customer picked a shipping option.
    SelectShippingOption {
        /// Option id.
        option_id: String,
    },
    /// The customer submitted the checkout.
    ///
    /// `address` is the shipping address after resolution against the
    /// customer's address book.
    BeginValidation {
        /// Resolved shipping address.
        address: SavedAddress,
        /// Chosen payment method id.
        payment_method: String,
        /// Contact phone for the order.
        customer_phone: Option<String>,
    },
    /// Server-side validation accepted the checkout.
    ValidationSucceeded,
    /// Server-side validation rejected the checkout.
    ValidationRejected {
        /// Generic reason.
        reason: String,
    },
    /// The shipping address could not be resolved by any means.
    AddressResolutionFailed {
        /// Reason shown to the customer.
        reason: String,
    },
    /// Start the flow over. Request sequence numbers keep increasing.
    Reset,
}

impl Command {
    /// Returns the command name used in flow events and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectAddress { .. } => "SelectAddress",
            Self::ChangeUrgency { .. } => "ChangeUrgency",
            Self::ShippingCalculated { .. } => "ShippingCalculated",
            Self::ShippingFailed { .. } => "ShippingFailed",
            Self::RetryShipping { .. } => "RetryShipping",
            Self::SelectShippingOption { .. } => "SelectShippingOption",
            Self::BeginValidation { .. } => "BeginValidation",
            Self::ValidationSucceeded => "ValidationSucceeded",
            Self::ValidationRejected { .. } => "ValidationRejected",
            Self::AddressResolutionFailed { .. } => "AddressResolutionFailed",
            Self::Reset => "Reset",
        }
    }
}

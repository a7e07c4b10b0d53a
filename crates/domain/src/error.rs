// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required address field is empty or malformed.
    InvalidAddress {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Country code is not a two letter ISO 3166-1 code.
    InvalidCountryCode(String),
    /// Phone number is malformed.
    InvalidPhone(String),
    /// Urgency level string is not one of the four known tiers.
    InvalidUrgencyLevel(String),
    /// Address type string is not recognized.
    InvalidAddressType(String),
    /// Payment channel string is not recognized.
    InvalidPaymentChannel(String),
    /// Session status string is not recognized.
    InvalidSessionStatus(String),
    /// A cart line is invalid.
    InvalidCartItem {
        /// The product the line refers to.
        product_id: String,
        /// Why the line was rejected.
        reason: String,
    },
    /// The cart has no items.
    EmptyCart,
    /// A monetary amount is negative.
    NegativeAmount {
        /// The field holding the amount.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },
    /// An amount is too large to compute with.
    AmountOverflow {
        /// The amount being computed.
        field: &'static str,
    },
    /// No shipping zone serves the destination country.
    NoShippingZone {
        /// The destination country.
        country: String,
    },
    /// A shipping option id is not in the quoted list.
    ShippingOptionNotFound {
        /// The requested option id.
        option_id: String,
    },
    /// A shipping option's cost disagrees with its base cost and multiplier.
    ShippingOptionPriceMismatch {
        /// The option id.
        option_id: String,
        /// The cost implied by `original_cost * urgency_multiplier`.
        expected: Decimal,
        /// The cost the option carries.
        actual: Decimal,
    },
    /// Totals do not satisfy `subtotal + shipping + tax - discount`.
    TotalsMismatch {
        /// The total implied by the components.
        expected: Decimal,
        /// The total that was supplied.
        actual: Decimal,
    },
    /// Payment method id is not in the catalog.
    PaymentMethodNotFound(String),
    /// Payment method does not serve this country or amount.
    PaymentMethodNotEligible {
        /// The payment method id.
        method_id: String,
        /// The destination country.
        country: String,
        /// The order total.
        total: Decimal,
    },
    /// The checkout session no longer accepts changes.
    SessionNotOpen {
        /// The session identifier.
        session_id: String,
        /// The current status.
        status: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress { field, reason } => {
                write!(f, "Invalid address field '{field}': {reason}")
            }
            Self::InvalidCountryCode(code) => {
                write!(f, "Invalid country code '{code}': expected two letters")
            }
            Self::InvalidPhone(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidUrgencyLevel(level) => write!(f, "Unknown urgency level '{level}'"),
            Self::InvalidAddressType(kind) => write!(f, "Unknown address type '{kind}'"),
            Self::InvalidPaymentChannel(channel) => {
                write!(f, "Unknown payment channel '{channel}'")
            }
            Self::InvalidSessionStatus(status) => write!(f, "Unknown session status '{status}'"),
            Self::InvalidCartItem { product_id, reason } => {
                write!(f, "Invalid cart item '{product_id}': {reason}")
            }
            Self::EmptyCart => write!(f, "Cart must contain at least one item"),
            Self::NegativeAmount { field, value } => {
                write!(f, "Amount for '{field}' must not be negative, got {value}")
            }
            Self::AmountOverflow { field } => {
                write!(f, "Amount for '{field}' is too large")
            }
            Self::NoShippingZone { country } => {
                write!(f, "No shipping zone delivers to '{country}'")
            }
            Self::ShippingOptionNotFound { option_id } => {
                write!(f, "Shipping option '{option_id}' is not available")
            }
            Self::ShippingOptionPriceMismatch {
                option_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Shipping option '{option_id}' costs {actual} but its base cost and multiplier imply {expected}"
                )
            }
            Self::TotalsMismatch { expected, actual } => {
                write!(
                    f,
                    "Estimated total {actual} does not match its components ({expected})"
                )
            }
            Self::PaymentMethodNotFound(id) => write!(f, "Payment method '{id}' not found"),
            Self::PaymentMethodNotEligible {
                method_id,
                country,
                total,
            } => {
                write!(
                    f,
                    "Payment method '{method_id}' is not available for {country} at {total}"
                )
            }
            Self::SessionNotOpen { session_id, status } => {
                write!(
                    f,
                    "Checkout session '{session_id}' is {status} and cannot be changed"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use merch_checkout::CoreError;
use merch_checkout_domain::DomainError;
use merch_checkout_persistence::PersistenceError;
use thiserror::Error;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The shipping calculator could not produce a quote.
    #[error("Shipping unavailable: {message}")]
    ShippingUnavailable {
        /// A human-readable description of the failure.
        message: String,
        /// Whether retrying may succeed.
        retryable: bool,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    #[error("Password policy violation: {message}")]
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::CustomerNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Customer"),
                message: format!("Customer {id} does not exist"),
            },
            PersistenceError::AddressNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Address"),
                message: format!("Address {id} does not exist"),
            },
            PersistenceError::CheckoutSessionNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Checkout session"),
                message: format!("Checkout session '{id}' does not exist"),
            },
            PersistenceError::BundleNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Checkout bundle"),
                message: format!("No validated checkout is waiting for session '{id}'"),
            },
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Resource"),
                message,
            },
            PersistenceError::DuplicateEmail(email) => Self::DomainRuleViolation {
                rule: String::from("unique_email"),
                message: format!("An account with email '{email}' already exists"),
            },
            PersistenceError::AddressRetired(id) => Self::DomainRuleViolation {
                rule: String::from("address_replaced"),
                message: format!("Address {id} has already been replaced"),
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidAddress { field, .. } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::InvalidCountryCode(_) => ApiError::InvalidInput {
            field: String::from("country"),
            message,
        },
        DomainError::InvalidPhone(_) => ApiError::InvalidInput {
            field: String::from("phone"),
            message,
        },
        DomainError::InvalidUrgencyLevel(_) => ApiError::InvalidInput {
            field: String::from("urgencyLevel"),
            message,
        },
        DomainError::InvalidAddressType(_) => ApiError::InvalidInput {
            field: String::from("addressType"),
            message,
        },
        DomainError::InvalidPaymentChannel(_) => ApiError::InvalidInput {
            field: String::from("paymentMethod"),
            message,
        },
        DomainError::InvalidCartItem { .. } | DomainError::EmptyCart => ApiError::InvalidInput {
            field: String::from("items"),
            message,
        },
        DomainError::NegativeAmount { field, .. } | DomainError::AmountOverflow { field } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message,
            }
        }
        DomainError::NoShippingZone { .. } => ApiError::ShippingUnavailable {
            message,
            retryable: false,
        },
        DomainError::ShippingOptionNotFound { .. } => ApiError::DomainRuleViolation {
            rule: String::from("quoted_shipping_option"),
            message,
        },
        DomainError::ShippingOptionPriceMismatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("shipping_option_price"),
            message,
        },
        DomainError::TotalsMismatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("totals_balance"),
            message,
        },
        DomainError::PaymentMethodNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Payment method"),
            message,
        },
        DomainError::PaymentMethodNotEligible { .. } => ApiError::DomainRuleViolation {
            rule: String::from("payment_method_eligibility"),
            message,
        },
        DomainError::SessionNotOpen { .. } => ApiError::DomainRuleViolation {
            rule: String::from("session_open"),
            message,
        },
        DomainError::InvalidSessionStatus(_) => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::RetryLimitReached { .. } => ApiError::ShippingUnavailable {
            message: err.to_string(),
            retryable: false,
        },
        CoreError::InvalidTransition { .. }
        | CoreError::NoAddressSelected
        | CoreError::NoShippingOptionSelected
        | CoreError::AddressNotQuoted { .. } => ApiError::DomainRuleViolation {
            rule: String::from("checkout_flow"),
            message: err.to_string(),
        },
    }
}

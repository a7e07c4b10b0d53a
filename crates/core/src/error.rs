// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::CheckoutPhase;
use merch_checkout_domain::DomainError;

/// Errors that can occur during flow transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The command is not accepted in the current phase.
    InvalidTransition {
        /// Phase the flow was in.
        phase: CheckoutPhase,
        /// Name of the rejected command.
        command: &'static str,
    },
    /// Automatic shipping retries are exhausted.
    RetryLimitReached {
        /// Consecutive failed attempts so far.
        attempts: u8,
    },
    /// The command needs a selected address and there is none.
    NoAddressSelected,
    /// The command needs a selected shipping option and there is none.
    NoShippingOptionSelected,
    /// The address submitted for validation is not the one shipping was quoted for.
    AddressNotQuoted {
        /// Id of the submitted address.
        address_id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InvalidTransition { phase, command } => {
                write!(f, "Cannot apply {command} while {phase}")
            }
            Self::RetryLimitReached { attempts } => write!(
                f,
                "Shipping calculation failed {attempts} times; please wait and try again later"
            ),
            Self::NoAddressSelected => write!(f, "No shipping address has been selected"),
            Self::NoShippingOptionSelected => {
                write!(f, "No shipping option has been selected")
            }
            Self::AddressNotQuoted { address_id } => write!(
                f,
                "Address {address_id} differs from the address shipping was calculated for"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

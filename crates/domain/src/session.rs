// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cart::CartItem;
use crate::error::DomainError;
use crate::pricing::CheckoutTotals;
use crate::shipping::ShippingOption;
use crate::urgency::UrgencyLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Accepting address, shipping and urgency changes.
    #[default]
    Open,
    /// Passed server-side validation; a bundle is waiting for the payment step.
    Validated,
    /// Handed to payment. No further changes.
    Completed,
}

impl SessionStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Validated => "VALIDATED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns whether the session still accepts shipping changes.
    ///
    /// A validated session reopens when shipping is recalculated.
    #[must_use]
    pub const fn accepts_changes(&self) -> bool {
        matches!(self, Self::Open | Self::Validated)
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "VALIDATED" => Ok(Self::Validated),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidSessionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server-owned aggregate tracking a customer's in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Session identifier.
    pub session_id: String,
    /// Owning customer.
    pub customer_id: i64,
    /// Cart contents, fixed at session creation.
    pub items: Vec<CartItem>,
    /// Discount granted to the order.
    pub discount: Decimal,
    /// Urgency of the most recent shipping quote.
    pub urgency_level: UrgencyLevel,
    /// Address of the most recent shipping quote.
    pub shipping_address_id: Option<i64>,
    /// Options from the most recent shipping quote.
    pub shipping_options: Vec<ShippingOption>,
    /// Option the totals were computed with.
    pub selected_shipping_option_id: Option<String>,
    /// Current totals.
    pub totals: CheckoutTotals,
    /// Lifecycle status.
    pub status: SessionStatus,
}

impl CheckoutSession {
    /// Fails unless the session still accepts changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is completed.
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if !self.status.accepts_changes() {
            return Err(DomainError::SessionNotOpen {
                session_id: self.session_id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Finds a quoted option by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id was not part of the most recent quote.
    pub fn quoted_option(&self, option_id: &str) -> Result<&ShippingOption, DomainError> {
        self.shipping_options
            .iter()
            .find(|option| option.id == option_id)
            .ok_or_else(|| DomainError::ShippingOptionNotFound {
                option_id: option_id.to_string(),
            })
    }
}

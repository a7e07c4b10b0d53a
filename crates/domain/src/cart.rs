// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog product identifier.
    pub product_id: String,
    /// Product name at the time it was added.
    pub name: String,
    /// Number of units.
    pub quantity: u32,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Free-form customization (print text, size, color).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<String>,
}

impl CartItem {
    /// Returns `unit_price * quantity`, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sums every line of a cart.
///
/// # Errors
///
/// Returns `AmountOverflow` if a line or the sum does not fit in a `Decimal`.
pub fn cart_subtotal(items: &[CartItem]) -> Result<Decimal, DomainError> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        item.line_total()
            .and_then(|line| sum.checked_add(line))
            .ok_or(DomainError::AmountOverflow { field: "subtotal" })
    })
}

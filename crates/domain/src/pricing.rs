// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cart::CartItem;
use crate::error::DomainError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Rounds an amount to the currency's minor unit, half away from zero.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Order totals for a checkout session.
///
/// `estimated_total == subtotal + shipping_cost + estimated_tax - discount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    /// Sum of all cart lines.
    pub subtotal: Decimal,
    /// Cost of the selected shipping option.
    pub shipping_cost: Decimal,
    /// Tax on the subtotal.
    pub estimated_tax: Decimal,
    /// Discount applied to the order.
    pub discount: Decimal,
    /// Amount the customer pays before payment fees.
    pub estimated_total: Decimal,
}

impl CheckoutTotals {
    /// Builds totals from their components.
    ///
    /// # Errors
    ///
    /// Returns an error if any component is negative or the total overflows.
    pub fn compute(
        subtotal: Decimal,
        shipping_cost: Decimal,
        estimated_tax: Decimal,
        discount: Decimal,
    ) -> Result<Self, DomainError> {
        for (field, value) in [
            ("subtotal", subtotal),
            ("shipping_cost", shipping_cost),
            ("estimated_tax", estimated_tax),
            ("discount", discount),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(DomainError::NegativeAmount { field, value });
            }
        }

        let estimated_total: Decimal = subtotal
            .checked_add(shipping_cost)
            .and_then(|sum| sum.checked_add(estimated_tax))
            .and_then(|sum| sum.checked_sub(discount))
            .ok_or(DomainError::AmountOverflow {
                field: "estimated_total",
            })?;

        Ok(Self {
            subtotal,
            shipping_cost,
            estimated_tax,
            discount,
            estimated_total,
        })
    }

    /// Returns a copy with a different shipping cost and a recomputed total.
    #[must_use]
    pub fn with_shipping(&self, shipping_cost: Decimal) -> Self {
        Self {
            shipping_cost,
            estimated_total: self.subtotal + shipping_cost + self.estimated_tax - self.discount,
            ..self.clone()
        }
    }

    /// Checks the total against its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored total disagrees with the components.
    pub fn verify(&self) -> Result<(), DomainError> {
        let expected: Decimal =
            self.subtotal + self.shipping_cost + self.estimated_tax - self.discount;
        if expected != self.estimated_total {
            return Err(DomainError::TotalsMismatch {
                expected,
                actual: self.estimated_total,
            });
        }
        Ok(())
    }
}

/// Tax applied to order subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Tax rate in percent.
    pub rate_percent: Decimal,
}

impl TaxPolicy {
    /// Creates a tax policy from a percentage.
    #[must_use]
    pub const fn new(rate_percent: Decimal) -> Self {
        Self { rate_percent }
    }

    /// Computes tax on a subtotal, rounded to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the tax does not fit in a `Decimal`.
    pub fn tax_on(&self, subtotal: Decimal) -> Result<Decimal, DomainError> {
        subtotal
            .checked_mul(self.rate_percent)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(round_currency)
            .ok_or(DomainError::AmountOverflow {
                field: "estimated_tax",
            })
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::new(Decimal::new(16, 0))
    }
}

/// Computes server-side totals for a cart and a shipping cost.
///
/// The discount is clamped so it never exceeds the subtotal.
///
/// # Errors
///
/// Returns an error if the discount or shipping cost is negative, or an
/// amount overflows.
pub fn calculate_totals(
    items: &[CartItem],
    shipping_cost: Decimal,
    discount: Decimal,
    tax: &TaxPolicy,
) -> Result<CheckoutTotals, DomainError> {
    let subtotal: Decimal = crate::cart::cart_subtotal(items)?;
    let discount: Decimal = discount.min(subtotal);
    CheckoutTotals::compute(subtotal, shipping_cost, tax.tax_on(subtotal)?, discount)
}

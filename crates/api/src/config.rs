// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pricing configuration shared by the checkout handlers.

use merch_checkout_domain::{PaymentMethod, ShippingRateTable, TaxPolicy, payment_catalog};
use rust_decimal::Decimal;

/// Shipping rates, tax and payment methods used to price checkouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Zones and base rates for the shipping calculator.
    pub rate_table: ShippingRateTable,
    /// Tax applied to subtotals.
    pub tax: TaxPolicy,
    /// Offered payment methods.
    pub payment_methods: Vec<PaymentMethod>,
}

impl CheckoutConfig {
    /// Creates the default configuration with a given tax rate.
    #[must_use]
    pub fn with_tax_rate(rate_percent: Decimal) -> Self {
        Self {
            tax: TaxPolicy::new(rate_percent),
            ..Self::default()
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            rate_table: ShippingRateTable::default(),
            tax: TaxPolicy::default(),
            payment_methods: payment_catalog(),
        }
    }
}

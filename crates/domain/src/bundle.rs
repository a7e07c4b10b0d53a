// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::address::SavedAddress;
use crate::cart::CartItem;
use crate::error::DomainError;
use crate::pricing::CheckoutTotals;
use crate::shipping::ShippingOption;
use crate::urgency::UrgencyLevel;
use serde::{Deserialize, Serialize};

/// Snapshot handed from the shipping step to the payment step.
///
/// Built once per successful validation and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBundle {
    /// The checkout session this bundle belongs to.
    pub session_id: String,
    /// Where the order ships.
    pub shipping_address: SavedAddress,
    /// The option the customer picked.
    pub selected_shipping_option: ShippingOption,
    /// Every quoted option, kept so the shipping step can be revisited.
    pub shipping_options: Vec<ShippingOption>,
    /// Totals including the selected option.
    pub calculated_totals: CheckoutTotals,
    /// Urgency the options were priced at.
    pub urgency_level: UrgencyLevel,
    /// Customer placing the order.
    pub customer_id: i64,
    /// Cart contents.
    pub items: Vec<CartItem>,
}

impl CheckoutBundle {
    /// Assembles a bundle, checking it is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The selected option is not among the quoted options
    /// - The totals do not add up
    /// - The totals' shipping cost differs from the selected option's cost
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        session_id: String,
        shipping_address: SavedAddress,
        selected_option_id: &str,
        shipping_options: Vec<ShippingOption>,
        calculated_totals: CheckoutTotals,
        urgency_level: UrgencyLevel,
        customer_id: i64,
        items: Vec<CartItem>,
    ) -> Result<Self, DomainError> {
        let selected_shipping_option: ShippingOption = shipping_options
            .iter()
            .find(|option| option.id == selected_option_id)
            .cloned()
            .ok_or_else(|| DomainError::ShippingOptionNotFound {
                option_id: selected_option_id.to_string(),
            })?;

        calculated_totals.verify()?;

        if calculated_totals.shipping_cost != selected_shipping_option.cost {
            return Err(DomainError::TotalsMismatch {
                expected: calculated_totals.with_shipping(selected_shipping_option.cost)
                    .estimated_total,
                actual: calculated_totals.estimated_total,
            });
        }

        Ok(Self {
            session_id,
            shipping_address,
            selected_shipping_option,
            shipping_options,
            calculated_totals,
            urgency_level,
            customer_id,
            items,
        })
    }
}

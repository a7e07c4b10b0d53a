// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod address;
mod bundle;
mod cart;
mod error;
mod payment;
mod pricing;
mod session;
mod shipping;
mod urgency;
mod validation;

#[cfg(test)]
mod tests;

pub use address::{Address, AddressKey, AddressType, SavedAddress};
pub use bundle::CheckoutBundle;
pub use cart::{CartItem, cart_subtotal};
pub use error::DomainError;
pub use payment::{
    GLOBAL_PAYMENT_COUNTRY, PaymentChannel, PaymentFee, PaymentMethod, PricedPaymentMethod,
    eligible_payment_methods, payment_catalog, require_eligible_method,
};
pub use pricing::{CheckoutTotals, MINOR_UNIT_SCALE, TaxPolicy, calculate_totals, round_currency};
pub use session::{CheckoutSession, SessionStatus};
pub use shipping::{
    GLOBAL_ZONE_COUNTRY, ShippingOption, ShippingRate, ShippingRateTable, ShippingZone,
};
pub use urgency::{UrgencyLevel, UrgencyProfile, resolve_multiplier};
pub use validation::{
    MAX_ITEM_QUANTITY, MAX_UNIT_PRICE, validate_address, validate_cart_items, validate_phone,
    validate_shipping_option,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use merch_checkout_domain::{
    Address, CartItem, CheckoutSession, CheckoutTotals, PricedPaymentMethod, SavedAddress,
    ShippingOption,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// API request to register a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    /// Email address, used to log in.
    pub email: String,
    /// Name shown on the profile.
    pub display_name: String,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Password.
    pub password: String,
    /// Password again.
    pub password_confirmation: String,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerResponse {
    /// The new customer's id.
    pub customer_id: i64,
    /// The normalized email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    /// The customer's id.
    pub customer_id: i64,
    /// Display name.
    pub display_name: String,
    /// Effective role.
    pub role: String,
    /// Session expiry (RFC 3339).
    pub expires_at: String,
}

/// The authenticated customer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub customer_id: i64,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    /// Role names held by the customer.
    pub roles: Vec<String>,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// API request to open a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    /// Cart contents.
    pub items: Vec<CartItem>,
    /// Discount granted to the order.
    #[serde(default)]
    pub discount: Option<Decimal>,
}

/// A customer's checkout sessions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCheckoutSessionsResponse {
    pub sessions: Vec<CheckoutSession>,
}

/// API request to quote shipping for a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingRequest {
    /// Address book id of the destination.
    pub address_id: i64,
    /// Urgency level name, e.g. `RUSH`.
    pub urgency_level: String,
}

/// Quoted shipping options and the totals they produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingResponse {
    /// Options in server order.
    pub shipping_options: Vec<ShippingOption>,
    /// Totals priced with the selected option.
    pub updated_totals: CheckoutTotals,
}

/// API request to validate a checkout before payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCheckoutRequest {
    /// Address book id of the destination.
    pub shipping_address_id: i64,
    /// Id of the chosen shipping option.
    pub selected_shipping_option: String,
    /// Id of the chosen payment method.
    pub payment_method: String,
    /// Optional contact phone for the order.
    #[serde(default)]
    pub customer_phone: Option<String>,
}

/// Outcome of checkout validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCheckoutResponse {
    /// Whether the checkout may proceed to payment.
    pub is_valid: bool,
    /// Why the checkout was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidateCheckoutResponse {
    /// An accepted checkout.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    /// A rejected checkout.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Payment methods usable for a session, with fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    /// Destination country the methods were filtered for.
    pub country: String,
    /// Order total the fees were computed on.
    pub order_total: Decimal,
    /// Eligible methods in catalog order.
    pub methods: Vec<PricedPaymentMethod>,
}

/// API request to save an address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    /// `SHIPPING` or `BILLING`.
    pub address_type: String,
    /// Make this the default of its type.
    #[serde(default)]
    pub is_default: bool,
    /// The address.
    #[serde(flatten)]
    pub address: Address,
}

/// API request to replace an address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplaceAddressRequest {
    /// The full replacement.
    #[serde(flatten)]
    pub address: Address,
}

/// A customer's current addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAddressesResponse {
    pub addresses: Vec<SavedAddress>,
}

/// A single address, including replacement bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    /// The address.
    #[serde(flatten)]
    pub address: SavedAddress,
    /// Whether the address has been replaced.
    pub is_retired: bool,
    /// Id of the replacement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<i64>,
}

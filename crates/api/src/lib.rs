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
    clippy::all
)]

mod auth;
mod config;
mod error;
mod flow;
mod handlers;
mod password_policy;
mod request_response;
mod services;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedCustomer, AuthenticationService, AuthorizationService, Role};
pub use config::CheckoutConfig;
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use flow::{ADDRESS_UNAVAILABLE_MESSAGE, CheckoutFlowController, VALIDATION_FAILED_MESSAGE};
pub use handlers::{
    calculate_shipping, consume_checkout_bundle, create_address, create_checkout_session,
    get_address, get_checkout_session, get_default_address, get_profile, list_addresses,
    list_checkout_sessions, list_payment_methods, login, logout, register_customer,
    replace_address, validate_checkout,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddressResponse, CalculateShippingRequest, CalculateShippingResponse, CreateAddressRequest,
    CreateCheckoutSessionRequest, ListAddressesResponse, ListCheckoutSessionsResponse,
    LoginRequest, LoginResponse, PaymentMethodsResponse, ProfileResponse,
    RegisterCustomerRequest, RegisterCustomerResponse, ReplaceAddressRequest,
    ValidateCheckoutRequest, ValidateCheckoutResponse,
};
pub use services::{CheckoutServices, LocalCheckoutServices};

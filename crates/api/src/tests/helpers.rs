// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use merch_checkout_domain::{Address, CartItem, CheckoutSession, SavedAddress};
use merch_checkout_persistence::Persistence;
use rust_decimal_macros::dec;

use crate::handlers::{create_address, create_checkout_session, register_customer};
use crate::{
    AuthenticatedCustomer, CheckoutConfig, CreateAddressRequest, CreateCheckoutSessionRequest,
    RegisterCustomerRequest, RegisterCustomerResponse, Role,
};

pub const TEST_PASSWORD: &str = "Safari-Rally-2026";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_registration(email: &str) -> RegisterCustomerRequest {
    RegisterCustomerRequest {
        email: email.to_string(),
        display_name: String::from("Amina Odhiambo"),
        phone: Some(String::from("+254 722 000111")),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
    }
}

pub fn register_test_customer(persistence: &mut Persistence, email: &str) -> AuthenticatedCustomer {
    let response: RegisterCustomerResponse =
        register_customer(persistence, &create_test_registration(email)).unwrap();
    AuthenticatedCustomer::new(response.customer_id, response.email, Role::Customer)
}

pub fn create_test_staff(persistence: &mut Persistence) -> AuthenticatedCustomer {
    let customer_id: i64 = persistence
        .create_customer(
            "support@example.com",
            "Support Desk",
            None,
            TEST_PASSWORD,
            "CUSTOMER,STAFF",
        )
        .unwrap();
    AuthenticatedCustomer::new(customer_id, String::from("support@example.com"), Role::Staff)
}

pub fn create_test_address(country: &str) -> Address {
    Address {
        recipient_name: String::from("Amina Odhiambo"),
        company_name: None,
        street: String::from("22 Kenyatta Avenue"),
        street2: None,
        city: String::from("Nairobi"),
        state: None,
        postal_code: String::from("00100"),
        country: country.to_string(),
        phone: Some(String::from("+254 722 000111")),
    }
}

pub fn save_test_address(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    country: &str,
) -> SavedAddress {
    let request: CreateAddressRequest = CreateAddressRequest {
        address_type: String::from("SHIPPING"),
        is_default: true,
        address: create_test_address(country),
    };
    create_address(persistence, actor, &request).unwrap()
}

/// Two tees at 500: subtotal 1000, tax 160 at the default 16%.
pub fn create_test_items() -> Vec<CartItem> {
    vec![CartItem {
        product_id: String::from("tee-black-l"),
        name: String::from("Logo Tee"),
        quantity: 2,
        unit_price: dec!(500.00),
        customization: None,
    }]
}

/// Opens a session with a discount of 50.
pub fn open_test_session(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
) -> CheckoutSession {
    let request: CreateCheckoutSessionRequest = CreateCheckoutSessionRequest {
        items: create_test_items(),
        discount: Some(dec!(50)),
    };
    create_checkout_session(persistence, &CheckoutConfig::default(), actor, &request).unwrap()
}

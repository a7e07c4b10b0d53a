// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod address_tests;
mod initialization_tests;

use merch_checkout_domain::{
    Address, CartItem, CheckoutSession, CheckoutTotals, SessionStatus, TaxPolicy, UrgencyLevel,
    calculate_totals,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_customer(persistence: &mut Persistence) -> i64 {
    persistence
        .create_customer(
            "Wanjiru@Example.com",
            "Wanjiru Kamau",
            Some("+254 712 345678"),
            "correct horse battery",
            "CUSTOMER",
        )
        .unwrap()
}

pub fn create_test_address() -> Address {
    Address {
        recipient_name: String::from("Wanjiru Kamau"),
        company_name: None,
        street: String::from("14 Moi Avenue"),
        street2: Some(String::from("Floor 3")),
        city: String::from("Nairobi"),
        state: None,
        postal_code: String::from("00100"),
        country: String::from("ke"),
        phone: Some(String::from("+254 712 345678")),
    }
}

pub fn create_test_items() -> Vec<CartItem> {
    vec![CartItem {
        product_id: String::from("cap-navy"),
        name: String::from("Snapback Cap"),
        quantity: 4,
        unit_price: dec!(250.00),
        customization: Some(String::from("Embroidered initials")),
    }]
}

pub fn create_test_session(session_id: &str, customer_id: i64) -> CheckoutSession {
    let items: Vec<CartItem> = create_test_items();
    let totals: CheckoutTotals =
        calculate_totals(&items, Decimal::ZERO, dec!(50), &TaxPolicy::default()).unwrap();
    CheckoutSession {
        session_id: session_id.to_string(),
        customer_id,
        items,
        discount: dec!(50),
        urgency_level: UrgencyLevel::Normal,
        shipping_address_id: None,
        shipping_options: Vec::new(),
        selected_shipping_option_id: None,
        totals,
        status: SessionStatus::Open,
    }
}

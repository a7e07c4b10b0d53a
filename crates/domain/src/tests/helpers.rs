// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal_macros::dec;

use crate::{Address, AddressType, CartItem, SavedAddress};

pub fn create_test_address(country: &str) -> Address {
    Address {
        recipient_name: String::from("Wanjiru Kamau"),
        company_name: None,
        street: String::from("14 Moi Avenue"),
        street2: None,
        city: String::from("Nairobi"),
        state: None,
        postal_code: String::from("00100"),
        country: country.to_string(),
        phone: Some(String::from("+254 712 345678")),
    }
}

pub fn create_test_saved_address(address_id: i64, country: &str) -> SavedAddress {
    SavedAddress {
        address_id,
        customer_id: 7,
        address_type: AddressType::Shipping,
        is_default: true,
        address: create_test_address(country),
    }
}

pub fn create_test_items() -> Vec<CartItem> {
    vec![
        CartItem {
            product_id: String::from("tee-black-l"),
            name: String::from("Logo Tee"),
            quantity: 2,
            unit_price: dec!(350.00),
            customization: Some(String::from("Back print: TEAM")),
        },
        CartItem {
            product_id: String::from("mug-white"),
            name: String::from("Enamel Mug"),
            quantity: 1,
            unit_price: dec!(300.00),
            customization: None,
        },
    ]
}

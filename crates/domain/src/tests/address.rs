// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::tests::helpers::{create_test_address, create_test_saved_address};
use crate::{Address, AddressKey, AddressType, DomainError, SavedAddress};

#[test]
fn test_recipient_and_phone_edits_keep_the_same_key() {
    let original: Address = create_test_address("KE");
    let mut edited: Address = original.clone();
    edited.recipient_name = String::from("Someone Else");
    edited.phone = Some(String::from("+254 700 000000"));
    edited.company_name = Some(String::from("Acme Ltd"));

    assert_eq!(original.shipping_key(), edited.shipping_key());
}

#[test]
fn test_each_shipping_field_changes_the_key() {
    let original: Address = create_test_address("KE");
    let key: AddressKey = original.shipping_key();

    let mut street: Address = original.clone();
    street.street = String::from("1 Kenyatta Avenue");
    assert_ne!(street.shipping_key(), key);

    let mut city: Address = original.clone();
    city.city = String::from("Mombasa");
    assert_ne!(city.shipping_key(), key);

    let mut postal: Address = original.clone();
    postal.postal_code = String::from("80100");
    assert_ne!(postal.shipping_key(), key);

    let mut country: Address = original;
    country.country = String::from("UG");
    assert_ne!(country.shipping_key(), key);
}

#[test]
fn test_key_ignores_case_and_spacing() {
    let original: Address = create_test_address("KE");
    let mut reformatted: Address = original.clone();
    reformatted.street = String::from("  14   moi avenue ");
    reformatted.city = String::from("NAIROBI");
    reformatted.postal_code = String::from("00 100");
    reformatted.country = String::from("ke");

    assert_eq!(original.shipping_key(), reformatted.shipping_key());
    assert_eq!(reformatted.shipping_key().country(), "KE");
}

#[test]
fn test_address_type_round_trips_through_strings() {
    assert_eq!(
        AddressType::from_str("billing").unwrap(),
        AddressType::Billing
    );
    assert_eq!(AddressType::Shipping.to_string(), "SHIPPING");
    assert_eq!(
        AddressType::from_str("office"),
        Err(DomainError::InvalidAddressType(String::from("office")))
    );
}

#[test]
fn test_saved_address_serializes_flat_camel_case() {
    let saved: SavedAddress = create_test_saved_address(3, "KE");
    let value: serde_json::Value = serde_json::to_value(&saved).unwrap();

    assert_eq!(value["addressId"], 3);
    assert_eq!(value["addressType"], "SHIPPING");
    assert_eq!(value["recipientName"], "Wanjiru Kamau");
    assert_eq!(value["postalCode"], "00100");
    assert!(value.get("companyName").is_none());
}

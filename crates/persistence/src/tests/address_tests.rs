// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use merch_checkout_domain::{Address, AddressType, SavedAddress};

use crate::tests::{create_test_address, create_test_customer, create_test_persistence};
use crate::{AddressRecord, Persistence, PersistenceError};

#[test]
fn test_create_and_list_addresses() {
    let mut persistence: Persistence = create_test_persistence();
    let customer_id: i64 = create_test_customer(&mut persistence);

    let saved: SavedAddress = persistence
        .create_address(customer_id, AddressType::Shipping, true, &create_test_address())
        .unwrap();

    assert_eq!(saved.customer_id, customer_id);
    assert_eq!(saved.address.country, "KE");
    assert_eq!(saved.address.street2.as_deref(), Some("Floor 3"));

    let listed: Vec<SavedAddress> = persistence.list_addresses(customer_id).unwrap();
    assert_eq!(listed, vec![saved]);
}

#[test]
fn test_address_for_unknown_customer_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<SavedAddress, PersistenceError> =
        persistence.create_address(77, AddressType::Billing, false, &create_test_address());

    assert_eq!(result.unwrap_err(), PersistenceError::CustomerNotFound(77));
}

#[test]
fn test_new_default_demotes_previous_default_of_same_type() {
    let mut persistence: Persistence = create_test_persistence();
    let customer_id: i64 = create_test_customer(&mut persistence);

    let first: SavedAddress = persistence
        .create_address(customer_id, AddressType::Shipping, true, &create_test_address())
        .unwrap();
    let billing: SavedAddress = persistence
        .create_address(customer_id, AddressType::Billing, true, &create_test_address())
        .unwrap();

    let mut office: Address = create_test_address();
    office.street = String::from("1 Harambee Avenue");
    let second: SavedAddress = persistence
        .create_address(customer_id, AddressType::Shipping, true, &office)
        .unwrap();

    let default_shipping: SavedAddress = persistence
        .get_default_address(customer_id, AddressType::Shipping)
        .unwrap()
        .unwrap();
    assert_eq!(default_shipping.address_id, second.address_id);

    let default_billing: SavedAddress = persistence
        .get_default_address(customer_id, AddressType::Billing)
        .unwrap()
        .unwrap();
    assert_eq!(default_billing.address_id, billing.address_id);

    let demoted: AddressRecord = persistence.get_address(first.address_id).unwrap().unwrap();
    assert!(!demoted.address.is_default);
}

#[test]
fn test_replacement_gets_new_id_and_retires_old_address() {
    let mut persistence: Persistence = create_test_persistence();
    let customer_id: i64 = create_test_customer(&mut persistence);
    let original: SavedAddress = persistence
        .create_address(customer_id, AddressType::Shipping, true, &create_test_address())
        .unwrap();

    let mut edited: Address = create_test_address();
    edited.phone = Some(String::from("+254 700 111222"));
    let replacement: SavedAddress = persistence
        .replace_address(original.address_id, &edited)
        .unwrap();

    assert_ne!(replacement.address_id, original.address_id);
    assert!(replacement.is_default);
    assert_eq!(replacement.address.phone.as_deref(), Some("+254 700 111222"));

    // The old id still resolves, as a retired record.
    let old: AddressRecord = persistence.get_address(original.address_id).unwrap().unwrap();
    assert!(old.is_retired);
    assert_eq!(old.replaced_by, Some(replacement.address_id));

    let listed: Vec<SavedAddress> = persistence.list_addresses(customer_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].address_id, replacement.address_id);

    let again: Result<SavedAddress, PersistenceError> =
        persistence.replace_address(original.address_id, &edited);
    assert_eq!(
        again.unwrap_err(),
        PersistenceError::AddressRetired(original.address_id)
    );
}

#[test]
fn test_replacing_unknown_address_fails() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<SavedAddress, PersistenceError> =
        persistence.replace_address(5, &create_test_address());

    assert_eq!(result.unwrap_err(), PersistenceError::AddressNotFound(5));
}

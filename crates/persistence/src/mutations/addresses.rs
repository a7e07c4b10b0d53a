// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Address book mutations.
//!
//! Addresses are immutable once stored. A change is a full replacement:
//! the new address gets a fresh id and the old row is retired.

use diesel::SqliteConnection;
use diesel::prelude::*;
use merch_checkout_domain::{Address, AddressType, SavedAddress};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::AddressRecord;
use crate::diesel_schema::addresses;
use crate::error::PersistenceError;
use crate::queries::addresses::get_address;
use crate::queries::customers::get_customer_by_id;

fn demote_defaults(
    conn: &mut SqliteConnection,
    customer_id: i64,
    address_type: AddressType,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(addresses::table)
        .filter(addresses::customer_id.eq(customer_id))
        .filter(addresses::address_type.eq(address_type.as_str()))
        .filter(addresses::is_default.eq(1))
        .set(addresses::is_default.eq(0))
        .execute(conn)?)
}

fn insert_address(
    conn: &mut SqliteConnection,
    customer_id: i64,
    address_type: AddressType,
    is_default: bool,
    address: &Address,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(addresses::table)
        .values((
            addresses::customer_id.eq(customer_id),
            addresses::address_type.eq(address_type.as_str()),
            addresses::is_default.eq(i32::from(is_default)),
            addresses::recipient_name.eq(&address.recipient_name),
            addresses::company_name.eq(&address.company_name),
            addresses::street.eq(&address.street),
            addresses::street2.eq(&address.street2),
            addresses::city.eq(&address.city),
            addresses::state.eq(&address.state),
            addresses::postal_code.eq(&address.postal_code),
            addresses::country.eq(address.country_code()),
            addresses::phone.eq(&address.phone),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Saves a new address for a customer.
///
/// A new default demotes the customer's previous default of the same type.
///
/// # Errors
///
/// Returns an error if the customer does not exist or the insert fails.
pub fn create_address(
    conn: &mut SqliteConnection,
    customer_id: i64,
    address_type: AddressType,
    is_default: bool,
    address: &Address,
) -> Result<SavedAddress, PersistenceError> {
    conn.transaction(|conn| {
        if get_customer_by_id(conn, customer_id)?.is_none() {
            return Err(PersistenceError::CustomerNotFound(customer_id));
        }

        if is_default {
            demote_defaults(conn, customer_id, address_type)?;
        }

        let address_id: i64 = insert_address(conn, customer_id, address_type, is_default, address)?;
        info!(address_id, customer_id, address_type = %address_type, is_default, "Saved address");

        Ok(SavedAddress {
            address_id,
            customer_id,
            address_type,
            is_default,
            address: Address {
                country: address.country_code(),
                ..address.clone()
            },
        })
    })
}

/// Replaces an address with a new submission.
///
/// The replacement inherits the type and default flag and receives a new
/// id. The old address is retired and points at its replacement.
///
/// # Errors
///
/// Returns an error if the address does not exist, is already retired,
/// or a statement fails.
pub fn replace_address(
    conn: &mut SqliteConnection,
    address_id: i64,
    address: &Address,
) -> Result<SavedAddress, PersistenceError> {
    conn.transaction(|conn| {
        let existing: AddressRecord =
            get_address(conn, address_id)?.ok_or(PersistenceError::AddressNotFound(address_id))?;
        if existing.is_retired {
            return Err(PersistenceError::AddressRetired(address_id));
        }

        let old: SavedAddress = existing.address;
        let new_id: i64 = insert_address(
            conn,
            old.customer_id,
            old.address_type,
            old.is_default,
            address,
        )?;

        diesel::update(addresses::table)
            .filter(addresses::address_id.eq(address_id))
            .set((
                addresses::is_retired.eq(1),
                addresses::is_default.eq(0),
                addresses::replaced_by.eq(Some(new_id)),
            ))
            .execute(conn)?;

        info!(old_address_id = address_id, new_address_id = new_id, "Replaced address");

        Ok(SavedAddress {
            address_id: new_id,
            customer_id: old.customer_id,
            address_type: old.address_type,
            is_default: old.is_default,
            address: Address {
                country: address.country_code(),
                ..address.clone()
            },
        })
    })
}

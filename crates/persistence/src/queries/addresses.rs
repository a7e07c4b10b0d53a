// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Address book queries.
//!
//! Retired addresses stay readable by id so that checkout sessions and
//! bundles that reference them still resolve, but they are left out of
//! listings and default lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;
use merch_checkout_domain::{Address, AddressType, SavedAddress};
use tracing::debug;

use crate::data_models::AddressRecord;
use crate::diesel_schema::addresses;
use crate::error::PersistenceError;
use crate::queries::parse_enum;

#[derive(Queryable, Selectable)]
#[diesel(table_name = addresses)]
pub(crate) struct AddressRow {
    address_id: i64,
    customer_id: i64,
    address_type: String,
    is_default: i32,
    is_retired: i32,
    replaced_by: Option<i64>,
    recipient_name: String,
    company_name: Option<String>,
    street: String,
    street2: Option<String>,
    city: String,
    state: Option<String>,
    postal_code: String,
    country: String,
    phone: Option<String>,
}

impl AddressRow {
    pub(crate) fn into_record(self) -> Result<AddressRecord, PersistenceError> {
        let address_type: AddressType = parse_enum("address_type", &self.address_type)?;
        Ok(AddressRecord {
            address: SavedAddress {
                address_id: self.address_id,
                customer_id: self.customer_id,
                address_type,
                is_default: self.is_default != 0,
                address: Address {
                    recipient_name: self.recipient_name,
                    company_name: self.company_name,
                    street: self.street,
                    street2: self.street2,
                    city: self.city,
                    state: self.state,
                    postal_code: self.postal_code,
                    country: self.country,
                    phone: self.phone,
                },
            },
            is_retired: self.is_retired != 0,
            replaced_by: self.replaced_by,
        })
    }
}

/// Lists a customer's current (non-retired) addresses, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_addresses(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<SavedAddress>, PersistenceError> {
    debug!(customer_id, "Listing addresses");

    addresses::table
        .filter(addresses::customer_id.eq(customer_id))
        .filter(addresses::is_retired.eq(0))
        .order(addresses::address_id.asc())
        .select(AddressRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| row.into_record().map(|record| record.address))
        .collect()
}

/// Retrieves an address by id, including retired addresses.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_address(
    conn: &mut SqliteConnection,
    address_id: i64,
) -> Result<Option<AddressRecord>, PersistenceError> {
    debug!(address_id, "Looking up address");

    addresses::table
        .filter(addresses::address_id.eq(address_id))
        .select(AddressRow::as_select())
        .first(conn)
        .optional()?
        .map(AddressRow::into_record)
        .transpose()
}

/// Retrieves a customer's default address of a type.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_default_address(
    conn: &mut SqliteConnection,
    customer_id: i64,
    address_type: AddressType,
) -> Result<Option<SavedAddress>, PersistenceError> {
    debug!(customer_id, address_type = %address_type, "Looking up default address");

    addresses::table
        .filter(addresses::customer_id.eq(customer_id))
        .filter(addresses::address_type.eq(address_type.as_str()))
        .filter(addresses::is_default.eq(1))
        .filter(addresses::is_retired.eq(0))
        .select(AddressRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| row.into_record().map(|record| record.address))
        .transpose()
}

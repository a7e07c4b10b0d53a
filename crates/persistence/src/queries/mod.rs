// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `customers`: Customer accounts and bearer sessions
//! - `addresses`: The address book
//! - `checkout`: Checkout sessions and pending bundles

pub mod addresses;
pub mod checkout;
pub mod customers;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::PersistenceError;

/// Parses a money column.
pub(crate) fn parse_decimal(column: &'static str, value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value).map_err(|_| PersistenceError::InvalidStoredValue {
        column,
        value: value.to_string(),
    })
}

/// Parses a column holding the string form of a domain enum.
pub(crate) fn parse_enum<T: FromStr>(
    column: &'static str,
    value: &str,
) -> Result<T, PersistenceError> {
    T::from_str(value).map_err(|_| PersistenceError::InvalidStoredValue {
        column,
        value: value.to_string(),
    })
}

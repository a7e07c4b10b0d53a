// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the merch checkout service.
//!
//! Stores customers, bearer sessions, the address book, checkout sessions
//! and the bundle hand-off between the shipping and payment steps. Built
//! on Diesel over `SQLite`.
//!
//! ## Storage conventions
//!
//! - Money is stored as decimal strings and read back as `Decimal`
//! - Cart items, quoted shipping options and bundles are stored as JSON
//! - Addresses are never updated in place; replacements retire the old row
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own isolated
//! shared-cache in-memory database with migrations applied.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
// Links the bundled SQLite build.
use libsqlite3_sys as _;
use merch_checkout_domain::{Address, AddressType, CheckoutBundle, CheckoutSession, SavedAddress};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AddressRecord, AuthSessionData, CustomerData};
pub use error::PersistenceError;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:merch_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Lists the application tables present in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(&mut self) -> Result<Vec<String>, PersistenceError> {
        backend::sqlite::list_tables(&mut self.conn)
    }

    // ========================================================================
    // Customers & Bearer Sessions
    // ========================================================================

    /// Creates a customer account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails.
    pub fn create_customer(
        &mut self,
        email: &str,
        display_name: &str,
        phone: Option<&str>,
        password: &str,
        roles: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::customers::create_customer(
            &mut self.conn,
            email,
            display_name,
            phone,
            password,
            roles,
        )
    }

    /// Retrieves a customer by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_customer_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<CustomerData>, PersistenceError> {
        queries::customers::get_customer_by_email(&mut self.conn, email)
    }

    /// Retrieves a customer by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_customer_by_id(
        &mut self,
        customer_id: i64,
    ) -> Result<Option<CustomerData>, PersistenceError> {
        queries::customers::get_customer_by_id(&mut self.conn, customer_id)
    }

    /// Counts customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_customers(&mut self) -> Result<i64, PersistenceError> {
        queries::customers::count_customers(&mut self.conn)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, customer_id: i64) -> Result<(), PersistenceError> {
        mutations::customers::update_last_login(&mut self.conn, customer_id)
    }

    /// Creates a bearer session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_auth_session(
        &mut self,
        session_token: &str,
        customer_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::customers::create_auth_session(
            &mut self.conn,
            session_token,
            customer_id,
            expires_at,
        )
    }

    /// Retrieves a bearer session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_auth_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<AuthSessionData>, PersistenceError> {
        queries::customers::get_auth_session_by_token(&mut self.conn, session_token)
    }

    /// Touches a bearer session's activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, auth_session_id: i64) -> Result<(), PersistenceError> {
        mutations::customers::update_session_activity(&mut self.conn, auth_session_id)
    }

    /// Deletes a bearer session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_auth_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::customers::delete_auth_session(&mut self.conn, session_token)
    }

    /// Deletes bearer sessions that have expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::customers::delete_expired_sessions(&mut self.conn, OffsetDateTime::now_utc())
    }

    // ========================================================================
    // Address Book
    // ========================================================================

    /// Saves a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or the insert fails.
    pub fn create_address(
        &mut self,
        customer_id: i64,
        address_type: AddressType,
        is_default: bool,
        address: &Address,
    ) -> Result<SavedAddress, PersistenceError> {
        mutations::addresses::create_address(
            &mut self.conn,
            customer_id,
            address_type,
            is_default,
            address,
        )
    }

    /// Replaces an address; the replacement gets a new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is missing or already retired.
    pub fn replace_address(
        &mut self,
        address_id: i64,
        address: &Address,
    ) -> Result<SavedAddress, PersistenceError> {
        mutations::addresses::replace_address(&mut self.conn, address_id, address)
    }

    /// Lists a customer's current addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_addresses(&mut self, customer_id: i64) -> Result<Vec<SavedAddress>, PersistenceError> {
        queries::addresses::list_addresses(&mut self.conn, customer_id)
    }

    /// Retrieves an address by id, including retired ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_address(&mut self, address_id: i64) -> Result<Option<AddressRecord>, PersistenceError> {
        queries::addresses::get_address(&mut self.conn, address_id)
    }

    /// Retrieves a customer's default address of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_default_address(
        &mut self,
        customer_id: i64,
        address_type: AddressType,
    ) -> Result<Option<SavedAddress>, PersistenceError> {
        queries::addresses::get_default_address(&mut self.conn, customer_id, address_type)
    }

    // ========================================================================
    // Checkout Sessions & Bundles
    // ========================================================================

    /// Inserts a new checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_checkout_session(
        &mut self,
        session: &CheckoutSession,
    ) -> Result<(), PersistenceError> {
        mutations::checkout::create_checkout_session(&mut self.conn, session)
    }

    /// Writes back a checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the update fails.
    pub fn update_checkout_session(
        &mut self,
        session: &CheckoutSession,
    ) -> Result<(), PersistenceError> {
        mutations::checkout::update_checkout_session(&mut self.conn, session)
    }

    /// Retrieves a checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_checkout_session(
        &mut self,
        session_id: &str,
    ) -> Result<Option<CheckoutSession>, PersistenceError> {
        queries::checkout::get_checkout_session(&mut self.conn, session_id)
    }

    /// Lists a customer's checkout sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_checkout_sessions(
        &mut self,
        customer_id: i64,
    ) -> Result<Vec<CheckoutSession>, PersistenceError> {
        queries::checkout::list_checkout_sessions(&mut self.conn, customer_id)
    }

    /// Stores the pending bundle for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the insert fails.
    pub fn store_bundle(&mut self, bundle: &CheckoutBundle) -> Result<(), PersistenceError> {
        mutations::checkout::store_bundle(&mut self.conn, bundle)
    }

    /// Stores a validated session's bundle and writes back the session
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or a write fails.
    /// Nothing is written in that case.
    pub fn store_validated_checkout(
        &mut self,
        session: &CheckoutSession,
        bundle: &CheckoutBundle,
    ) -> Result<(), PersistenceError> {
        mutations::checkout::store_validated_checkout(&mut self.conn, session, bundle)
    }

    /// Drops the pending bundle and writes back a reopened session
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or a write fails.
    pub fn reopen_checkout_session(
        &mut self,
        session: &CheckoutSession,
    ) -> Result<(), PersistenceError> {
        mutations::checkout::reopen_checkout_session(&mut self.conn, session)
    }

    /// Retrieves the pending bundle without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pending_bundle(
        &mut self,
        session_id: &str,
    ) -> Result<Option<CheckoutBundle>, PersistenceError> {
        queries::checkout::get_pending_bundle(&mut self.conn, session_id)
    }

    /// Drops the pending bundle for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn discard_bundle(&mut self, session_id: &str) -> Result<bool, PersistenceError> {
        mutations::checkout::discard_bundle(&mut self.conn, session_id)
    }

    /// Consumes the pending bundle and completes the session.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no pending bundle.
    pub fn consume_bundle(&mut self, session_id: &str) -> Result<CheckoutBundle, PersistenceError> {
        mutations::checkout::consume_bundle(&mut self.conn, session_id)
    }
}

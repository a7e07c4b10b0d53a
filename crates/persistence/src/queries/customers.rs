// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer and bearer session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{AuthSessionData, CustomerData};
use crate::diesel_schema::{auth_sessions, customers};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = customers)]
struct CustomerRow {
    customer_id: i64,
    email: String,
    display_name: String,
    phone: Option<String>,
    password_hash: String,
    roles: String,
    created_at: String,
    last_login_at: Option<String>,
}

impl From<CustomerRow> for CustomerData {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer_id: row.customer_id,
            email: row.email,
            display_name: row.display_name,
            phone: row.phone,
            password_hash: row.password_hash,
            roles: row.roles,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = auth_sessions)]
struct AuthSessionRow {
    auth_session_id: i64,
    session_token: String,
    customer_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl From<AuthSessionRow> for AuthSessionData {
    fn from(row: AuthSessionRow) -> Self {
        Self {
            auth_session_id: row.auth_session_id,
            session_token: row.session_token,
            customer_id: row.customer_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

/// Retrieves a customer by email.
///
/// Emails are stored lowercase, so the lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_customer_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<CustomerData>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();
    debug!(email = %normalized, "Looking up customer by email");

    Ok(customers::table
        .filter(customers::email.eq(&normalized))
        .select(CustomerRow::as_select())
        .first(conn)
        .optional()?
        .map(CustomerData::from))
}

/// Retrieves a customer by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_customer_by_id(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Option<CustomerData>, PersistenceError> {
    debug!(customer_id, "Looking up customer by id");

    Ok(customers::table
        .filter(customers::customer_id.eq(customer_id))
        .select(CustomerRow::as_select())
        .first(conn)
        .optional()?
        .map(CustomerData::from))
}

/// Counts customers.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_customers(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(customers::table.count().get_result(conn)?)
}

/// Retrieves a bearer session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_auth_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<AuthSessionData>, PersistenceError> {
    debug!("Looking up bearer session by token");

    Ok(auth_sessions::table
        .filter(auth_sessions::session_token.eq(session_token))
        .select(AuthSessionRow::as_select())
        .first(conn)
        .optional()?
        .map(AuthSessionData::from))
}

/// Lists every bearer session.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_auth_sessions(
    conn: &mut SqliteConnection,
) -> Result<Vec<AuthSessionData>, PersistenceError> {
    Ok(auth_sessions::table
        .select(AuthSessionRow::as_select())
        .order(auth_sessions::auth_session_id.asc())
        .load(conn)?
        .into_iter()
        .map(AuthSessionData::from)
        .collect())
}

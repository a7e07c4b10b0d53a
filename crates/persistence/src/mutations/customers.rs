// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer and bearer session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{auth_sessions, customers};
use crate::error::PersistenceError;
use crate::queries::customers::{get_customer_by_email, list_auth_sessions};

/// Creates a customer account.
///
/// The email is normalized to lowercase. The password is hashed with bcrypt.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - Login email (will be normalized)
/// * `display_name` - Name shown on the profile
/// * `phone` - Optional contact phone
/// * `password` - The plain-text password (will be hashed)
/// * `roles` - Comma separated role names
///
/// # Errors
///
/// Returns an error if the email is taken or the insert fails.
pub fn create_customer(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    phone: Option<&str>,
    password: &str,
    roles: &str,
) -> Result<i64, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();

    if get_customer_by_email(conn, &normalized)?.is_some() {
        return Err(PersistenceError::DuplicateEmail(normalized));
    }

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(customers::table)
        .values((
            customers::email.eq(&normalized),
            customers::display_name.eq(display_name),
            customers::phone.eq(phone),
            customers::password_hash.eq(&password_hash),
            customers::roles.eq(roles),
        ))
        .execute(conn)?;

    let customer_id: i64 = get_last_insert_rowid(conn)?;
    info!(customer_id, email = %normalized, roles, "Created customer");
    Ok(customer_id)
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(conn: &mut SqliteConnection, customer_id: i64) -> Result<(), PersistenceError> {
    debug!(customer_id, "Updating last_login_at");

    diesel::update(customers::table)
        .filter(customers::customer_id.eq(customer_id))
        .set(customers::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Creates a bearer session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - Opaque token handed to the client
/// * `customer_id` - Owner of the session
/// * `expires_at` - RFC 3339 expiry timestamp
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_auth_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    customer_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(auth_sessions::table)
        .values((
            auth_sessions::session_token.eq(session_token),
            auth_sessions::customer_id.eq(customer_id),
            auth_sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let auth_session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(auth_session_id, customer_id, expires_at, "Created bearer session");
    Ok(auth_session_id)
}

/// Touches a bearer session's activity timestamp.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    auth_session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(auth_sessions::table)
        .filter(auth_sessions::auth_session_id.eq(auth_session_id))
        .set(
            auth_sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;
    Ok(())
}

/// Deletes a bearer session by token. Used for logout.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_auth_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(auth_sessions::table)
        .filter(auth_sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}

/// Deletes bearer sessions that expired before `now`.
///
/// Sessions whose expiry cannot be parsed are deleted as well.
///
/// # Errors
///
/// Returns an error if the query or delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let expired: Vec<i64> = list_auth_sessions(conn)?
        .into_iter()
        .filter(|session| {
            OffsetDateTime::parse(&session.expires_at, &Rfc3339).map_or_else(
                |_| {
                    warn!(
                        auth_session_id = session.auth_session_id,
                        "Bearer session has an unreadable expiry"
                    );
                    true
                },
                |expires_at| expires_at <= now,
            )
        })
        .map(|session| session.auth_session_id)
        .collect();

    if expired.is_empty() {
        return Ok(0);
    }

    let deleted: usize = diesel::delete(auth_sessions::table)
        .filter(auth_sessions::auth_session_id.eq_any(&expired))
        .execute(conn)?;

    info!(deleted, "Deleted expired bearer sessions");
    Ok(deleted)
}

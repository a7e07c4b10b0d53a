// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkout session mutations and the bundle hand-off.

use diesel::SqliteConnection;
use diesel::prelude::*;
use merch_checkout_domain::{CheckoutBundle, CheckoutSession, SessionStatus};
use tracing::{debug, info};

use crate::diesel_schema::{checkout_bundles, checkout_sessions};
use crate::error::PersistenceError;
use crate::queries::checkout::get_pending_bundle;

/// Inserts a new checkout session.
///
/// # Errors
///
/// Returns an error if the customer does not exist or the insert fails.
pub fn create_checkout_session(
    conn: &mut SqliteConnection,
    session: &CheckoutSession,
) -> Result<(), PersistenceError> {
    let items_json: String = serde_json::to_string(&session.items)?;
    let options_json: String = serde_json::to_string(&session.shipping_options)?;

    diesel::insert_into(checkout_sessions::table)
        .values((
            checkout_sessions::session_id.eq(&session.session_id),
            checkout_sessions::customer_id.eq(session.customer_id),
            checkout_sessions::items_json.eq(&items_json),
            checkout_sessions::discount.eq(session.totals.discount.to_string()),
            checkout_sessions::urgency_level.eq(session.urgency_level.as_str()),
            checkout_sessions::shipping_address_id.eq(session.shipping_address_id),
            checkout_sessions::shipping_options_json.eq(&options_json),
            checkout_sessions::selected_shipping_option_id
                .eq(&session.selected_shipping_option_id),
            checkout_sessions::subtotal.eq(session.totals.subtotal.to_string()),
            checkout_sessions::shipping_cost.eq(session.totals.shipping_cost.to_string()),
            checkout_sessions::estimated_tax.eq(session.totals.estimated_tax.to_string()),
            checkout_sessions::estimated_total.eq(session.totals.estimated_total.to_string()),
            checkout_sessions::status.eq(session.status.as_str()),
        ))
        .execute(conn)?;

    info!(
        session_id = %session.session_id,
        customer_id = session.customer_id,
        items = session.items.len(),
        "Created checkout session"
    );
    Ok(())
}

/// Writes back a checkout session's shipping, totals and status.
///
/// Items, discount and owner are fixed at creation and not rewritten.
///
/// # Errors
///
/// Returns an error if the session does not exist or the update fails.
pub fn update_checkout_session(
    conn: &mut SqliteConnection,
    session: &CheckoutSession,
) -> Result<(), PersistenceError> {
    let options_json: String = serde_json::to_string(&session.shipping_options)?;

    let updated: usize = diesel::update(checkout_sessions::table)
        .filter(checkout_sessions::session_id.eq(&session.session_id))
        .set((
            checkout_sessions::urgency_level.eq(session.urgency_level.as_str()),
            checkout_sessions::shipping_address_id.eq(session.shipping_address_id),
            checkout_sessions::shipping_options_json.eq(&options_json),
            checkout_sessions::selected_shipping_option_id
                .eq(&session.selected_shipping_option_id),
            checkout_sessions::subtotal.eq(session.totals.subtotal.to_string()),
            checkout_sessions::shipping_cost.eq(session.totals.shipping_cost.to_string()),
            checkout_sessions::estimated_tax.eq(session.totals.estimated_tax.to_string()),
            checkout_sessions::estimated_total.eq(session.totals.estimated_total.to_string()),
            checkout_sessions::status.eq(session.status.as_str()),
            checkout_sessions::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::CheckoutSessionNotFound(
            session.session_id.clone(),
        ));
    }

    debug!(
        session_id = %session.session_id,
        status = %session.status,
        "Updated checkout session"
    );
    Ok(())
}

/// Stores the bundle for a checkout session, replacing any earlier one.
///
/// # Errors
///
/// Returns an error if the session does not exist or a statement fails.
pub fn store_bundle(
    conn: &mut SqliteConnection,
    bundle: &CheckoutBundle,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| replace_bundle(conn, bundle))
}

/// Stores a validated session's bundle and writes back the session.
///
/// Both writes happen in one transaction: a failed session update leaves
/// the earlier bundle, if any, in place.
///
/// # Errors
///
/// Returns an error if the session does not exist or a statement fails.
pub fn store_validated_checkout(
    conn: &mut SqliteConnection,
    session: &CheckoutSession,
    bundle: &CheckoutBundle,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        replace_bundle(conn, bundle)?;
        update_checkout_session(conn, session)
    })
}

/// Drops a session's pending bundle and writes back the reopened session
/// in one transaction.
///
/// # Errors
///
/// Returns an error if the session does not exist or a statement fails.
pub fn reopen_checkout_session(
    conn: &mut SqliteConnection,
    session: &CheckoutSession,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        discard_bundle(conn, &session.session_id)?;
        update_checkout_session(conn, session)
    })
}

fn replace_bundle(
    conn: &mut SqliteConnection,
    bundle: &CheckoutBundle,
) -> Result<(), PersistenceError> {
    let json: String = serde_json::to_string(bundle)?;

    diesel::delete(checkout_bundles::table)
        .filter(checkout_bundles::session_id.eq(&bundle.session_id))
        .execute(conn)?;

    diesel::insert_into(checkout_bundles::table)
        .values((
            checkout_bundles::session_id.eq(&bundle.session_id),
            checkout_bundles::bundle_json.eq(&json),
        ))
        .execute(conn)?;

    info!(session_id = %bundle.session_id, "Stored checkout bundle");
    Ok(())
}

/// Drops the pending bundle for a session, if any.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn discard_bundle(conn: &mut SqliteConnection, session_id: &str) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(checkout_bundles::table)
        .filter(checkout_bundles::session_id.eq(session_id))
        .filter(checkout_bundles::consumed_at.is_null())
        .execute(conn)?;
    Ok(deleted > 0)
}

/// Hands the pending bundle to the payment step.
///
/// The bundle is marked consumed and the session completed in one
/// transaction, so a bundle can be consumed at most once.
///
/// # Errors
///
/// Returns an error if there is no pending bundle or a statement fails.
pub fn consume_bundle(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> Result<CheckoutBundle, PersistenceError> {
    conn.transaction(|conn| {
        let bundle: CheckoutBundle = get_pending_bundle(conn, session_id)?
            .ok_or_else(|| PersistenceError::BundleNotFound(session_id.to_string()))?;

        diesel::update(checkout_bundles::table)
            .filter(checkout_bundles::session_id.eq(session_id))
            .set(
                checkout_bundles::consumed_at.eq(diesel::dsl::sql::<
                    diesel::sql_types::Nullable<diesel::sql_types::Text>,
                >("CURRENT_TIMESTAMP")),
            )
            .execute(conn)?;

        diesel::update(checkout_sessions::table)
            .filter(checkout_sessions::session_id.eq(session_id))
            .set((
                checkout_sessions::status.eq(SessionStatus::Completed.as_str()),
                checkout_sessions::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                    "CURRENT_TIMESTAMP",
                )),
            ))
            .execute(conn)?;

        info!(session_id, "Consumed checkout bundle");
        Ok(bundle)
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkout session and bundle queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use merch_checkout_domain::{
    CartItem, CheckoutBundle, CheckoutSession, CheckoutTotals, SessionStatus, ShippingOption,
    UrgencyLevel,
};
use tracing::debug;

use crate::diesel_schema::{checkout_bundles, checkout_sessions};
use crate::error::PersistenceError;
use crate::queries::{parse_decimal, parse_enum};

#[derive(Queryable, Selectable)]
#[diesel(table_name = checkout_sessions)]
struct CheckoutSessionRow {
    session_id: String,
    customer_id: i64,
    items_json: String,
    discount: String,
    urgency_level: String,
    shipping_address_id: Option<i64>,
    shipping_options_json: String,
    selected_shipping_option_id: Option<String>,
    subtotal: String,
    shipping_cost: String,
    estimated_tax: String,
    estimated_total: String,
    status: String,
}

impl CheckoutSessionRow {
    fn into_session(self) -> Result<CheckoutSession, PersistenceError> {
        let items: Vec<CartItem> = serde_json::from_str(&self.items_json)?;
        let shipping_options: Vec<ShippingOption> =
            serde_json::from_str(&self.shipping_options_json)?;
        let urgency_level: UrgencyLevel = parse_enum("urgency_level", &self.urgency_level)?;
        let status: SessionStatus = parse_enum("status", &self.status)?;

        let totals: CheckoutTotals = CheckoutTotals {
            subtotal: parse_decimal("subtotal", &self.subtotal)?,
            shipping_cost: parse_decimal("shipping_cost", &self.shipping_cost)?,
            estimated_tax: parse_decimal("estimated_tax", &self.estimated_tax)?,
            discount: parse_decimal("discount", &self.discount)?,
            estimated_total: parse_decimal("estimated_total", &self.estimated_total)?,
        };

        Ok(CheckoutSession {
            session_id: self.session_id,
            customer_id: self.customer_id,
            items,
            discount: totals.discount,
            urgency_level,
            shipping_address_id: self.shipping_address_id,
            shipping_options,
            selected_shipping_option_id: self.selected_shipping_option_id,
            totals,
            status,
        })
    }
}

/// Retrieves a checkout session by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_checkout_session(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> Result<Option<CheckoutSession>, PersistenceError> {
    debug!(session_id, "Looking up checkout session");

    checkout_sessions::table
        .filter(checkout_sessions::session_id.eq(session_id))
        .select(CheckoutSessionRow::as_select())
        .first(conn)
        .optional()?
        .map(CheckoutSessionRow::into_session)
        .transpose()
}

/// Lists a customer's checkout sessions, most recently created first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_checkout_sessions(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<CheckoutSession>, PersistenceError> {
    debug!(customer_id, "Listing checkout sessions");

    checkout_sessions::table
        .filter(checkout_sessions::customer_id.eq(customer_id))
        .order((
            checkout_sessions::created_at.desc(),
            checkout_sessions::session_id.asc(),
        ))
        .select(CheckoutSessionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(CheckoutSessionRow::into_session)
        .collect()
}

/// Retrieves the bundle waiting to be consumed for a checkout session.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored JSON is corrupt.
pub fn get_pending_bundle(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> Result<Option<CheckoutBundle>, PersistenceError> {
    debug!(session_id, "Looking up pending checkout bundle");

    let json: Option<String> = checkout_bundles::table
        .filter(checkout_bundles::session_id.eq(session_id))
        .filter(checkout_bundles::consumed_at.is_null())
        .select(checkout_bundles::bundle_json)
        .first(conn)
        .optional()?;

    json.map(|json| serde_json::from_str(&json).map_err(PersistenceError::from))
        .transpose()
}

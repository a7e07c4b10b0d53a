// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A stored customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    pub customer_id: i64,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    /// Comma separated role names, e.g. `CUSTOMER,STAFF`.
    pub roles: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored bearer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSessionData {
    pub auth_session_id: i64,
    pub session_token: String,
    pub customer_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// RFC 3339 timestamp.
    pub expires_at: String,
}

/// A saved address together with its replacement bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: merch_checkout_domain::SavedAddress,
    pub is_retired: bool,
    pub replaced_by: Option<i64>,
}

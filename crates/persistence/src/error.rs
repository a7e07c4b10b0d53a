// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored column could not be converted back into a domain value.
    InvalidStoredValue {
        /// Column name.
        column: &'static str,
        /// Raw stored value.
        value: String,
    },
    /// The requested customer was not found.
    CustomerNotFound(i64),
    /// A customer with this email already exists.
    DuplicateEmail(String),
    /// The requested address was not found.
    AddressNotFound(i64),
    /// The address has been replaced and can no longer be changed.
    AddressRetired(i64),
    /// The requested checkout session was not found.
    CheckoutSessionNotFound(String),
    /// No pending bundle exists for the checkout session.
    BundleNotFound(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::InvalidStoredValue { column, value } => {
                write!(f, "Invalid value '{value}' stored in column '{column}'")
            }
            Self::CustomerNotFound(id) => write!(f, "Customer not found: {id}"),
            Self::DuplicateEmail(email) => {
                write!(f, "A customer with email '{email}' already exists")
            }
            Self::AddressNotFound(id) => write!(f, "Address not found: {id}"),
            Self::AddressRetired(id) => {
                write!(f, "Address {id} has been replaced and cannot be changed")
            }
            Self::CheckoutSessionNotFound(id) => write!(f, "Checkout session not found: {id}"),
            Self::BundleNotFound(id) => {
                write!(f, "No pending checkout bundle for session: {id}")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use merch_checkout::Actor;
use merch_checkout_persistence::{AuthSessionData, CustomerData, Persistence, PersistenceError};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Customer roles for authorization.
///
/// Ordered by authority; a customer holding several roles acts with the
/// highest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// A shopper. May act on their own sessions, addresses and profile.
    Customer,
    /// Support staff. May read and act on any customer's checkout.
    Staff,
    /// Administrator. Everything staff may do.
    Admin,
}

impl Role {
    /// Converts this role to its stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Staff => "STAFF",
            Self::Admin => "ADMIN",
        }
    }

    /// Parses a comma separated role list and returns the highest role.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or names an unknown role.
    pub fn highest(roles: &str) -> Result<Self, AuthError> {
        let mut highest: Option<Self> = None;
        for name in roles.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let role: Self = match name {
                "CUSTOMER" => Self::Customer,
                "STAFF" => Self::Staff,
                "ADMIN" => Self::Admin,
                _ => {
                    return Err(AuthError::AuthenticationFailed {
                        reason: format!("Invalid role: {name}"),
                    });
                }
            };
            highest = highest.max(Some(role));
        }
        highest.ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("Account has no roles"),
        })
    }
}

/// An authenticated customer with their effective role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer {
    /// The customer id.
    pub customer_id: i64,
    /// The customer's email address.
    pub email: String,
    /// The effective role.
    pub role: Role,
}

impl AuthenticatedCustomer {
    /// Creates a new authenticated customer.
    #[must_use]
    pub const fn new(customer_id: i64, email: String, role: Role) -> Self {
        Self {
            customer_id,
            email,
            role,
        }
    }

    /// Converts this customer into the actor recorded on flow events.
    #[must_use]
    pub fn to_flow_actor(&self) -> Actor {
        Actor::new(
            self.customer_id.to_string(),
            self.role.as_str().to_lowercase(),
        )
    }
}

/// Authorization service for resource ownership.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may act on a resource owned by a customer.
    ///
    /// Owners may always act on their own resources. Staff and admins may
    /// act on anyone's.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a customer acting on someone else's
    /// resource.
    pub fn authorize_owner(
        actor: &AuthenticatedCustomer,
        owner_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.customer_id == owner_id || actor.role >= Role::Staff {
            return Ok(());
        }
        warn!(
            customer_id = actor.customer_id,
            owner_id, action, "Rejected access to another customer's resource"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from(Role::Staff.as_str()),
        })
    }
}

/// Authentication service for bearer-session authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime.
    pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(24);

    /// Authenticates a customer by email and password and creates a session.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_customer`, `customer_data`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the email is unknown, the password is wrong or the
    /// session cannot be stored. Unknown emails and wrong passwords produce
    /// the same message.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        ttl: Duration,
    ) -> Result<(String, AuthenticatedCustomer, CustomerData, String), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let customer: CustomerData = persistence
            .get_customer_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid)?;

        let password_ok: bool = bcrypt::verify(password, &customer.password_hash).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Failed to verify password: {e}"),
            }
        })?;
        if !password_ok {
            debug!(customer_id = customer.customer_id, "Password mismatch");
            return Err(invalid());
        }

        let role: Role = Role::highest(&customer.roles)?;
        let session_token: String = Self::generate_session_token();

        let expires_at: String = (OffsetDateTime::now_utc() + ttl)
            .format(&Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_auth_session(&session_token, customer.customer_id, &expires_at)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(customer.customer_id)
            .map_err(Self::map_persistence_error)?;

        info!(customer_id = customer.customer_id, role = role.as_str(), "Customer logged in");

        let authenticated: AuthenticatedCustomer =
            AuthenticatedCustomer::new(customer.customer_id, customer.email.clone(), role);
        Ok((session_token, authenticated, customer, expires_at))
    }

    /// Validates a session token and returns the authenticated customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedCustomer, CustomerData), AuthError> {
        let session: AuthSessionData = persistence
            .get_auth_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Rfc3339).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let customer: CustomerData = persistence
            .get_customer_by_id(session.customer_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Customer not found"),
            })?;

        let role: Role = Role::highest(&customer.roles)?;

        persistence
            .update_session_activity(session.auth_session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated: AuthenticatedCustomer =
            AuthenticatedCustomer::new(customer.customer_id, customer.email.clone(), role);
        Ok((authenticated, customer))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_auth_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Generates an opaque session token.
    fn generate_session_token() -> String {
        format!(
            "mcs_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}

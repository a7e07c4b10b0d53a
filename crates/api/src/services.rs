// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The services a checkout flow calls out to.

use merch_checkout_domain::SavedAddress;
use merch_checkout_persistence::Persistence;

use crate::auth::AuthenticatedCustomer;
use crate::config::CheckoutConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{
    CalculateShippingRequest, CalculateShippingResponse, ValidateCheckoutRequest,
    ValidateCheckoutResponse,
};

/// Address book, shipping calculator and checkout validation, as seen by
/// the flow controller.
pub trait CheckoutServices {
    /// Fetches the customer's current addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the address book cannot be read.
    fn list_addresses(&mut self) -> Result<Vec<SavedAddress>, ApiError>;

    /// Quotes shipping for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if no quote can be produced.
    fn calculate_shipping(
        &mut self,
        session_id: &str,
        request: &CalculateShippingRequest,
    ) -> Result<CalculateShippingResponse, ApiError>;

    /// Validates a checkout and stores its bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be validated at all.
    fn validate_checkout(
        &mut self,
        session_id: &str,
        request: &ValidateCheckoutRequest,
    ) -> Result<ValidateCheckoutResponse, ApiError>;
}

/// Services backed directly by the handlers and a persistence connection.
pub struct LocalCheckoutServices<'a> {
    persistence: &'a mut Persistence,
    config: &'a CheckoutConfig,
    actor: &'a AuthenticatedCustomer,
}

impl<'a> LocalCheckoutServices<'a> {
    /// Creates services acting for a customer.
    pub const fn new(
        persistence: &'a mut Persistence,
        config: &'a CheckoutConfig,
        actor: &'a AuthenticatedCustomer,
    ) -> Self {
        Self {
            persistence,
            config,
            actor,
        }
    }
}

impl CheckoutServices for LocalCheckoutServices<'_> {
    fn list_addresses(&mut self) -> Result<Vec<SavedAddress>, ApiError> {
        Ok(handlers::list_addresses(self.persistence, self.actor)?.addresses)
    }

    fn calculate_shipping(
        &mut self,
        session_id: &str,
        request: &CalculateShippingRequest,
    ) -> Result<CalculateShippingResponse, ApiError> {
        handlers::calculate_shipping(self.persistence, self.config, self.actor, session_id, request)
    }

    fn validate_checkout(
        &mut self,
        session_id: &str,
        request: &ValidateCheckoutRequest,
    ) -> Result<ValidateCheckoutResponse, ApiError> {
        handlers::validate_checkout(self.persistence, self.config, self.actor, session_id, request)
    }
}

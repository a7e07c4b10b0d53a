// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers for accounts, the address book and checkout sessions.
//!
//! Handlers take the persistence layer and the authenticated customer
//! explicitly, translate domain and persistence errors into `ApiError`,
//! and never trust prices supplied by the caller.

use merch_checkout_domain::{
    AddressType, CheckoutBundle, CheckoutSession, CheckoutTotals, DomainError,
    PricedPaymentMethod, SavedAddress, SessionStatus, ShippingOption, UrgencyLevel,
    calculate_totals, eligible_payment_methods, require_eligible_method, validate_address,
    validate_cart_items, validate_phone, validate_shipping_option,
};
use merch_checkout_persistence::{AddressRecord, CustomerData, Persistence};
use rust_decimal::Decimal;
use time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedCustomer, AuthenticationService, AuthorizationService, Role};
use crate::config::CheckoutConfig;
use crate::error::{ApiError, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AddressResponse, CalculateShippingRequest, CalculateShippingResponse,
    CreateAddressRequest, CreateCheckoutSessionRequest, ListAddressesResponse,
    ListCheckoutSessionsResponse, LoginRequest, LoginResponse, PaymentMethodsResponse,
    ProfileResponse, RegisterCustomerRequest, RegisterCustomerResponse, ReplaceAddressRequest,
    ValidateCheckoutRequest, ValidateCheckoutResponse,
};

// ============================================================================
// Accounts
// ============================================================================

/// Registers a customer account.
///
/// New accounts always get the `CUSTOMER` role.
///
/// # Errors
///
/// Returns an error if:
/// - The email or display name is blank
/// - The phone number is malformed
/// - The password violates the password policy
/// - The email is already registered
pub fn register_customer(
    persistence: &mut Persistence,
    request: &RegisterCustomerRequest,
) -> Result<RegisterCustomerResponse, ApiError> {
    let email: &str = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: String::from("A valid email address is required"),
        });
    }
    let display_name: &str = request.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("displayName"),
            message: String::from("Display name must not be empty"),
        });
    }
    if let Some(phone) = &request.phone {
        validate_phone(phone).map_err(translate_domain_error)?;
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        email,
        display_name,
    )?;

    let customer_id: i64 = persistence.create_customer(
        email,
        display_name,
        request.phone.as_deref(),
        &request.password,
        Role::Customer.as_str(),
    )?;

    Ok(RegisterCustomerResponse {
        customer_id,
        email: email.to_lowercase(),
        display_name: display_name.to_string(),
    })
}

/// Logs a customer in.
///
/// # Errors
///
/// Returns an error if the credentials are wrong.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_ttl: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, authenticated, customer, expires_at) =
        AuthenticationService::login(persistence, &request.email, &request.password, session_ttl)?;

    Ok(LoginResponse {
        session_token,
        customer_id: customer.customer_id,
        display_name: customer.display_name,
        role: authenticated.role.as_str().to_string(),
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the authenticated customer's profile.
#[must_use]
pub fn get_profile(customer: &CustomerData) -> ProfileResponse {
    ProfileResponse {
        customer_id: customer.customer_id,
        email: customer.email.clone(),
        display_name: customer.display_name.clone(),
        phone: customer.phone.clone(),
        roles: customer
            .roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(String::from)
            .collect(),
        created_at: customer.created_at.clone(),
        last_login_at: customer.last_login_at.clone(),
    }
}

// ============================================================================
// Address book
// ============================================================================

fn load_address(persistence: &mut Persistence, address_id: i64) -> Result<AddressRecord, ApiError> {
    persistence
        .get_address(address_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Address"),
            message: format!("Address {address_id} does not exist"),
        })
}

fn parse_address_type(value: &str) -> Result<AddressType, ApiError> {
    value.parse().map_err(translate_domain_error)
}

/// Lists the customer's current addresses.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_addresses(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
) -> Result<ListAddressesResponse, ApiError> {
    let addresses: Vec<SavedAddress> = persistence.list_addresses(actor.customer_id)?;
    Ok(ListAddressesResponse { addresses })
}

/// Saves a new address for the customer.
///
/// # Errors
///
/// Returns an error if the address type or address is invalid.
pub fn create_address(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    request: &CreateAddressRequest,
) -> Result<SavedAddress, ApiError> {
    let address_type: AddressType = parse_address_type(&request.address_type)?;
    validate_address(&request.address).map_err(translate_domain_error)?;

    let saved: SavedAddress = persistence.create_address(
        actor.customer_id,
        address_type,
        request.is_default,
        &request.address,
    )?;
    Ok(saved)
}

/// Retrieves one address, including retired ones.
///
/// # Errors
///
/// Returns an error if the address does not exist or belongs to someone else.
pub fn get_address(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    address_id: i64,
) -> Result<AddressResponse, ApiError> {
    let record: AddressRecord = load_address(persistence, address_id)?;
    AuthorizationService::authorize_owner(actor, record.address.customer_id, "get_address")?;

    Ok(AddressResponse {
        address: record.address,
        is_retired: record.is_retired,
        replaced_by: record.replaced_by,
    })
}

/// Retrieves the customer's default address of a type.
///
/// # Errors
///
/// Returns an error if the type is invalid or no default exists.
pub fn get_default_address(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    address_type: &str,
) -> Result<SavedAddress, ApiError> {
    let address_type: AddressType = parse_address_type(address_type)?;
    persistence
        .get_default_address(actor.customer_id, address_type)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Address"),
            message: format!("No default {address_type} address"),
        })
}

/// Replaces an address with a full resubmission.
///
/// The replacement gets a new id; the old id stays resolvable as a retired
/// record.
///
/// # Errors
///
/// Returns an error if the address is missing, retired, invalid or belongs
/// to someone else.
pub fn replace_address(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    address_id: i64,
    request: &ReplaceAddressRequest,
) -> Result<SavedAddress, ApiError> {
    let record: AddressRecord = load_address(persistence, address_id)?;
    AuthorizationService::authorize_owner(actor, record.address.customer_id, "replace_address")?;
    validate_address(&request.address).map_err(translate_domain_error)?;

    let replacement: SavedAddress = persistence.replace_address(address_id, &request.address)?;
    Ok(replacement)
}

// ============================================================================
// Checkout sessions
// ============================================================================

fn load_session(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    session_id: &str,
    action: &str,
) -> Result<CheckoutSession, ApiError> {
    let session: CheckoutSession = persistence
        .get_checkout_session(session_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Checkout session"),
            message: format!("Checkout session '{session_id}' does not exist"),
        })?;
    AuthorizationService::authorize_owner(actor, session.customer_id, action)?;
    Ok(session)
}

fn generate_session_id() -> String {
    format!("cs_{:016x}", rand::random::<u64>())
}

/// Opens a checkout session for the customer's cart.
///
/// Totals start without shipping.
///
/// # Errors
///
/// Returns an error if the cart or discount is invalid.
pub fn create_checkout_session(
    persistence: &mut Persistence,
    config: &CheckoutConfig,
    actor: &AuthenticatedCustomer,
    request: &CreateCheckoutSessionRequest,
) -> Result<CheckoutSession, ApiError> {
    validate_cart_items(&request.items).map_err(translate_domain_error)?;
    let discount: Decimal = request.discount.unwrap_or(Decimal::ZERO);
    let totals: CheckoutTotals =
        calculate_totals(&request.items, Decimal::ZERO, discount, &config.tax)
            .map_err(translate_domain_error)?;

    let session: CheckoutSession = CheckoutSession {
        session_id: generate_session_id(),
        customer_id: actor.customer_id,
        items: request.items.clone(),
        discount: totals.discount,
        urgency_level: UrgencyLevel::Normal,
        shipping_address_id: None,
        shipping_options: Vec::new(),
        selected_shipping_option_id: None,
        totals,
        status: SessionStatus::Open,
    };
    persistence.create_checkout_session(&session)?;
    Ok(session)
}

/// Retrieves a checkout session.
///
/// # Errors
///
/// Returns an error if the session does not exist or belongs to someone else.
pub fn get_checkout_session(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    session_id: &str,
) -> Result<CheckoutSession, ApiError> {
    load_session(persistence, actor, session_id, "get_checkout_session")
}

/// Lists the customer's checkout sessions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_checkout_sessions(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
) -> Result<ListCheckoutSessionsResponse, ApiError> {
    let sessions: Vec<CheckoutSession> = persistence.list_checkout_sessions(actor.customer_id)?;
    Ok(ListCheckoutSessionsResponse { sessions })
}

/// Quotes shipping for a session at an urgency level.
///
/// The quote is stored on the session so validation can check the selected
/// option against it. The session keeps its selected option when the new
/// quote still contains it and otherwise selects the first option. A
/// validated session is reopened and its pending bundle dropped.
///
/// # Errors
///
/// Returns an error if:
/// - The session or address does not exist or belongs to someone else
/// - The session is completed
/// - The urgency level is unknown or the address is invalid
/// - No shipping zone serves the destination
pub fn calculate_shipping(
    persistence: &mut Persistence,
    config: &CheckoutConfig,
    actor: &AuthenticatedCustomer,
    session_id: &str,
    request: &CalculateShippingRequest,
) -> Result<CalculateShippingResponse, ApiError> {
    let mut session: CheckoutSession =
        load_session(persistence, actor, session_id, "calculate_shipping")?;
    session.ensure_open().map_err(translate_domain_error)?;

    let urgency: UrgencyLevel = request
        .urgency_level
        .parse()
        .map_err(translate_domain_error)?;
    let record: AddressRecord = load_address(persistence, request.address_id)?;
    if record.address.customer_id != session.customer_id {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Address"),
            message: format!("Address {} does not exist", request.address_id),
        });
    }
    validate_address(&record.address.address).map_err(translate_domain_error)?;

    let options: Vec<ShippingOption> = config
        .rate_table
        .quote(&record.address.address, urgency, session.totals.subtotal)
        .map_err(translate_domain_error)?;

    let selected: Option<&ShippingOption> = session
        .selected_shipping_option_id
        .as_deref()
        .and_then(|id| options.iter().find(|option| option.id == id))
        .or_else(|| options.first());
    let shipping_cost: Decimal = selected.map_or(Decimal::ZERO, |option| option.cost);
    let totals: CheckoutTotals =
        calculate_totals(&session.items, shipping_cost, session.discount, &config.tax)
            .map_err(translate_domain_error)?;

    session.selected_shipping_option_id = selected.map(|option| option.id.clone());
    session.urgency_level = urgency;
    session.shipping_address_id = Some(record.address.address_id);
    session.shipping_options.clone_from(&options);
    session.totals = totals.clone();

    if session.status == SessionStatus::Validated {
        session.status = SessionStatus::Open;
        persistence.reopen_checkout_session(&session)?;
        info!(session_id, "Reopened validated session for new shipping quote");
    } else {
        persistence.update_checkout_session(&session)?;
    }

    debug!(
        session_id,
        address_id = request.address_id,
        urgency = urgency.as_str(),
        options = options.len(),
        "Calculated shipping"
    );

    Ok(CalculateShippingResponse {
        shipping_options: options,
        updated_totals: totals,
    })
}

/// A checked checkout, ready to become a bundle.
struct Accepted {
    address: SavedAddress,
    option: ShippingOption,
    totals: CheckoutTotals,
}

/// Runs the business checks of checkout validation.
///
/// Returns the rejection reason on failure.
fn check_checkout(
    persistence: &mut Persistence,
    config: &CheckoutConfig,
    session: &CheckoutSession,
    request: &ValidateCheckoutRequest,
) -> Result<Result<Accepted, String>, ApiError> {
    let Some(quoted_address_id) = session.shipping_address_id else {
        return Ok(Err(String::from("Shipping has not been calculated")));
    };

    let Some(record) = persistence.get_address(request.shipping_address_id)? else {
        return Ok(Err(format!(
            "Address {} does not exist",
            request.shipping_address_id
        )));
    };
    if record.address.customer_id != session.customer_id {
        return Ok(Err(format!(
            "Address {} does not exist",
            request.shipping_address_id
        )));
    }

    // The submitted address may be a replacement of the quoted one; it is
    // accepted while the parts that price shipping are unchanged.
    if quoted_address_id != record.address.address_id {
        let quoted: Option<AddressRecord> = persistence.get_address(quoted_address_id)?;
        let same_destination: bool = quoted.is_some_and(|quoted| {
            quoted.address.address.shipping_key() == record.address.address.shipping_key()
        });
        if !same_destination {
            return Ok(Err(String::from(
                "Shipping address differs from the address shipping was calculated for",
            )));
        }
    }

    let checks = || -> Result<Accepted, DomainError> {
        validate_cart_items(&session.items)?;
        validate_address(&record.address.address)?;
        let option: ShippingOption = session
            .quoted_option(&request.selected_shipping_option)?
            .clone();
        validate_shipping_option(&option)?;
        if let Some(phone) = &request.customer_phone {
            validate_phone(phone)?;
        }
        let totals: CheckoutTotals =
            calculate_totals(&session.items, option.cost, session.discount, &config.tax)?;
        require_eligible_method(
            &config.payment_methods,
            &request.payment_method,
            &record.address.address.country_code(),
            totals.estimated_total,
        )?;
        Ok(Accepted {
            address: record.address.clone(),
            option,
            totals,
        })
    };

    Ok(checks().map_err(|err| err.to_string()))
}

/// Validates a checkout and stores the bundle for the payment step.
///
/// Business rule failures are reported as `is_valid: false` with a reason;
/// the session is left unchanged so the customer can correct and resubmit.
/// On success the session becomes `VALIDATED` and a bundle is stored,
/// replacing any earlier one.
///
/// # Errors
///
/// Returns an error if the session does not exist, belongs to someone else
/// or is completed.
pub fn validate_checkout(
    persistence: &mut Persistence,
    config: &CheckoutConfig,
    actor: &AuthenticatedCustomer,
    session_id: &str,
    request: &ValidateCheckoutRequest,
) -> Result<ValidateCheckoutResponse, ApiError> {
    let mut session: CheckoutSession =
        load_session(persistence, actor, session_id, "validate_checkout")?;
    session.ensure_open().map_err(translate_domain_error)?;

    let accepted: Accepted = match check_checkout(persistence, config, &session, request)? {
        Ok(accepted) => accepted,
        Err(reason) => {
            warn!(session_id, reason = %reason, "Checkout validation rejected");
            return Ok(ValidateCheckoutResponse::rejected(reason));
        }
    };

    let bundle: CheckoutBundle = CheckoutBundle::assemble(
        session.session_id.clone(),
        accepted.address,
        &accepted.option.id,
        session.shipping_options.clone(),
        accepted.totals.clone(),
        session.urgency_level,
        session.customer_id,
        session.items.clone(),
    )
    .map_err(translate_domain_error)?;

    session.selected_shipping_option_id = Some(accepted.option.id);
    session.totals = accepted.totals;
    session.status = SessionStatus::Validated;
    persistence.store_validated_checkout(&session, &bundle)?;

    info!(
        session_id,
        total = %session.totals.estimated_total,
        "Checkout validated"
    );
    Ok(ValidateCheckoutResponse::valid())
}

/// Hands the validated checkout to the payment step.
///
/// A bundle can be consumed once; the session is completed.
///
/// # Errors
///
/// Returns an error if the session does not exist, belongs to someone else
/// or has no pending bundle.
pub fn consume_checkout_bundle(
    persistence: &mut Persistence,
    actor: &AuthenticatedCustomer,
    session_id: &str,
) -> Result<CheckoutBundle, ApiError> {
    load_session(persistence, actor, session_id, "consume_checkout_bundle")?;
    let bundle: CheckoutBundle = persistence.consume_bundle(session_id)?;
    Ok(bundle)
}

/// Lists the payment methods usable for a session, with fees.
///
/// Methods are filtered by the destination country of the session's
/// shipping quote and by the order total.
///
/// # Errors
///
/// Returns an error if the session does not exist, belongs to someone else
/// or has no shipping address yet.
pub fn list_payment_methods(
    persistence: &mut Persistence,
    config: &CheckoutConfig,
    actor: &AuthenticatedCustomer,
    session_id: &str,
) -> Result<PaymentMethodsResponse, ApiError> {
    let session: CheckoutSession =
        load_session(persistence, actor, session_id, "list_payment_methods")?;
    let address_id: i64 = session
        .shipping_address_id
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("shippingAddress"),
            message: String::from("Calculate shipping before choosing a payment method"),
        })?;
    let record: AddressRecord = load_address(persistence, address_id)?;

    let country: String = record.address.address.country_code();
    let order_total: Decimal = session.totals.estimated_total;
    let methods: Vec<PricedPaymentMethod> =
        eligible_payment_methods(&config.payment_methods, &country, order_total)
            .map_err(translate_domain_error)?;

    Ok(PaymentMethodsResponse {
        country,
        order_total,
        methods,
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use merch_checkout::{CheckoutFlowState, FlowEvent};
use merch_checkout_api::{
    AddressResponse, ApiError, AuthenticationService, CalculateShippingRequest,
    CalculateShippingResponse, CheckoutConfig, CheckoutFlowController, CreateAddressRequest,
    CreateCheckoutSessionRequest, ListAddressesResponse, ListCheckoutSessionsResponse,
    LocalCheckoutServices, LoginRequest, LoginResponse, PaymentMethodsResponse, ProfileResponse,
    RegisterCustomerRequest, RegisterCustomerResponse, ReplaceAddressRequest,
    ValidateCheckoutRequest, ValidateCheckoutResponse, calculate_shipping,
    consume_checkout_bundle, create_address, create_checkout_session, get_address,
    get_checkout_session, get_default_address, get_profile, list_addresses,
    list_checkout_sessions, list_payment_methods, login, logout, register_customer,
    replace_address, translate_domain_error, validate_checkout,
};
use merch_checkout_domain::{CheckoutBundle, CheckoutSession, SavedAddress, UrgencyLevel};
use merch_checkout_persistence::Persistence;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::session::{BearerToken, SessionCustomer};

/// Merch checkout server - HTTP API for checkout sessions, shipping and
/// the address book
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Sales tax rate in percent
    #[arg(long, default_value = "16")]
    tax_rate: Decimal,

    /// Lifetime of login sessions in hours
    #[arg(long, default_value_t = 24)]
    session_ttl_hours: i64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Rates, tax policy and payment catalog.
    config: Arc<CheckoutConfig>,
    /// Lifetime of new login sessions.
    session_ttl: Duration,
    /// Live event broadcaster.
    live: Arc<LiveEventBroadcaster>,
    /// Checkout flow controllers by checkout session id.
    flows: Arc<Mutex<HashMap<String, CheckoutFlowController>>>,
}

impl AppState {
    fn new(persistence: Persistence, config: CheckoutConfig, session_ttl: Duration) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            config: Arc::new(config),
            session_ttl,
            live: Arc::new(LiveEventBroadcaster::new()),
            flows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Customer actions accepted by the flow endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
enum FlowRequest {
    SelectAddress {
        address_id: i64,
    },
    ChangeUrgency {
        urgency_level: String,
    },
    SelectShippingOption {
        option_id: String,
    },
    RetryShipping,
    Submit {
        payment_method: String,
        #[serde(default)]
        customer_phone: Option<String>,
    },
    Reset,
}

/// Flow state after an action, with the transitions it caused.
#[derive(Debug, Clone, Serialize)]
struct FlowResponse {
    /// The flow state.
    state: CheckoutFlowState,
    /// Transitions recorded while handling the action.
    events: Vec<FlowEvent>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ShippingUnavailable {
                retryable: true, ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ShippingUnavailable {
                retryable: false, ..
            } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<Json<RegisterCustomerResponse>, HttpError> {
    info!(email = %req.email, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterCustomerResponse = register_customer(&mut persistence, &req)?;
    drop(persistence);

    info!(customer_id = response.customer_id, "Registered customer");
    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req, app_state.session_ttl)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/profile`.
async fn handle_profile(
    SessionCustomer(_, profile): SessionCustomer,
) -> Json<ProfileResponse> {
    Json(get_profile(&profile))
}

/// Handler for GET `/addresses`.
async fn handle_list_addresses(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
) -> Result<Json<ListAddressesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListAddressesResponse = list_addresses(&mut persistence, &customer)?;
    Ok(Json(response))
}

/// Handler for POST `/addresses`.
async fn handle_create_address(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Json(req): Json<CreateAddressRequest>,
) -> Result<Json<SavedAddress>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let saved: SavedAddress = create_address(&mut persistence, &customer, &req)?;
    drop(persistence);

    info!(
        customer_id = customer.customer_id,
        address_id = saved.address_id,
        "Created address"
    );
    Ok(Json(saved))
}

/// Handler for GET `/addresses/{address_id}`.
async fn handle_get_address(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(address_id): Path<i64>,
) -> Result<Json<AddressResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AddressResponse = get_address(&mut persistence, &customer, address_id)?;
    Ok(Json(response))
}

/// Handler for PUT `/addresses/{address_id}`.
///
/// Replaces the address; the response carries the new address id.
async fn handle_replace_address(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(address_id): Path<i64>,
    Json(req): Json<ReplaceAddressRequest>,
) -> Result<Json<SavedAddress>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let saved: SavedAddress = replace_address(&mut persistence, &customer, address_id, &req)?;
    drop(persistence);

    info!(
        replaced = address_id,
        address_id = saved.address_id,
        "Replaced address"
    );
    Ok(Json(saved))
}

/// Handler for GET `/addresses/default/{address_type}`.
async fn handle_default_address(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(address_type): Path<String>,
) -> Result<Json<SavedAddress>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let saved: SavedAddress = get_default_address(&mut persistence, &customer, &address_type)?;
    Ok(Json(saved))
}

/// Handler for POST `/checkout/sessions`.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Json(req): Json<CreateCheckoutSessionRequest>,
) -> Result<Json<CheckoutSession>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let session: CheckoutSession =
        create_checkout_session(&mut persistence, &app_state.config, &customer, &req)?;
    drop(persistence);

    info!(
        session_id = %session.session_id,
        customer_id = customer.customer_id,
        "Opened checkout session"
    );
    Ok(Json(session))
}

/// Handler for GET `/checkout/sessions`.
async fn handle_list_sessions(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
) -> Result<Json<ListCheckoutSessionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListCheckoutSessionsResponse =
        list_checkout_sessions(&mut persistence, &customer)?;
    Ok(Json(response))
}

/// Handler for GET `/checkout/sessions/{session_id}`.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutSession>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let session: CheckoutSession = get_checkout_session(&mut persistence, &customer, &session_id)?;
    Ok(Json(session))
}

/// Handler for POST `/checkout/sessions/{session_id}/shipping`.
async fn handle_calculate_shipping(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
    Json(req): Json<CalculateShippingRequest>,
) -> Result<Json<CalculateShippingResponse>, HttpError> {
    info!(
        session_id = %session_id,
        address_id = req.address_id,
        urgency = %req.urgency_level,
        "Handling calculate_shipping request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: Result<CalculateShippingResponse, ApiError> = calculate_shipping(
        &mut persistence,
        &app_state.config,
        &customer,
        &session_id,
        &req,
    );
    drop(persistence);

    match &result {
        Ok(response) => app_state.live.broadcast(&LiveEvent::ShippingCalculated {
            session_id: session_id.clone(),
            option_count: response.shipping_options.len(),
        }),
        Err(ApiError::ShippingUnavailable { message, retryable }) => {
            app_state.live.broadcast(&LiveEvent::ShippingFailed {
                session_id: session_id.clone(),
                message: message.clone(),
                retryable: *retryable,
            });
        }
        Err(_) => {}
    }

    Ok(Json(result?))
}

/// Handler for POST `/checkout/sessions/{session_id}/validate`.
///
/// Business rejections come back as `200` with `isValid: false`.
async fn handle_validate_checkout(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
    Json(req): Json<ValidateCheckoutRequest>,
) -> Result<Json<ValidateCheckoutResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ValidateCheckoutResponse = validate_checkout(
        &mut persistence,
        &app_state.config,
        &customer,
        &session_id,
        &req,
    )?;
    drop(persistence);

    if response.is_valid {
        app_state
            .live
            .broadcast(&LiveEvent::CheckoutValidated { session_id });
    }
    Ok(Json(response))
}

/// Handler for POST `/checkout/sessions/{session_id}/bundle/consume`.
async fn handle_consume_bundle(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutBundle>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bundle: CheckoutBundle = consume_checkout_bundle(&mut persistence, &customer, &session_id)?;
    drop(persistence);

    app_state.flows.lock().await.remove(&session_id);
    info!(session_id = %session_id, "Checkout bundle consumed");
    app_state
        .live
        .broadcast(&LiveEvent::BundleConsumed { session_id });
    Ok(Json(bundle))
}

/// Handler for GET `/checkout/sessions/{session_id}/payment-methods`.
async fn handle_payment_methods(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
) -> Result<Json<PaymentMethodsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PaymentMethodsResponse =
        list_payment_methods(&mut persistence, &app_state.config, &customer, &session_id)?;
    Ok(Json(response))
}

/// Handler for GET `/checkout/sessions/{session_id}/flow`.
async fn handle_get_flow(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutFlowState>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let session: CheckoutSession = get_checkout_session(&mut persistence, &customer, &session_id)?;
    drop(persistence);

    let flows = app_state.flows.lock().await;
    let state: CheckoutFlowState = flows.get(&session_id).map_or_else(
        || CheckoutFlowController::for_session(&session, customer.to_flow_actor()).state().clone(),
        |controller| controller.state().clone(),
    );
    Ok(Json(state))
}

/// Handler for POST `/checkout/sessions/{session_id}/flow`.
///
/// Drives the session's checkout flow controller with one customer action.
async fn handle_flow_action(
    AxumState(app_state): AxumState<AppState>,
    SessionCustomer(customer, _): SessionCustomer,
    Path(session_id): Path<String>,
    Json(req): Json<FlowRequest>,
) -> Result<Json<FlowResponse>, HttpError> {
    info!(session_id = %session_id, action = ?req, "Handling flow action");

    let mut persistence = app_state.persistence.lock().await;
    let session: CheckoutSession = get_checkout_session(&mut persistence, &customer, &session_id)?;

    let mut flows = app_state.flows.lock().await;
    let controller: &mut CheckoutFlowController = flows
        .entry(session_id.clone())
        .or_insert_with(|| CheckoutFlowController::for_session(&session, customer.to_flow_actor()));

    let mut services: LocalCheckoutServices<'_> =
        LocalCheckoutServices::new(&mut persistence, &app_state.config, &customer);
    let outcome: Result<(), ApiError> = match req {
        FlowRequest::SelectAddress { address_id } => {
            controller.select_address(&mut services, address_id)
        }
        FlowRequest::ChangeUrgency { urgency_level } => {
            match urgency_level.parse::<UrgencyLevel>() {
                Ok(level) => controller.change_urgency(&mut services, level),
                Err(err) => Err(translate_domain_error(err)),
            }
        }
        FlowRequest::SelectShippingOption { option_id } => {
            controller.select_shipping_option(&mut services, &option_id)
        }
        FlowRequest::RetryShipping => controller.retry_shipping(&mut services),
        FlowRequest::Submit {
            payment_method,
            customer_phone,
        } => controller.submit(&mut services, &payment_method, customer_phone),
        FlowRequest::Reset => controller.reset(&mut services),
    };

    let events: Vec<FlowEvent> = controller.drain_events();
    let state: CheckoutFlowState = controller.state().clone();
    drop(flows);
    drop(persistence);

    for event in LiveEvent::from_flow_events(&events, &state) {
        app_state.live.broadcast(&event);
    }
    outcome?;

    Ok(Json(FlowResponse { state, events }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/profile", get(handle_profile))
        .route(
            "/addresses",
            get(handle_list_addresses).post(handle_create_address),
        )
        .route(
            "/addresses/{address_id}",
            get(handle_get_address).put(handle_replace_address),
        )
        .route(
            "/addresses/default/{address_type}",
            get(handle_default_address),
        )
        .route(
            "/checkout/sessions",
            get(handle_list_sessions).post(handle_create_session),
        )
        .route("/checkout/sessions/{session_id}", get(handle_get_session))
        .route(
            "/checkout/sessions/{session_id}/shipping",
            post(handle_calculate_shipping),
        )
        .route(
            "/checkout/sessions/{session_id}/validate",
            post(handle_validate_checkout),
        )
        .route(
            "/checkout/sessions/{session_id}/bundle/consume",
            post(handle_consume_bundle),
        )
        .route(
            "/checkout/sessions/{session_id}/payment-methods",
            get(handle_payment_methods),
        )
        .route(
            "/checkout/sessions/{session_id}/flow",
            get(handle_get_flow).post(handle_flow_action),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing merch checkout server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let expired: usize = persistence.delete_expired_sessions()?;
    if expired > 0 {
        info!(expired, "Removed expired login sessions");
    }

    let config: CheckoutConfig = CheckoutConfig::with_tax_rate(args.tax_rate);
    let session_ttl: Duration = if args.session_ttl_hours > 0 {
        Duration::hours(args.session_ttl_hours)
    } else {
        AuthenticationService::DEFAULT_SESSION_TTL
    };
    info!(
        tax_rate = %args.tax_rate,
        session_ttl_hours = session_ttl.whole_hours(),
        "Checkout configuration loaded"
    );

    let app: Router = build_router(AppState::new(persistence, config, session_ttl));

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Contract Routes - Rental contracts and the rent roll

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use waqf::domain::{NewContract, NewRentalPayment};
use waqf::{Contract, Permission, RentalPayment};

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{ContractQuery, DueQuery, PaymentQuery};
use crate::AppState;

/// Days ahead used when `days` is not given
const DEFAULT_DUE_DAYS: i64 = 7;

/// List contracts
#[utoipa::path(
    get,
    path = "/waqf/contracts",
    params(ContractQuery),
    responses((status = 200, description = "Contracts", body = Vec<Contract>)),
    tag = "Contracts"
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ContractQuery>,
) -> Result<Json<Vec<Contract>>, ApiError> {
    user.require(Permission::ViewProperties)?;
    Ok(Json(state.rental_service.list_contracts(query.property_id).await?))
}

/// Sign a contract; the property is marked rented
#[utoipa::path(
    post,
    path = "/waqf/contracts",
    request_body = NewContract,
    responses(
        (status = 200, description = "Contract created", body = Contract),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Contracts"
)]
pub async fn create_contract(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewContract>,
) -> Result<Json<Contract>, ApiError> {
    user.require(Permission::ManageProperties)?;
    Ok(Json(state.rental_service.create_contract(payload).await?))
}

/// Get a contract
#[utoipa::path(
    get,
    path = "/waqf/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract", body = Contract),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Contracts"
)]
pub async fn get_contract(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, ApiError> {
    user.require(Permission::ViewProperties)?;
    Ok(Json(state.rental_service.get_contract(id).await?))
}

/// Terminate an active contract
#[utoipa::path(
    post,
    path = "/waqf/contracts/{id}/terminate",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract terminated", body = Contract),
        (status = 409, description = "Contract is not active", body = ErrorResponse)
    ),
    tag = "Contracts"
)]
pub async fn terminate_contract(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, ApiError> {
    user.require(Permission::ManageProperties)?;
    Ok(Json(
        state.rental_service.terminate_contract(id, user.actor()).await?,
    ))
}

/// Generate the installment schedule of a contract
#[utoipa::path(
    post,
    path = "/waqf/contracts/{id}/schedule",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Installments created", body = Vec<RentalPayment>),
        (status = 409, description = "Schedule already exists", body = ErrorResponse)
    ),
    tag = "Contracts"
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RentalPayment>>, ApiError> {
    user.require(Permission::ManageProperties)?;
    Ok(Json(state.rental_service.generate_schedule(id).await?))
}

/// Record a single payment against a contract
#[utoipa::path(
    post,
    path = "/waqf/contracts/{id}/payments",
    params(("id" = Uuid, Path, description = "Contract ID")),
    request_body = NewRentalPayment,
    responses((status = 200, description = "Payment recorded", body = RentalPayment)),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewRentalPayment>,
) -> Result<Json<RentalPayment>, ApiError> {
    user.require(Permission::RecordPayments)?;
    Ok(Json(state.rental_service.record_payment(id, payload).await?))
}

/// List rental payments
#[utoipa::path(
    get,
    path = "/waqf/payments",
    params(PaymentQuery),
    responses((status = 200, description = "Payments", body = Vec<RentalPayment>)),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Vec<RentalPayment>>, ApiError> {
    user.require(Permission::RecordPayments)?;
    Ok(Json(state.rental_service.list_payments(query.contract_id).await?))
}

/// Outstanding payments due soon
#[utoipa::path(
    get,
    path = "/waqf/payments/due",
    params(DueQuery),
    responses((status = 200, description = "Payments due", body = Vec<RentalPayment>)),
    tag = "Payments"
)]
pub async fn payments_due(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<RentalPayment>>, ApiError> {
    user.require(Permission::RecordPayments)?;
    let days = query.days.unwrap_or(DEFAULT_DUE_DAYS).max(0);
    let today = Utc::now().date_naive();
    Ok(Json(state.rental_service.due_within(today, days).await?))
}

/// Mark a payment collected
#[utoipa::path(
    post,
    path = "/waqf/payments/{id}/collect",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment collected", body = RentalPayment),
        (status = 409, description = "Payment is not outstanding", body = ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn collect_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RentalPayment>, ApiError> {
    user.require(Permission::RecordPayments)?;
    Ok(Json(
        state.rental_service.collect_payment(id, user.actor()).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/contracts", get(list_contracts).post(create_contract))
        .route("/waqf/contracts/:id", get(get_contract))
        .route("/waqf/contracts/:id/terminate", post(terminate_contract))
        .route("/waqf/contracts/:id/schedule", post(generate_schedule))
        .route("/waqf/contracts/:id/payments", post(record_payment))
        .route("/waqf/payments", get(list_payments))
        .route("/waqf/payments/due", get(payments_due))
        .route("/waqf/payments/:id/collect", post(collect_payment))
}

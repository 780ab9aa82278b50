//! Treasury Routes - Funds and beneficiary loans

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{Fund, Loan, NewFund, NewLoan};
use waqf::Permission;

use super::ensure_own_or;
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{LoanQuery, RepayLoanRequest};
use crate::AppState;

/// List funds
#[utoipa::path(
    get,
    path = "/waqf/funds",
    responses((status = 200, description = "Funds", body = Vec<Fund>)),
    tag = "Treasury"
)]
pub async fn list_funds(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Fund>>, ApiError> {
    user.require(Permission::ManageTreasury)?;
    Ok(Json(state.treasury_service.funds().await?))
}

/// Create a fund
#[utoipa::path(
    post,
    path = "/waqf/funds",
    request_body = NewFund,
    responses((status = 200, description = "Fund created", body = Fund)),
    tag = "Treasury"
)]
pub async fn create_fund(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewFund>,
) -> Result<Json<Fund>, ApiError> {
    user.require(Permission::ManageTreasury)?;
    Ok(Json(state.treasury_service.create_fund(payload).await?))
}

/// List loans; beneficiaries see only their own
#[utoipa::path(
    get,
    path = "/waqf/loans",
    params(LoanQuery),
    responses((status = 200, description = "Loans", body = Vec<Loan>)),
    tag = "Treasury"
)]
pub async fn list_loans(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LoanQuery>,
) -> Result<Json<Vec<Loan>>, ApiError> {
    let beneficiary_id = match query.beneficiary_id {
        Some(id) => {
            ensure_own_or(&state, &user, id, Permission::ManageTreasury).await?;
            Some(id)
        }
        None if user.can(Permission::ManageTreasury) => None,
        None => Some(
            state
                .beneficiary_service
                .for_user(user.id)
                .await?
                .ok_or_else(|| {
                    ApiError::Forbidden("no beneficiary profile is linked to this user".to_string())
                })?
                .id,
        ),
    };
    Ok(Json(state.treasury_service.loans(beneficiary_id).await?))
}

/// Grant a loan to an active beneficiary
#[utoipa::path(
    post,
    path = "/waqf/loans",
    request_body = NewLoan,
    responses(
        (status = 200, description = "Loan granted", body = Loan),
        (status = 409, description = "Beneficiary is not active", body = ErrorResponse)
    ),
    tag = "Treasury"
)]
pub async fn grant_loan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewLoan>,
) -> Result<Json<Loan>, ApiError> {
    user.require(Permission::ManageTreasury)?;
    Ok(Json(
        state.treasury_service.grant_loan(payload, user.actor()).await?,
    ))
}

/// Get a loan
#[utoipa::path(
    get,
    path = "/waqf/loans/{id}",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan", body = Loan),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Treasury"
)]
pub async fn get_loan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Loan>, ApiError> {
    let loan = state.treasury_service.loan(id).await?;
    ensure_own_or(&state, &user, loan.beneficiary_id, Permission::ManageTreasury).await?;
    Ok(Json(loan))
}

/// Record a repayment
#[utoipa::path(
    post,
    path = "/waqf/loans/{id}/repay",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body = RepayLoanRequest,
    responses(
        (status = 200, description = "Repayment recorded", body = Loan),
        (status = 400, description = "Amount exceeds outstanding balance", body = ErrorResponse)
    ),
    tag = "Treasury"
)]
pub async fn repay_loan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RepayLoanRequest>,
) -> Result<Json<Loan>, ApiError> {
    user.require(Permission::ManageTreasury)?;
    Ok(Json(
        state
            .treasury_service
            .repay_loan(id, payload.amount, user.actor())
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/funds", get(list_funds).post(create_fund))
        .route("/waqf/loans", get(list_loans).post(grant_loan))
        .route("/waqf/loans/:id", get(get_loan))
        .route("/waqf/loans/:id/repay", post(repay_loan))
}

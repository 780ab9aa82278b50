//! Ledger Routes - Chart of accounts, journal and financial reports

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::services::accounting::{BalanceSheet, IncomeStatement, LedgerRow, TrialBalance};
use waqf::domain::{Account, NewAccount, NewJournalEntry};
use waqf::{JournalEntry, Permission};

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{JournalQuery, PeriodQuery};
use crate::AppState;

/// Chart of accounts ordered by code
#[utoipa::path(
    get,
    path = "/waqf/accounts",
    responses((status = 200, description = "Accounts", body = Vec<Account>)),
    tag = "Accounting"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.ledger_service.accounts().await?))
}

/// Add an account
#[utoipa::path(
    post,
    path = "/waqf/accounts",
    request_body = NewAccount,
    responses(
        (status = 200, description = "Account created", body = Account),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewAccount>,
) -> Result<Json<Account>, ApiError> {
    user.require(Permission::ManageAccounting)?;
    Ok(Json(state.ledger_service.create_account(payload).await?))
}

/// Posted movements of one account with a running balance
#[utoipa::path(
    get,
    path = "/waqf/accounts/{id}/ledger",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses((status = 200, description = "Ledger rows", body = Vec<LedgerRow>)),
    tag = "Accounting"
)]
pub async fn account_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LedgerRow>>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.ledger_service.account_ledger(id).await?))
}

/// List journal entries
#[utoipa::path(
    get,
    path = "/waqf/journal",
    params(JournalQuery),
    responses((status = 200, description = "Journal entries", body = Vec<JournalEntry>)),
    tag = "Accounting"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<JournalQuery>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.ledger_service.entries(query.status).await?))
}

/// Create a draft entry
#[utoipa::path(
    post,
    path = "/waqf/journal",
    request_body = NewJournalEntry,
    responses(
        (status = 200, description = "Draft created", body = JournalEntry),
        (status = 400, description = "Malformed lines", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn create_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewJournalEntry>,
) -> Result<Json<JournalEntry>, ApiError> {
    user.require(Permission::ManageAccounting)?;
    Ok(Json(
        state.ledger_service.create_entry(payload, user.actor()).await?,
    ))
}

/// Get a journal entry
#[utoipa::path(
    get,
    path = "/waqf/journal/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Journal entry", body = JournalEntry),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.ledger_service.entry(id).await?))
}

/// Delete a draft entry
#[utoipa::path(
    delete,
    path = "/waqf/journal/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 409, description = "Entry is not a draft", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require(Permission::ManageAccounting)?;
    state.ledger_service.delete_entry(id, user.actor()).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Post a balanced draft
#[utoipa::path(
    post,
    path = "/waqf/journal/{id}/post",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry posted", body = JournalEntry),
        (status = 400, description = "Entry does not balance", body = ErrorResponse),
        (status = 409, description = "Entry is not a draft", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn post_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, ApiError> {
    user.require(Permission::ManageAccounting)?;
    Ok(Json(state.ledger_service.post_entry(id, user.actor()).await?))
}

/// Cancel a posted entry
#[utoipa::path(
    post,
    path = "/waqf/journal/{id}/cancel",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry cancelled", body = JournalEntry),
        (status = 409, description = "Entry is not posted", body = ErrorResponse)
    ),
    tag = "Accounting"
)]
pub async fn cancel_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, ApiError> {
    user.require(Permission::ManageAccounting)?;
    Ok(Json(
        state.ledger_service.cancel_entry(id, user.actor()).await?,
    ))
}

/// Trial balance over posted lines
#[utoipa::path(
    get,
    path = "/waqf/reports/trial-balance",
    params(PeriodQuery),
    responses((status = 200, description = "Trial balance", body = TrialBalance)),
    tag = "Accounting"
)]
pub async fn trial_balance(
    State(state): State<AppState>,
    user: AuthUser,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<TrialBalance>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(
        state.ledger_service.trial_balance(period.from, period.to).await?,
    ))
}

/// Income statement for a period
#[utoipa::path(
    get,
    path = "/waqf/reports/income-statement",
    params(PeriodQuery),
    responses((status = 200, description = "Income statement", body = IncomeStatement)),
    tag = "Accounting"
)]
pub async fn income_statement(
    State(state): State<AppState>,
    user: AuthUser,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<IncomeStatement>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(
        state.ledger_service.income_statement(period.from, period.to).await?,
    ))
}

/// Balance sheet as of `to`
#[utoipa::path(
    get,
    path = "/waqf/reports/balance-sheet",
    params(PeriodQuery),
    responses((status = 200, description = "Balance sheet", body = BalanceSheet)),
    tag = "Accounting"
)]
pub async fn balance_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<BalanceSheet>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.ledger_service.balance_sheet(period.to).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/accounts", get(list_accounts).post(create_account))
        .route("/waqf/accounts/:id/ledger", get(account_ledger))
        .route("/waqf/journal", get(list_entries).post(create_entry))
        .route("/waqf/journal/:id", get(get_entry).delete(delete_entry))
        .route("/waqf/journal/:id/post", post(post_entry))
        .route("/waqf/journal/:id/cancel", post(cancel_entry))
        .route("/waqf/reports/trial-balance", get(trial_balance))
        .route("/waqf/reports/income-statement", get(income_statement))
        .route("/waqf/reports/balance-sheet", get(balance_sheet))
}

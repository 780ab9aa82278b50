//! Dashboard Routes - One view per role
//!
//! Every view starts from the cached KPI snapshot and adds the reads its
//! role needs.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;

use waqf::domain::{DecisionStatus, JournalStatus};
use waqf::{KpiSnapshot, Permission};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{
    ArchiveSection, BeneficiarySection, CategoryCount, CollectionsSection, DashboardResponse,
    DashboardSection, FinancialSection, OversightSection, SystemStatus,
};
use crate::AppState;

/// Days ahead shown to cashiers
const CASHIER_DUE_DAYS: i64 = 7;

/// Dashboard for the caller's role
#[utoipa::path(
    get,
    path = "/waqf/dashboard",
    responses(
        (status = 200, description = "Role dashboard", body = DashboardResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let sections = DashboardSection::for_role(user.role);
    let snapshot = match sections.iter().any(|s| s.needs_kpis()) {
        true => state.kpi_service.snapshot().await,
        false => KpiSnapshot::empty(Utc::now()),
    };
    let mut dashboard = DashboardResponse::empty(user.role);

    for section in sections {
        match section {
            DashboardSection::Kpis => dashboard.kpis = Some(snapshot.clone()),
            DashboardSection::System => {
                dashboard.system = Some(SystemStatus {
                    error_log_size: state.error_log.len(),
                    cache_entries: state.cache.len(),
                });
            }
            DashboardSection::Oversight => {
                let open = state
                    .governance_service
                    .list(Some(DecisionStatus::Open))
                    .await?;
                dashboard.oversight = Some(OversightSection {
                    pending_requests: snapshot.requests.pending_requests,
                    open_decisions: open.len(),
                    distributions_awaiting_approval: snapshot
                        .distributions
                        .distributions_awaiting_approval,
                });
            }
            DashboardSection::Financial => {
                let drafts = state
                    .ledger_service
                    .entries(Some(JournalStatus::Draft))
                    .await?;
                let trial_balance = state.ledger_service.trial_balance(None, None).await?;
                dashboard.financial = Some(FinancialSection {
                    income: snapshot.income.clone(),
                    funds: snapshot.funds.clone(),
                    draft_entries: drafts.len(),
                    trial_balance_balanced: trial_balance.is_balanced,
                });
            }
            DashboardSection::Collections => {
                let due_soon = state
                    .rental_service
                    .due_within(Utc::now().date_naive(), CASHIER_DUE_DAYS)
                    .await?;
                dashboard.collections = Some(CollectionsSection {
                    collections: snapshot.collections.clone(),
                    due_soon,
                });
            }
            DashboardSection::Archive => {
                let totals = state.archive_service.totals().await?;
                dashboard.archive = Some(ArchiveSection {
                    total_documents: totals.iter().map(|(_, n)| n).sum(),
                    by_category: totals
                        .into_iter()
                        .map(|(category, count)| CategoryCount { category, count })
                        .collect(),
                });
            }
            DashboardSection::Beneficiary => {
                dashboard.beneficiary = Some(beneficiary_section(&state, &user).await?);
            }
        }
    }

    Ok(Json(dashboard))
}

async fn beneficiary_section(
    state: &AppState,
    user: &AuthUser,
) -> Result<BeneficiarySection, ApiError> {
    let Some(profile) = state.beneficiary_service.for_user(user.id).await? else {
        return Ok(BeneficiarySection {
            profile: None,
            requests: Vec::new(),
            loans: Vec::new(),
            shares_total: Decimal::ZERO,
        });
    };

    let requests = state.request_service.list(user, None).await?;
    let loans = state.treasury_service.loans(Some(profile.id)).await?;
    let shares_total = state
        .distribution_service
        .shares_for_beneficiary(profile.id)
        .await?
        .iter()
        .map(|s| s.amount)
        .sum();

    Ok(BeneficiarySection {
        profile: Some(profile),
        requests,
        loans,
        shares_total,
    })
}

/// Unified KPI snapshot
#[utoipa::path(
    get,
    path = "/waqf/kpis",
    responses(
        (status = 200, description = "KPI snapshot", body = KpiSnapshot),
        (status = 403, description = "Forbidden")
    ),
    tag = "Dashboard"
)]
pub async fn get_kpis(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<KpiSnapshot>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.kpi_service.snapshot().await))
}

/// Drop the cached snapshot and recompute it
#[utoipa::path(
    post,
    path = "/waqf/kpis/refresh",
    responses((status = 200, description = "Fresh KPI snapshot", body = KpiSnapshot)),
    tag = "Dashboard"
)]
pub async fn refresh_kpis(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<KpiSnapshot>, ApiError> {
    user.require(Permission::ViewAccounting)?;
    Ok(Json(state.kpi_service.refresh().await))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/dashboard", get(get_dashboard))
        .route("/waqf/kpis", get(get_kpis))
        .route("/waqf/kpis/refresh", post(refresh_kpis))
}

//! Distribution Routes - Heir distributions and their settings

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::services::distribution::SplitPreview;
use waqf::domain::{DistributionSettingsUpdate, DistributionShare, NewDistribution};
use waqf::{DistributionSettings, Permission};

use super::ensure_own_or;
use crate::application::DistributionDetail;
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    ActionRequest, DistributionDetailResponse, DistributionResponse, PreviewRequest,
};
use crate::AppState;

fn require_view(user: &AuthUser) -> Result<(), ApiError> {
    if user.can(Permission::ManageDistributions)
        || user.can(Permission::ViewAccounting)
        || user.can(Permission::CompleteDisbursements)
    {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "role {} cannot view distributions",
            user.role
        )))
    }
}

fn detail_response(detail: DistributionDetail, user: &AuthUser) -> DistributionDetailResponse {
    DistributionDetailResponse {
        distribution: DistributionResponse::for_role(detail.distribution, user.role),
        shares: detail.shares,
    }
}

/// Current distribution settings
#[utoipa::path(
    get,
    path = "/waqf/distributions/settings",
    responses((status = 200, description = "Settings", body = DistributionSettings)),
    tag = "Distributions"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DistributionSettings>, ApiError> {
    require_view(&user)?;
    Ok(Json(state.distribution_service.settings().await?))
}

/// Edit distribution settings; shares are stored as given
#[utoipa::path(
    put,
    path = "/waqf/distributions/settings",
    request_body = DistributionSettingsUpdate,
    responses((status = 200, description = "Settings saved", body = DistributionSettings)),
    tag = "Distributions"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DistributionSettingsUpdate>,
) -> Result<Json<DistributionSettings>, ApiError> {
    user.require(Permission::ManageDistributions)?;
    Ok(Json(
        state
            .distribution_service
            .update_settings(payload, user.actor())
            .await?,
    ))
}

/// Show what each configured share amounts to for a total
#[utoipa::path(
    post,
    path = "/waqf/distributions/preview",
    request_body = PreviewRequest,
    responses((status = 200, description = "Split preview", body = SplitPreview)),
    tag = "Distributions"
)]
pub async fn preview(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<SplitPreview>, ApiError> {
    require_view(&user)?;
    Ok(Json(state.distribution_service.preview(payload.total).await?))
}

/// List distributions
#[utoipa::path(
    get,
    path = "/waqf/distributions",
    responses((status = 200, description = "Distributions", body = Vec<DistributionResponse>)),
    tag = "Distributions"
)]
pub async fn list_distributions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<DistributionResponse>>, ApiError> {
    require_view(&user)?;
    let distributions = state.distribution_service.list().await?;
    Ok(Json(
        distributions
            .into_iter()
            .map(|d| DistributionResponse::for_role(d, user.role))
            .collect(),
    ))
}

/// Allocate a new distribution across active beneficiaries
#[utoipa::path(
    post,
    path = "/waqf/distributions",
    request_body = NewDistribution,
    responses(
        (status = 200, description = "Distribution allocated", body = DistributionDetailResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Distributions"
)]
pub async fn create_distribution(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewDistribution>,
) -> Result<Json<DistributionDetailResponse>, ApiError> {
    user.require(Permission::ManageDistributions)?;
    let detail = state
        .distribution_service
        .create(payload, user.actor())
        .await?;
    Ok(Json(detail_response(detail, &user)))
}

/// Get a distribution with its shares
#[utoipa::path(
    get,
    path = "/waqf/distributions/{id}",
    params(("id" = Uuid, Path, description = "Distribution ID")),
    responses(
        (status = 200, description = "Distribution", body = DistributionDetailResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Distributions"
)]
pub async fn get_distribution(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DistributionDetailResponse>, ApiError> {
    require_view(&user)?;
    let detail = state.distribution_service.detail(id).await?;
    Ok(Json(detail_response(detail, &user)))
}

/// Move a distribution through the approval workflow
#[utoipa::path(
    post,
    path = "/waqf/distributions/{id}/actions",
    params(("id" = Uuid, Path, description = "Distribution ID")),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Action applied", body = DistributionResponse),
        (status = 403, description = "Role may not take this action", body = ErrorResponse),
        (status = 409, description = "Action not valid from the current status", body = ErrorResponse)
    ),
    tag = "Distributions"
)]
pub async fn act_on_distribution(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let saved = state
        .distribution_service
        .act(id, payload.action, &user)
        .await?;
    Ok(Json(DistributionResponse::for_role(saved, user.role)))
}

/// Distribution shares of one beneficiary
#[utoipa::path(
    get,
    path = "/waqf/beneficiaries/{id}/shares",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses((status = 200, description = "Shares", body = Vec<DistributionShare>)),
    tag = "Distributions"
)]
pub async fn beneficiary_shares(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DistributionShare>>, ApiError> {
    ensure_own_or(&state, &user, id, Permission::ManageDistributions).await?;
    Ok(Json(
        state.distribution_service.shares_for_beneficiary(id).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/waqf/distributions",
            get(list_distributions).post(create_distribution),
        )
        .route(
            "/waqf/distributions/settings",
            get(get_settings).put(update_settings),
        )
        .route("/waqf/distributions/preview", post(preview))
        .route("/waqf/distributions/:id", get(get_distribution))
        .route("/waqf/distributions/:id/actions", post(act_on_distribution))
        .route("/waqf/beneficiaries/:id/shares", get(beneficiary_shares))
}

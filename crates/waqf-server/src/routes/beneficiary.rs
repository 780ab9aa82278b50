//! Beneficiary Routes - Registry of people entitled to waqf income

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{BeneficiaryUpdate, NewBeneficiary};
use waqf::{Beneficiary, Permission};

use super::ensure_own_or;
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::BeneficiaryQuery;
use crate::AppState;

/// List beneficiaries
#[utoipa::path(
    get,
    path = "/waqf/beneficiaries",
    params(BeneficiaryQuery),
    responses(
        (status = 200, description = "Beneficiaries", body = Vec<Beneficiary>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn list_beneficiaries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BeneficiaryQuery>,
) -> Result<Json<Vec<Beneficiary>>, ApiError> {
    user.require(Permission::ViewAllBeneficiaries)?;
    Ok(Json(state.beneficiary_service.list(query.status).await?))
}

/// Register a beneficiary
#[utoipa::path(
    post,
    path = "/waqf/beneficiaries",
    request_body = NewBeneficiary,
    responses(
        (status = 200, description = "Beneficiary registered", body = Beneficiary),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn create_beneficiary(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewBeneficiary>,
) -> Result<Json<Beneficiary>, ApiError> {
    user.require(Permission::ManageBeneficiaries)?;
    let saved = state
        .beneficiary_service
        .create(payload, user.actor())
        .await?;
    Ok(Json(saved))
}

/// Profile linked to the caller
#[utoipa::path(
    get,
    path = "/waqf/beneficiaries/me",
    responses(
        (status = 200, description = "Own profile", body = Beneficiary),
        (status = 404, description = "No profile linked", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn get_own_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Beneficiary>, ApiError> {
    state
        .beneficiary_service
        .for_user(user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no beneficiary profile is linked to this user"))
}

/// Get a beneficiary
#[utoipa::path(
    get,
    path = "/waqf/beneficiaries/{id}",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 200, description = "Beneficiary", body = Beneficiary),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn get_beneficiary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Beneficiary>, ApiError> {
    ensure_own_or(&state, &user, id, Permission::ViewAllBeneficiaries).await?;
    Ok(Json(state.beneficiary_service.get(id).await?))
}

/// Update a beneficiary
#[utoipa::path(
    put,
    path = "/waqf/beneficiaries/{id}",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    request_body = BeneficiaryUpdate,
    responses(
        (status = 200, description = "Beneficiary updated", body = Beneficiary),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn update_beneficiary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BeneficiaryUpdate>,
) -> Result<Json<Beneficiary>, ApiError> {
    user.require(Permission::ManageBeneficiaries)?;
    let saved = state
        .beneficiary_service
        .update(id, payload, user.actor())
        .await?;
    Ok(Json(saved))
}

/// Delete a beneficiary
#[utoipa::path(
    delete,
    path = "/waqf/beneficiaries/{id}",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 200, description = "Beneficiary deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Beneficiaries"
)]
pub async fn delete_beneficiary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require(Permission::ManageBeneficiaries)?;
    if !state.beneficiary_service.delete(id, user.actor()).await? {
        return Err(ApiError::not_found("Beneficiary not found"));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/waqf/beneficiaries",
            get(list_beneficiaries).post(create_beneficiary),
        )
        .route("/waqf/beneficiaries/me", get(get_own_profile))
        .route(
            "/waqf/beneficiaries/:id",
            get(get_beneficiary)
                .put(update_beneficiary)
                .delete(delete_beneficiary),
        )
}

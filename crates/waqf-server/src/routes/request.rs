//! Request Routes - Requests raised by beneficiaries

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::NewBeneficiaryRequest;

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{ActionRequest, ApprovalQuery, RequestResponse};
use crate::AppState;

/// List requests; beneficiaries see their own
#[utoipa::path(
    get,
    path = "/waqf/requests",
    params(ApprovalQuery),
    responses((status = 200, description = "Requests", body = Vec<RequestResponse>)),
    tag = "Requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ApprovalQuery>,
) -> Result<Json<Vec<RequestResponse>>, ApiError> {
    let requests = state.request_service.list(&user, query.status).await?;
    Ok(Json(
        requests
            .into_iter()
            .map(|r| RequestResponse::for_role(r, user.role))
            .collect(),
    ))
}

/// Raise a request
#[utoipa::path(
    post,
    path = "/waqf/requests",
    request_body = NewBeneficiaryRequest,
    responses(
        (status = 200, description = "Request created", body = RequestResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewBeneficiaryRequest>,
) -> Result<Json<RequestResponse>, ApiError> {
    let saved = state.request_service.create(payload, &user).await?;
    Ok(Json(RequestResponse::for_role(saved, user.role)))
}

/// Get a request
#[utoipa::path(
    get,
    path = "/waqf/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = RequestResponse),
        (status = 403, description = "Request belongs to another beneficiary", body = ErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestResponse>, ApiError> {
    let request = state.request_service.get(id, &user).await?;
    Ok(Json(RequestResponse::for_role(request, user.role)))
}

/// Move a request through the approval workflow
#[utoipa::path(
    post,
    path = "/waqf/requests/{id}/actions",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Action applied", body = RequestResponse),
        (status = 403, description = "Role may not take this action", body = ErrorResponse),
        (status = 409, description = "Action not valid from the current status", body = ErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn act_on_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<RequestResponse>, ApiError> {
    let saved = state
        .request_service
        .act(id, payload.action, payload.note, &user)
        .await?;
    Ok(Json(RequestResponse::for_role(saved, user.role)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/requests", get(list_requests).post(create_request))
        .route("/waqf/requests/:id", get(get_request))
        .route("/waqf/requests/:id/actions", post(act_on_request))
}

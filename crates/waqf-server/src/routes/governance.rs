//! Governance Routes - Board decisions and voting

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{BoardDecision, NewBoardDecision};
use waqf::Permission;

use crate::application::DecisionDetail;
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{DecisionQuery, VoteRequest};
use crate::AppState;

/// List board decisions
#[utoipa::path(
    get,
    path = "/waqf/decisions",
    params(DecisionQuery),
    responses((status = 200, description = "Decisions", body = Vec<BoardDecision>)),
    tag = "Governance"
)]
pub async fn list_decisions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DecisionQuery>,
) -> Result<Json<Vec<BoardDecision>>, ApiError> {
    user.require(Permission::Govern)?;
    Ok(Json(state.governance_service.list(query.status).await?))
}

/// Open a decision for voting
#[utoipa::path(
    post,
    path = "/waqf/decisions",
    request_body = NewBoardDecision,
    responses((status = 200, description = "Decision opened", body = BoardDecision)),
    tag = "Governance"
)]
pub async fn create_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewBoardDecision>,
) -> Result<Json<BoardDecision>, ApiError> {
    user.require(Permission::Govern)?;
    Ok(Json(
        state.governance_service.create(payload, user.actor()).await?,
    ))
}

/// Decision with its votes and running tally
#[utoipa::path(
    get,
    path = "/waqf/decisions/{id}",
    params(("id" = Uuid, Path, description = "Decision ID")),
    responses(
        (status = 200, description = "Decision", body = DecisionDetail),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Governance"
)]
pub async fn get_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DecisionDetail>, ApiError> {
    user.require(Permission::Govern)?;
    Ok(Json(state.governance_service.detail(id).await?))
}

/// Cast or change a vote
#[utoipa::path(
    post,
    path = "/waqf/decisions/{id}/votes",
    params(("id" = Uuid, Path, description = "Decision ID")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = DecisionDetail),
        (status = 409, description = "Voting is closed", body = ErrorResponse)
    ),
    tag = "Governance"
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<DecisionDetail>, ApiError> {
    user.require(Permission::Govern)?;
    Ok(Json(
        state
            .governance_service
            .vote(id, user.id, payload.choice)
            .await?,
    ))
}

/// Close voting and record the outcome
#[utoipa::path(
    post,
    path = "/waqf/decisions/{id}/close",
    params(("id" = Uuid, Path, description = "Decision ID")),
    responses(
        (status = 200, description = "Decision closed", body = DecisionDetail),
        (status = 409, description = "Already closed", body = ErrorResponse)
    ),
    tag = "Governance"
)]
pub async fn close_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DecisionDetail>, ApiError> {
    user.require(Permission::Govern)?;
    Ok(Json(
        state.governance_service.close(id, user.actor()).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/decisions", get(list_decisions).post(create_decision))
        .route("/waqf/decisions/:id", get(get_decision))
        .route("/waqf/decisions/:id/votes", post(cast_vote))
        .route("/waqf/decisions/:id/close", post(close_decision))
}

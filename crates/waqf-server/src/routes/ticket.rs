//! Ticket Routes - Help desk

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{NewSupportTicket, SupportTicket};
use waqf::Permission;

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{AssignTicketRequest, MoveTicketRequest};
use crate::AppState;

/// List tickets visible to the caller
#[utoipa::path(
    get,
    path = "/waqf/tickets",
    responses((status = 200, description = "Tickets", body = Vec<SupportTicket>)),
    tag = "Tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SupportTicket>>, ApiError> {
    Ok(Json(state.ticket_service.list(&user).await?))
}

/// Open a ticket
#[utoipa::path(
    post,
    path = "/waqf/tickets",
    request_body = NewSupportTicket,
    responses((status = 200, description = "Ticket opened", body = SupportTicket)),
    tag = "Tickets"
)]
pub async fn open_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewSupportTicket>,
) -> Result<Json<SupportTicket>, ApiError> {
    Ok(Json(state.ticket_service.open(payload, &user).await?))
}

/// Get a ticket
#[utoipa::path(
    get,
    path = "/waqf/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket", body = SupportTicket),
        (status = 403, description = "Ticket belongs to another user", body = ErrorResponse)
    ),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SupportTicket>, ApiError> {
    Ok(Json(state.ticket_service.get(id, &user).await?))
}

/// Move a ticket to another status
#[utoipa::path(
    post,
    path = "/waqf/tickets/{id}/status",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = MoveTicketRequest,
    responses(
        (status = 200, description = "Ticket moved", body = SupportTicket),
        (status = 409, description = "Transition not allowed", body = ErrorResponse)
    ),
    tag = "Tickets"
)]
pub async fn move_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveTicketRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    Ok(Json(
        state
            .ticket_service
            .move_to(id, payload.status, &user)
            .await?,
    ))
}

/// Assign a ticket to a staff member
#[utoipa::path(
    post,
    path = "/waqf/tickets/{id}/assign",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = AssignTicketRequest,
    responses((status = 200, description = "Ticket assigned", body = SupportTicket)),
    tag = "Tickets"
)]
pub async fn assign_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTicketRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    user.require(Permission::HandleTickets)?;
    Ok(Json(
        state
            .ticket_service
            .assign(id, payload.assignee, &user)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/tickets", get(list_tickets).post(open_ticket))
        .route("/waqf/tickets/:id", get(get_ticket))
        .route("/waqf/tickets/:id/status", post(move_ticket))
        .route("/waqf/tickets/:id/assign", post(assign_ticket))
}

//! Property Routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{NewProperty, PropertyUpdate};
use waqf::{Permission, Property};

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

/// List properties
#[utoipa::path(
    get,
    path = "/waqf/properties",
    responses((status = 200, description = "Properties", body = Vec<Property>)),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Property>>, ApiError> {
    user.require(Permission::ViewProperties)?;
    Ok(Json(state.rental_service.list_properties().await?))
}

/// Add a property
#[utoipa::path(
    post,
    path = "/waqf/properties",
    request_body = NewProperty,
    responses(
        (status = 200, description = "Property created", body = Property),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewProperty>,
) -> Result<Json<Property>, ApiError> {
    user.require(Permission::ManageProperties)?;
    Ok(Json(state.rental_service.create_property(payload).await?))
}

/// Get a property
#[utoipa::path(
    get,
    path = "/waqf/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property", body = Property),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    user.require(Permission::ViewProperties)?;
    Ok(Json(state.rental_service.get_property(id).await?))
}

/// Update a property
#[utoipa::path(
    put,
    path = "/waqf/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = PropertyUpdate,
    responses((status = 200, description = "Property updated", body = Property)),
    tag = "Properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyUpdate>,
) -> Result<Json<Property>, ApiError> {
    user.require(Permission::ManageProperties)?;
    Ok(Json(state.rental_service.update_property(id, payload).await?))
}

/// Delete a property without active contracts
#[utoipa::path(
    delete,
    path = "/waqf/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property deleted"),
        (status = 409, description = "Property has an active contract", body = ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require(Permission::ManageProperties)?;
    if !state.rental_service.delete_property(id, user.actor()).await? {
        return Err(ApiError::not_found("Property not found"));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/properties", get(list_properties).post(create_property))
        .route(
            "/waqf/properties/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

//! Archive Routes - Document metadata

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use waqf::domain::{ArchivedDocument, NewArchivedDocument};
use waqf::Permission;

use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{ArchiveQuery, CategoryCount};
use crate::AppState;

/// List archived documents
#[utoipa::path(
    get,
    path = "/waqf/archive",
    params(ArchiveQuery),
    responses((status = 200, description = "Documents", body = Vec<ArchivedDocument>)),
    tag = "Archive"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ArchiveQuery>,
) -> Result<Json<Vec<ArchivedDocument>>, ApiError> {
    user.require(Permission::ViewArchive)?;
    Ok(Json(state.archive_service.list(query.category).await?))
}

/// Register a stored document
#[utoipa::path(
    post,
    path = "/waqf/archive",
    request_body = NewArchivedDocument,
    responses(
        (status = 200, description = "Document archived", body = ArchivedDocument),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Archive"
)]
pub async fn create_document(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewArchivedDocument>,
) -> Result<Json<ArchivedDocument>, ApiError> {
    user.require(Permission::ManageArchive)?;
    Ok(Json(
        state.archive_service.create(payload, user.actor()).await?,
    ))
}

/// Document totals per category
#[utoipa::path(
    get,
    path = "/waqf/archive/stats",
    responses((status = 200, description = "Totals per category", body = Vec<CategoryCount>)),
    tag = "Archive"
)]
pub async fn archive_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    user.require(Permission::ViewArchive)?;
    let totals = state.archive_service.totals().await?;
    Ok(Json(
        totals
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
    ))
}

/// Get a document
#[utoipa::path(
    get,
    path = "/waqf/archive/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = ArchivedDocument),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Archive"
)]
pub async fn get_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ArchivedDocument>, ApiError> {
    user.require(Permission::ViewArchive)?;
    Ok(Json(state.archive_service.get(id).await?))
}

/// Remove a document's metadata
#[utoipa::path(
    delete,
    path = "/waqf/archive/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document removed"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Archive"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require(Permission::ManageArchive)?;
    let deleted = state.archive_service.delete(id, user.actor()).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/archive", get(list_documents).post(create_document))
        .route("/waqf/archive/stats", get(archive_stats))
        .route("/waqf/archive/:id", get(get_document).delete(delete_document))
}

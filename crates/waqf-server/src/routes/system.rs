//! System Routes - Health, error log and audit trail

use std::time::Instant;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use waqf::domain::AuditEntry;
use waqf::Permission;

use crate::application::FunctionsHealth;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::error_log::ErrorRecord;
use crate::models::{AuditQuery, ClearedResponse, DatabaseHealth, SystemHealth};
use crate::AppState;

const DEFAULT_AUDIT_LIMIT: i64 = 50;

pub(crate) async fn ping_database(pool: &sqlx::PgPool) -> DatabaseHealth {
    let started = Instant::now();
    let result = sqlx::query("SELECT 1").execute(pool).await;
    let latency_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(_) => DatabaseHealth {
            ok: true,
            latency_ms,
            error: None,
        },
        Err(e) => {
            tracing::error!("Database ping failed: {e}");
            DatabaseHealth {
                ok: false,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Database round trip, edge functions, cache and error log
#[utoipa::path(
    get,
    path = "/waqf/system/health",
    responses(
        (status = 200, description = "System health", body = SystemHealth),
        (status = 403, description = "Forbidden")
    ),
    tag = "System"
)]
pub async fn system_health(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SystemHealth>, ApiError> {
    user.require(Permission::MonitorSystem)?;

    let (database, edge_functions) =
        tokio::join!(ping_database(&state.pool), state.notifier.health());
    let status = match (&database.ok, &edge_functions) {
        (false, _) => "degraded",
        (true, FunctionsHealth::Error(_)) => "degraded",
        _ => "ok",
    };

    Ok(Json(SystemHealth {
        status: status.to_string(),
        database,
        edge_functions,
        cache_entries: state.cache.len(),
        error_log_size: state.error_log.len(),
        error_log_capacity: state.error_log.capacity(),
    }))
}

/// Recent API errors, newest first
#[utoipa::path(
    get,
    path = "/waqf/system/errors",
    responses((status = 200, description = "Error log", body = Vec<ErrorRecord>)),
    tag = "System"
)]
pub async fn list_errors(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ErrorRecord>>, ApiError> {
    user.require(Permission::MonitorSystem)?;
    Ok(Json(state.error_log.entries()))
}

/// Empty the error log
#[utoipa::path(
    delete,
    path = "/waqf/system/errors",
    responses((status = 200, description = "Error log cleared", body = ClearedResponse)),
    tag = "System"
)]
pub async fn clear_errors(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ClearedResponse>, ApiError> {
    user.require(Permission::MonitorSystem)?;
    let cleared = state.error_log.clear();
    tracing::info!("Cleared {cleared} error log entries");
    Ok(Json(ClearedResponse { cleared }))
}

/// Latest audit entries
#[utoipa::path(
    get,
    path = "/waqf/system/audit",
    params(AuditQuery),
    responses((status = 200, description = "Audit trail", body = Vec<AuditEntry>)),
    tag = "System"
)]
pub async fn list_audit(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    user.require(Permission::MonitorSystem)?;
    let limit = query.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
    Ok(Json(state.audit.recent(limit).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waqf/system/health", get(system_health))
        .route("/waqf/system/errors", get(list_errors).delete(clear_errors))
        .route("/waqf/system/audit", get(list_audit))
}

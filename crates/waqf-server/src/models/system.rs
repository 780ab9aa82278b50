//! System monitoring payloads

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::FunctionsHealth;

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
    pub ok: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemHealth {
    /// `ok` when the database answers, `degraded` otherwise
    pub status: String,
    pub database: DatabaseHealth,
    pub edge_functions: FunctionsHealth,
    pub cache_entries: usize,
    pub error_log_size: usize,
    pub error_log_capacity: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearedResponse {
    pub cleared: usize,
}

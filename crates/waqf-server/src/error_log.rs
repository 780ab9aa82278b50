//! Rolling error log
//!
//! Keeps the most recent error responses in memory for administrators.
//! Oldest entries are evicted once the capacity is reached.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use waqf::ErrorCategory;

use crate::error::ErrorDetail;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorRecord {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub status: u16,
    pub category: ErrorCategory,
    pub message: String,
    /// Request that failed, e.g. `POST /waqf/journal/{id}/post`
    pub context: Option<String>,
}

pub struct ErrorLog {
    capacity: usize,
    entries: Mutex<VecDeque<ErrorRecord>>,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ErrorRecord>> {
        // A panic while holding the lock cannot leave the deque inconsistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(
        &self,
        status: u16,
        category: ErrorCategory,
        message: impl Into<String>,
        context: Option<String>,
    ) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(ErrorRecord {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            status,
            category,
            message: message.into(),
            context,
        });
    }

    /// Newest first
    pub fn entries(&self) -> Vec<ErrorRecord> {
        self.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }
}

/// Middleware recording every `ApiError` response into the log
pub async fn record_errors(
    State(log): State<Arc<ErrorLog>>,
    request: Request,
    next: Next,
) -> Response {
    let context = format!("{} {}", request.method(), request.uri().path());
    let response = next.run(request).await;

    if let Some(detail) = response.extensions().get::<ErrorDetail>() {
        log.record(
            response.status().as_u16(),
            detail.category,
            detail.message.clone(),
            Some(context),
        );
    }

    response
}

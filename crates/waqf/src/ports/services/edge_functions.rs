//! Edge Functions Port
//!
//! Serverless HTTP functions invoked by name with a JSON body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Function that delivers in-app/SMS/email notifications
pub const SEND_NOTIFICATION: &str = "send-notification";

/// Function that reports the health of the functions runtime
pub const HEALTH_CHECK: &str = "health-check";

/// Payload for [`SEND_NOTIFICATION`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: Option<Uuid>,
    pub beneficiary_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    /// Kind of event, e.g. `request_decided`
    pub kind: String,
}

#[async_trait]
pub trait EdgeFunctions: Send + Sync {
    /// Invoke a function and return its JSON response
    async fn invoke(
        &self,
        name: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// Send a notification; failures are reported, not retried
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError> {
        let body = serde_json::to_value(notification)
            .map_err(|e| DomainError::ExternalService(format!("Failed to encode notification: {e}")))?;
        self.invoke(SEND_NOTIFICATION, body).await.map(|_| ())
    }
}

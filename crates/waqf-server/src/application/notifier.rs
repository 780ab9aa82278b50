//! Notifier - Fire-and-report delivery through the `send-notification` function

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use waqf::ports::HEALTH_CHECK;
use waqf::{EdgeFunctions, Notification};

/// Status of the edge functions runtime
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FunctionsHealth {
    Ok,
    Disabled,
    Error(String),
}

#[derive(Clone, Default)]
pub struct Notifier {
    functions: Option<Arc<dyn EdgeFunctions>>,
}

impl Notifier {
    pub fn new(functions: Option<Arc<dyn EdgeFunctions>>) -> Self {
        Self { functions }
    }

    pub fn is_enabled(&self) -> bool {
        self.functions.is_some()
    }

    /// Deliver one notification; failures are logged only
    pub async fn send(&self, notification: Notification) {
        let Some(functions) = &self.functions else {
            tracing::debug!("Notifications disabled, skipping {}", notification.kind);
            return;
        };
        if let Err(e) = functions.notify(&notification).await {
            tracing::warn!("⚠️  Notification {} not delivered: {e}", notification.kind);
        }
    }

    /// Deliver a batch in the background
    pub fn send_all(&self, notifications: Vec<Notification>) {
        if notifications.is_empty() || !self.is_enabled() {
            return;
        }
        let notifier = self.clone();
        tokio::spawn(async move {
            for notification in notifications {
                notifier.send(notification).await;
            }
        });
    }

    pub async fn health(&self) -> FunctionsHealth {
        match &self.functions {
            None => FunctionsHealth::Disabled,
            Some(functions) => match functions.invoke(HEALTH_CHECK, serde_json::json!({})).await {
                Ok(_) => FunctionsHealth::Ok,
                Err(e) => FunctionsHealth::Error(e.to_string()),
            },
        }
    }
}

//! Waqf API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use waqf::KpiSnapshot;

/// API Client for the Waqf server
pub struct WaqfClient {
    client: Client,
    base_url: String,
    token: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct TrialBalanceRow {
    pub account_code: String,
    pub account_name: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TrialBalanceResponse {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub is_balanced: bool,
}

impl WaqfClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Unauthenticated liveness check
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Waqf API")?;

        if !resp.status().is_success() {
            bail!("Health check failed ({})", resp.status());
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Unified KPI snapshot
    pub async fn kpis(&self) -> Result<KpiSnapshot> {
        self.send(self.get("/waqf/kpis")).await
    }

    /// Dashboard for the caller's role; its sections vary by role
    pub async fn dashboard(&self) -> Result<serde_json::Value> {
        self.send(self.get("/waqf/dashboard")).await
    }

    pub async fn trial_balance(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<TrialBalanceResponse> {
        let mut query = Vec::new();
        if let Some(from) = from {
            query.push(("from", from));
        }
        if let Some(to) = to {
            query.push(("to", to));
        }
        self.send(self.get("/waqf/reports/trial-balance").query(&query))
            .await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request
            .send()
            .await
            .context("Failed to connect to Waqf API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }
}

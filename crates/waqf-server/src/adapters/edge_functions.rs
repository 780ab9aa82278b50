//! HTTP Edge Functions Client
//!
//! Invokes serverless functions with `POST {base}/{name}` using reqwest.
//! Calls are never retried.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use waqf::{DomainError, EdgeFunctions};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of EdgeFunctions
pub struct HttpEdgeFunctions {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    signing_secret: Option<String>,
}

impl HttpEdgeFunctions {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        signing_secret: Option<String>,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("waqf-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            signing_secret,
        })
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

/// Hex HMAC-SHA256 of the body with a `sha256=` prefix
pub fn sign_payload(secret: &str, payload: &[u8]) -> Result<String, DomainError> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| DomainError::ExternalService(format!("Invalid signing key: {e}")))?;
    mac.update(payload);
    let bytes = mac.finalize().into_bytes();

    Ok(format!("sha256={}", hex::encode(bytes)))
}

#[async_trait]
impl EdgeFunctions for HttpEdgeFunctions {
    async fn invoke(
        &self,
        name: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let body = serde_json::to_vec(&body).map_err(|e| {
            DomainError::ExternalService(format!("Failed to serialize payload: {e}"))
        })?;

        let mut request = self
            .client
            .post(self.function_url(name))
            .header("Content-Type", "application/json");

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        // Add signature if secret is configured
        if let Some(secret) = &self.signing_secret {
            request = request.header("X-Waqf-Signature", sign_payload(secret, &body)?);
        }

        let response = request.body(body).send().await.map_err(|e| {
            DomainError::ExternalService(format!("{name} failed to send: {e}"))
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "{name} returned {status}: {text}"
            )));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            DomainError::ExternalService(format!("{name} returned invalid JSON: {e}"))
        })
    }
}

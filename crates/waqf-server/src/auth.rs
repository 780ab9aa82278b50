//! Bearer JWT Authentication
//!
//! Tokens are issued by the external auth service and verified here with the
//! shared HS256 secret. The caller's role comes from `app_metadata.role`;
//! a missing or unknown role falls back to `beneficiary`.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waqf::{Permission, UserRole};

use crate::error::ApiError;

/// Token verification for the protected routes; without a secret every
/// request runs as the development user
#[derive(Clone, Default)]
pub struct Authenticator {
    verifier: Option<Arc<JwtVerifier>>,
}

impl Authenticator {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            verifier: secret.map(|s| Arc::new(JwtVerifier::new(s))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

/// The authenticated caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    /// Used for every request while no secret is configured
    pub fn development() -> Self {
        Self {
            id: Uuid::nil(),
            email: None,
            role: UserRole::Admin,
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role.can(permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "role {} lacks permission {}",
                self.role, permission
            )))
        }
    }

    pub fn is_beneficiary(&self) -> bool {
        self.role == UserRole::Beneficiary
    }

    /// Id to record as actor; `None` for the development user
    pub fn actor(&self) -> Option<Uuid> {
        (!self.id.is_nil()).then_some(self.id)
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("token subject is not a user id".to_string()))?;
        let role = claims
            .app_metadata
            .role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(UserRole::Beneficiary);

        Ok(Self {
            id,
            email: claims.email,
            role,
        })
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry an audience we do not pin
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;
        AuthUser::try_from(data.claims)
    }
}

fn bearer_token(request: &Request) -> Result<&str, ApiError> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid Authorization header format".to_string()))
}

/// Authentication middleware
/// Resolves the caller from the Bearer token and stores it in extensions
pub async fn auth_middleware(
    State(auth): State<Authenticator>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match &auth.verifier {
        Some(verifier) => verifier.verify(bearer_token(&request)?)?,
        // No secret configured = auth disabled (for development)
        None => AuthUser::development(),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("request is not authenticated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http, middleware, routing::get, Router};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    fn token(sub: &str, role: Option<&str>, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            email: Some("user@example.com".to_string()),
            app_metadata: AppMetadata {
                role: role.map(str::to_string),
            },
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_reads_role() {
        let id = Uuid::new_v4();
        let user = JwtVerifier::new(SECRET)
            .verify(&token(&id.to_string(), Some("accountant"), 3600))
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, UserRole::Accountant);
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_missing_or_unknown_role_is_beneficiary() {
        let verifier = JwtVerifier::new(SECRET);
        let id = Uuid::new_v4().to_string();
        assert_eq!(
            verifier.verify(&token(&id, None, 3600)).unwrap().role,
            UserRole::Beneficiary
        );
        assert_eq!(
            verifier.verify(&token(&id, Some("superuser"), 3600)).unwrap().role,
            UserRole::Beneficiary
        );
    }

    #[test]
    fn test_rejects_expired_and_foreign_tokens() {
        let id = Uuid::new_v4().to_string();
        assert!(JwtVerifier::new(SECRET)
            .verify(&token(&id, Some("admin"), -3600))
            .is_err());
        assert!(JwtVerifier::new("other-secret")
            .verify(&token(&id, Some("admin"), 3600))
            .is_err());
    }

    #[test]
    fn test_require_permission() {
        let cashier = AuthUser {
            id: Uuid::new_v4(),
            email: None,
            role: UserRole::Cashier,
        };
        assert!(cashier.require(Permission::RecordPayments).is_ok());
        assert!(matches!(
            cashier.require(Permission::ManageAccounting),
            Err(ApiError::Forbidden(_))
        ));
        assert!(AuthUser::development().actor().is_none());
    }

    fn app(auth: Authenticator) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|user: AuthUser| async move { user.role.to_string() }),
            )
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
    }

    async fn status(app: Router, authorization: Option<String>) -> u16 {
        let mut request = http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
        response.status().as_u16()
    }

    #[tokio::test]
    async fn test_middleware_rejects_missing_or_bad_tokens() {
        let app = app(Authenticator::new(Some(SECRET)));
        let id = Uuid::new_v4().to_string();

        assert_eq!(status(app.clone(), None).await, 401);
        assert_eq!(status(app.clone(), Some("Basic abc".to_string())).await, 401);
        assert_eq!(status(app.clone(), Some("Bearer not-a-jwt".to_string())).await, 401);

        let expired = token(&id, Some("admin"), -3600);
        assert_eq!(status(app.clone(), Some(format!("Bearer {expired}"))).await, 401);

        let valid = token(&id, Some("cashier"), 3600);
        assert_eq!(status(app, Some(format!("Bearer {valid}"))).await, 200);
    }

    #[tokio::test]
    async fn test_without_secret_everyone_is_development_admin() {
        let auth = Authenticator::default();
        assert!(!auth.is_enabled());
        assert_eq!(status(app(auth), None).await, 200);
    }
}

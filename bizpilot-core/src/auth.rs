use axum::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::env;

use crate::error::ApiError;

/// Container for the authenticated tenant's id stored in request extensions.
///
/// The id is the identity provider's opaque subject string. All data access
/// is scoped under it; no handler touches the store without one.
#[derive(Clone, Debug)]
pub struct CurrentTenant(pub String);

/// Claims expected inside the JWT for authenticated tenants.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject - the tenant's opaque identifier.
    pub sub: String,
    pub exp: usize,
}

/// Middleware to validate a Bearer JWT in the `Authorization` header.
///
/// On success the request is forwarded with a `CurrentTenant` attached;
/// on failure a `401` is returned before any store access happens.
pub async fn jwt_middleware(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    // Extract token from Authorization header
    let auth_header = req.headers().get("authorization");
    let token = match auth_header.and_then(|v| v.to_str().ok()) {
        Some(s) if s.starts_with("Bearer ") => &s[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let decoded = match decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256)) {
        Ok(c) => c.claims,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    if decoded.sub.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(CurrentTenant(decoded.sub));

    Ok(next.run(req).await)
}

/// Extractor that recovers the tenant identity placed by `jwt_middleware`.
///
/// A handler taking `CurrentTenant` is guaranteed an authenticated tenant;
/// if the extension is missing the request is rejected with `Unauthorized`
/// and the handler body never runs.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentTenant>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

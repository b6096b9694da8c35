//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{constants::roles, error::AppError, services::AuthService, state::AppState};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub role: String,
}

impl AuthenticatedUser {
    /// Resolve the bearer token in `headers`
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Result<Self, AppError> {
        let Some(auth_header) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) else {
            debug!("Auth failed: No Authorization header");
            return Err(AppError::Unauthorized);
        };

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            debug!("Auth failed: expected 'Bearer <token>'");
            return Err(AppError::Unauthorized);
        };

        let claims = AuthService::verify_token(token, secret)
            .inspect_err(|e| debug!(error = ?e, "Auth failed: Token verification failed"))?;

        Ok(Self {
            id: claims.user_id()?,
            name: claims.name,
            role: claims.role,
        })
    }

    /// Reject anyone without the admin role
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == roles::ADMIN {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Uses the identity placed by [`auth_middleware`] when present, otherwise
/// verifies the request's bearer token directly.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let state = AppState::from_ref(state);
        Self::from_headers(&parts.headers, &state.config().jwt.secret)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = AuthenticatedUser::from_headers(request.headers(), &state.config().jwt.secret)
        .inspect_err(|_| debug!(path = %request.uri().path(), "Rejected unauthenticated request"))?;

    debug!(user_id = %user.id, role = %user.role, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

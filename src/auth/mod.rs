pub mod password;

use std::fmt;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// Signed bearer-token claims: subject id, role, expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    /// Authorization check, run after authentication has succeeded.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("access denied, {role} only")))
        }
    }

    /// Staff routes carry the driver id in the path; the caller must be
    /// that driver.
    pub fn require_subject(&self, id: Uuid) -> Result<(), AppError> {
        if self.sub == id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "access denied, token does not match the named driver".to_string(),
            ))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

pub fn issue_token(
    subject: Uuid,
    role: Role,
    ttl_hours: i64,
    key: &EncodingKey,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: subject,
        role,
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(&Header::default(), &claims, key)
        .map_err(|err| AppError::Internal(format!("token signing failed: {err}")))
}

/// Pure verification: a typed claims result or an authentication failure.
pub fn verify_token(token: &str, key: &DecodingKey) -> Result<Claims, AppError> {
    decode::<Claims>(token, key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| {
            AppError::Unauthorized("token verification failed, authorization denied".to_string())
        })
}

/// Extractor performing the authentication stage for protected routes.
pub struct Authenticated(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("no token, authorization denied".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("malformed authorization header".to_string())
        })?;

        let claims = verify_token(token, state.decoding_key())?;
        Ok(Authenticated(claims))
    }
}

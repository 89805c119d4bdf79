use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{
    i18n::{localize, Locale, MessageKey},
    response::ErrorReply,
};

/// Verifies the bearer token and yields the subject (user uid).
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ErrorReply;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);
        let unauthorized =
            || ErrorReply::new(StatusCode::UNAUTHORIZED, localize(MessageKey::Unauthorized, locale));

        // Expect "Bearer <token>"
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .filter(|t| !t.is_empty())
            .ok_or_else(unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let subject = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            unauthorized()
        })?;

        Ok(AuthUser(subject))
    }
}

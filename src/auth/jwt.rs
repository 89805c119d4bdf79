use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Algorithms accepted on verification. Anything else in the header is an
/// algorithm-substitution attempt.
const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("unexpected signing method: {0:?}")]
    UnexpectedSigningMethod(Algorithm),
    /// Bad signature, tampered payload, expired or not yet valid.
    #[error("invalid token")]
    Invalid,
    #[error("unknown claims type")]
    UnknownClaims,
    #[error("token lifetime out of range")]
    TtlOutOfRange,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        // Out-of-range lifetimes saturate and are refused at signing time.
        let secs = u64::try_from(cfg.ttl_hours)
            .unwrap_or(0)
            .saturating_mul(60 * 60);
        Self::new(cfg.secret.as_bytes(), Duration::from_secs(secs))
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn sign(&self, subject: &str) -> Result<String, TokenError> {
        self.sign_at(OffsetDateTime::now_utc(), subject)
    }

    pub(crate) fn sign_at(&self, now: OffsetDateTime, subject: &str) -> Result<String, TokenError> {
        let exp = TimeDuration::try_from(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(TokenError::TtlOutOfRange)?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            nbf: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(subject, "jwt signed");
        Ok(token)
    }

    /// Returns the subject of a valid token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Invalid)?;
        if !HMAC_FAMILY.contains(&header.alg) {
            warn!(alg = ?header.alg, "rejected token with non-HMAC algorithm");
            return Err(TokenError::UnexpectedSigningMethod(header.alg));
        }

        let mut validation = Validation::new(header.alg);
        validation.algorithms = HMAC_FAMILY.to_vec();
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) => TokenError::UnknownClaims,
                _ => TokenError::Invalid,
            }
        })?;
        debug!(subject = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}

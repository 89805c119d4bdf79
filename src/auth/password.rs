use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Work factor applied when `PASSWORD_COST` is not configured.
pub const DEFAULT_COST: u32 = Params::DEFAULT_T_COST;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("cost factor {cost} rejected: {reason}")]
    InvalidCost { cost: u32, reason: String },
    #[error("hashing failed: {0}")]
    Hash(String),
    #[error("malformed password hash: {0}")]
    MalformedHash(String),
}

pub fn cost_in_range(cost: u32) -> bool {
    (Params::MIN_T_COST..=Params::MAX_T_COST).contains(&cost)
}

fn hasher(cost: u32) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
        .map_err(|e| PasswordError::InvalidCost {
            cost,
            reason: e.to_string(),
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Produces a self-describing PHC string; the salt and cost travel with it.
pub fn hash_password(cost: u32, plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(cost)?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` means the password does not match; `Err` is reserved for hashes
/// that cannot be parsed or verified at all.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        PasswordError::MalformedHash(e.to_string())
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verify_password error");
            Err(PasswordError::MalformedHash(e.to_string()))
        }
    }
}

use std::sync::Arc;

use anyhow::Context;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use super::{
    dto::{CreateUserRequest, LoginRequest, TokenData},
    repo::{RepoError, UserRepository},
    repo_types::{NewUser, User},
    validation::{self, ValidationError},
};
use crate::{
    auth::{jwt::JwtKeys, password},
    config::AppConfig,
    uid,
};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
    #[error("user already exists")]
    AlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for UserError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => UserError::NotFound,
            RepoError::AlreadyExists => UserError::AlreadyExists,
            RepoError::Other(e) => UserError::Internal(e),
        }
    }
}

/// Registration and login. Holds no per-request state; everything it needs is
/// handed over at construction.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
    password_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys, password_cost: u32) -> Self {
        Self {
            repo,
            keys,
            password_cost,
        }
    }

    pub fn from_config(repo: Arc<dyn UserRepository>, config: &AppConfig) -> Self {
        Self::new(repo, JwtKeys::from(&config.jwt), config.password_cost)
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<TokenData, UserError> {
        self.create_on(req, OffsetDateTime::now_utc().date()).await
    }

    pub(crate) async fn create_on(
        &self,
        req: CreateUserRequest,
        today: Date,
    ) -> Result<TokenData, UserError> {
        let input = validation::validate_create(req, today)?;

        let hashed_password = password::hash_password(self.password_cost, &input.password)
            .context("hash password")?;

        let uid = uid::generate(uid::USER_UID_LEN);
        // Signed before the insert so a signing failure leaves no row behind.
        let token = self.keys.sign(&uid).context("sign access token")?;

        let new_user = NewUser {
            uid,
            name: input.name,
            email: input.email,
            username: input.username,
            hashed_password,
            sex: input.sex,
            birthdate: input.birthdate,
        };
        let user = self.repo.create(&new_user).await.map_err(|e| {
            debug!(error = %e, username = %new_user.username, "create user failed");
            UserError::from(e)
        })?;

        info!(uid = %user.uid, username = %user.username, "user registered");
        Ok(TokenData { token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<TokenData, UserError> {
        let input = validation::validate_login(req)?;

        let user = self
            .repo
            .get_by_username(&input.username)
            .await
            .map_err(|e| {
                debug!(error = %e, username = %input.username, "get user failed");
                UserError::from(e)
            })?;

        let matches = password::verify_password(&input.password, &user.hashed_password)
            .context("verify password")?;
        if !matches {
            warn!(uid = %user.uid, "login with wrong password");
            return Err(UserError::WrongPassword);
        }

        let token = self.keys.sign(&user.uid).context("sign access token")?;
        info!(uid = %user.uid, "user logged in");
        Ok(TokenData { token })
    }

    pub async fn profile(&self, uid: &str) -> Result<User, UserError> {
        Ok(self.repo.get_by_uid(uid).await?)
    }

    pub async fn ping(&self) -> Result<(), UserError> {
        Ok(self.repo.ping().await?)
    }
}

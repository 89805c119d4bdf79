use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User, UserRow};

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error("user already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                RepoError::AlreadyExists
            }
            other => RepoError::Other(other.into()),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A clash on username or email is `AlreadyExists`.
    async fn create(&self, user: &NewUser) -> Result<User, RepoError>;
    async fn get_by_username(&self, username: &str) -> Result<User, RepoError>;
    async fn get_by_uid(&self, uid: &str) -> Result<User, RepoError>;
    async fn ping(&self) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (uid, name, email, username, hashed_password, sex, birthdate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING uid, name, email, username, hashed_password, sex, birthdate, verified, created_at
            "#,
        )
        .bind(&user.uid)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(user.sex.as_str())
        .bind(user.birthdate)
        .fetch_one(&self.db)
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT uid, name, email, username, hashed_password, sex, birthdate, verified, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn get_by_uid(&self, uid: &str) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT uid, name, email, username, hashed_password, sex, birthdate, verified, created_at
            FROM users
            WHERE uid = $1
            "#,
        )
        .bind(uid)
        .fetch_one(&self.db)
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// Request body for user registration. Missing fields decode as empty and are
/// reported by validation rather than as a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub sex: String,
    pub birthdate: String, // YYYY-MM-DD
}

/// Request body for login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `data` of a successful register or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenData {
    pub token: String,
}

use serde::{Deserialize, Serialize};

/// Registered claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // user uid
    pub iat: i64,    // issued at (unix timestamp)
    pub nbf: i64,    // not before
    pub exp: i64,    // expires at
}

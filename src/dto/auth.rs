//! Payloads exchanged with the login and profile endpoints.

use serde::{Deserialize, Serialize};

/// Token issued by `POST /login`.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Body of `GET /admin/me`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CurrentUserResponse {
    #[serde(default)]
    pub full_name: String,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::Owner;

/// Request body for owner login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub owner: PublicOwner,
}

/// Public part of the owner returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicOwner {
    pub id: Uuid,
    pub email: String,
}

impl From<Owner> for PublicOwner {
    fn from(o: Owner) -> Self {
        Self {
            id: o.id,
            email: o.email,
        }
    }
}

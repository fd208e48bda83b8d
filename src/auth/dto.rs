use serde::{Deserialize, Serialize};

/// Request body for registration and login. Fields are optional so that a
/// missing key is answered with our own 400 instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
}

//! # Authentication Endpoints
//!
//! XQUARE login, GitHub registration and the signed-in user's profile.

use shared::{RegisterRequest, RegisterResponse, UserProfile, XquareLoginRequest, XquareLoginResponse};

use super::client::{ApiClient, Auth};
use crate::core::error::ApiError;

/// Login with XQUARE account credentials.
#[tracing::instrument(skip(client, password), fields(account_id = %account_id))]
pub async fn xquare_login(
    client: &ApiClient,
    account_id: String,
    password: String,
) -> Result<XquareLoginResponse, ApiError> {
    tracing::info!("Attempting XQUARE login");
    let start = std::time::Instant::now();

    let request = XquareLoginRequest { account_id, password };
    let result = client
        .post_json::<_, XquareLoginResponse>(&["auth", "xquare"], &request, Auth::Anonymous, "Login failed")
        .await;

    match &result {
        Ok(response) => tracing::info!(
            xquare_id = %response.xquare_id,
            duration_ms = start.elapsed().as_millis(),
            "XQUARE login successful"
        ),
        Err(e) => tracing::warn!(error = %e, duration_ms = start.elapsed().as_millis(), "XQUARE login failed"),
    }
    result
}

/// Complete sign-up with the XQUARE id and a GitHub OAuth code.
#[tracing::instrument(skip(client, code), fields(xquare_id = %xquare_id))]
pub async fn register(client: &ApiClient, xquare_id: String, code: String) -> Result<RegisterResponse, ApiError> {
    let request = RegisterRequest { xquare_id, code };
    client
        .post_json(&["auth", "register", ""], &request, Auth::Anonymous, "Registration failed")
        .await
}

/// Fetch the signed-in user's profile.
pub async fn get_user_info(client: &ApiClient) -> Result<UserProfile, ApiError> {
    client
        .get_json(&["auth", "user"], &[], Auth::Session, "Failed to fetch user information")
        .await
}

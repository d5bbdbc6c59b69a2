//! # Leaderboard and Directory Endpoints

use shared::{LeaderboardResponse, UsersResponse};

use super::client::{ApiClient, Auth};
use crate::core::error::ApiError;

/// Get one leaderboard page.
pub async fn get_leaderboard(client: &ApiClient, page: u32, limit: u32) -> Result<LeaderboardResponse, ApiError> {
    client
        .get_json(
            &["leaderboard"],
            &[("page", page.to_string()), ("limit", limit.to_string())],
            Auth::Session,
            "Failed to fetch leaderboard",
        )
        .await
}

/// Get one page of the user directory.
pub async fn get_users(client: &ApiClient, page: u32, take: u32) -> Result<UsersResponse, ApiError> {
    client
        .get_json(
            &["auth", "users"],
            &[("page", page.to_string()), ("take", take.to_string())],
            Auth::Session,
            "Failed to fetch user list",
        )
        .await
}

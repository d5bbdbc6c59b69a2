use serde::{Deserialize, Serialize};

/// Account listed in the user directory (transfer recipient picker).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    #[serde(with = "super::id_string")]
    pub id: String,
    pub github_id: String,
    #[serde(default)]
    pub github_image_url: String,
    #[serde(default)]
    pub total_commits: u64,
    #[serde(default)]
    pub daily_coin_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_coin_date: Option<String>,
}

/// Pagination block of the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub take: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// Page of `GET /auth/users?page=&take=`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsersResponse {
    pub users: Vec<DirectoryUser>,
    pub pagination: Pagination,
}

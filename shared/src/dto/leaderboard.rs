use serde::{Deserialize, Serialize};

/// One ranked account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    #[serde(default)]
    pub profile_image_url: String,
    pub total_coins: f64,
    pub github_id: String,
}

/// Page of `GET /leaderboard?page=&limit=`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub items: Vec<LeaderboardEntry>,
    pub current_page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_pages: u32,
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

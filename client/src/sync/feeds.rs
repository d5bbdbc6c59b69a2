//! Page sources for the three infinite-scroll lists.
//!
//! | feed | endpoint | item key |
//! |---|---|---|
//! | [`LeaderboardFeed`] | `GET /leaderboard` | `githubId` |
//! | [`WalletHistoryFeed`] | `GET /coin/history` | `id` |
//! | [`UserDirectory`] | `GET /auth/users` | `id` |

use std::sync::Arc;

use async_trait::async_trait;
use shared::{DirectoryUser, LeaderboardEntry, User, WalletHistoryItem};

use super::list::ListPage;
use super::paginated::PaginatedList;
use crate::core::error::ApiError;
use crate::core::service::{ApiService, PageSource};
use crate::services::session::SessionContext;

/// Accounts shown when the leaderboard cannot be loaded.
const DEMO_ACCOUNTS: [(&str, f64); 5] = [
    ("coding-master", 15420.0),
    ("commit-hero", 12800.0),
    ("code-ninja", 9650.0),
    ("dev-genius", 7430.0),
    ("git-guru", 6200.0),
];

/// Placeholder ranking: the demo accounts plus `user`, ranked by coins.
pub fn demo_leaderboard(user: Option<&User>, limit: u32) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = DEMO_ACCOUNTS
        .iter()
        .enumerate()
        .map(|(i, (github_id, coins))| LeaderboardEntry {
            rank: 0,
            profile_image_url: format!("https://avatars.githubusercontent.com/u/{}?v=4", i + 1),
            total_coins: *coins,
            github_id: github_id.to_string(),
        })
        .collect();

    if let Some(user) = user {
        entries.push(LeaderboardEntry {
            rank: 0,
            profile_image_url: user.avatar.clone(),
            total_coins: user.total_coins,
            github_id: user.github_id.clone(),
        });
    }

    entries.sort_by(|a, b| b.total_coins.total_cmp(&a.total_coins));
    entries.truncate(limit as usize);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

/// Ranked accounts. Falls back to [`demo_leaderboard`] when page 0 fails.
pub struct LeaderboardFeed {
    api: Arc<dyn ApiService>,
    session: Option<Arc<SessionContext>>,
}

impl LeaderboardFeed {
    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self { api, session: None }
    }

    /// Include the signed-in user in the placeholder ranking.
    pub fn with_session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }
}

#[async_trait]
impl PageSource for LeaderboardFeed {
    type Item = LeaderboardEntry;

    fn name(&self) -> &'static str {
        "leaderboard"
    }

    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ListPage<LeaderboardEntry>, ApiError> {
        self.api.get_leaderboard(page, limit).await.map(ListPage::from)
    }

    fn fallback(&self, limit: u32) -> Vec<LeaderboardEntry> {
        let user = self.session.as_ref().and_then(|s| s.user());
        demo_leaderboard(user.as_ref(), limit)
    }
}

/// Coin history of the signed-in user. The page size is fixed server-side.
pub struct WalletHistoryFeed {
    api: Arc<dyn ApiService>,
}

impl WalletHistoryFeed {
    /// Limit to reset with. The backend fixes the history page size, so the
    /// value is never sent.
    pub const PAGE_LIMIT: u32 = 0;

    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for WalletHistoryFeed {
    type Item = WalletHistoryItem;

    fn name(&self) -> &'static str {
        "wallet_history"
    }

    async fn fetch_page(&self, page: u32, _limit: u32) -> Result<ListPage<WalletHistoryItem>, ApiError> {
        self.api.get_wallet_history(page).await.map(ListPage::from)
    }
}

/// Transfer recipients.
pub struct UserDirectory {
    api: Arc<dyn ApiService>,
}

impl UserDirectory {
    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for UserDirectory {
    type Item = DirectoryUser;

    fn name(&self) -> &'static str {
        "user_directory"
    }

    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ListPage<DirectoryUser>, ApiError> {
        self.api.get_users(page, limit).await.map(ListPage::from)
    }
}

/// Users whose GitHub id contains `query`, ignoring case.
pub fn filter_by_github_id(users: &[DirectoryUser], query: &str) -> Vec<DirectoryUser> {
    let query = query.trim().to_lowercase();
    users
        .iter()
        .filter(|user| user.github_id.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

impl PaginatedList<UserDirectory> {
    /// Search the users loaded so far.
    pub fn filter_by_github_id(&self, query: &str) -> Vec<DirectoryUser> {
        filter_by_github_id(self.snapshot().items(), query)
    }
}

//! # Synchronizers
//!
//! Client-side state kept in step with the backend.
//!
//! - **[`list`]**: pure paginated list state machine
//! - **[`paginated`]**: async driver with infinite-scroll trigger
//! - **[`feeds`]**: leaderboard, wallet history and user directory sources
//! - **[`poller`]**: balance refresh loop bound to the session lifecycle

pub mod feeds;
pub mod list;
pub mod paginated;
pub mod poller;

pub use feeds::{filter_by_github_id, LeaderboardFeed, UserDirectory, WalletHistoryFeed};
pub use list::{Applied, FetchKind, FetchTicket, Keyed, ListPage, ListState};
pub use paginated::{PaginatedList, Sentinel, SentinelGeometry};
pub use poller::{BalancePoller, PollHandle};

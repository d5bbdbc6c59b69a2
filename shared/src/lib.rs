//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the DMC client and the remote
//! DaemaCoin API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: XQUARE login, GitHub registration, user records
//!   - **[`dto::wallet`]**: Balance, coin history, transfers
//!   - **[`dto::leaderboard`]**: Ranked accounts
//!   - **[`dto::users`]**: Paginated user directory
//!   - **[`dto::store`]**: Festival stores, products and orders
//! - **[`utils`]**: Shared display helpers
//!
//! ## Wire Format
//!
//! The remote service speaks **camelCase** JSON, so every DTO carries
//! `#[serde(rename_all = "camelCase")]`. Optional fields are omitted from
//! serialized requests when `None`, and default when missing from responses.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::leaderboard::LeaderboardResponse;
//!
//! let body = r#"{
//!     "items": [{"rank": 1, "profileImageUrl": "", "totalCoins": 120, "githubId": "octo"}],
//!     "currentPage": 0, "pageSize": 10, "totalUsers": 1,
//!     "totalPages": 1, "hasNext": false, "hasPrevious": false
//! }"#;
//! let page: LeaderboardResponse = serde_json::from_str(body).unwrap();
//! assert_eq!(page.items[0].github_id, "octo");
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;

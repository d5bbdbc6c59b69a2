//! # Data Transfer Objects (DTOs)
//!
//! All data structures exchanged with the DaemaCoin REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - XQUARE login, GitHub registration, user and profile records
//! - [`wallet`] - Wallet balance, coin history and transfers
//! - [`leaderboard`] - Leaderboard pages
//! - [`users`] - User directory pages
//! - [`store`] - Festival store, product and order payloads
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase on the wire (`#[serde(rename_all = "camelCase")]`)
//! - **Optional fields**: omitted when `None`, defaulted when absent
//! - **Enums**: SCREAMING_CASE strings (`"PENDING"`, `"COMPLETED"`)
//! - **Identifiers**: the backend mixes numeric and string ids, so id fields
//!   are decoded through [`id_string`] into a `String`
//!
//! ## Example JSON Communication
//!
//! ```text
//! GET /leaderboard?page=0&limit=10
//! Authorization: Bearer eyJhbGciOi...
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "items": [{ "rank": 1, "profileImageUrl": "https://...", "totalCoins": 15420, "githubId": "coding-master" }],
//!   "currentPage": 0,
//!   "pageSize": 10,
//!   "totalUsers": 57,
//!   "totalPages": 6,
//!   "hasNext": true,
//!   "hasPrevious": false
//! }
//! ```

pub mod auth;
pub mod leaderboard;
pub mod store;
pub mod users;
pub mod wallet;

pub use auth::*;
pub use leaderboard::*;
pub use store::*;
pub use users::*;
pub use wallet::*;

/// Deserialize an identifier that may arrive as a JSON string or number.
pub mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawId::deserialize(deserializer) {
            Ok(RawId::Text(s)) => Ok(s),
            Ok(RawId::Unsigned(n)) => Ok(n.to_string()),
            Ok(RawId::Signed(n)) => Ok(n.to_string()),
            Err(_) => Err(de::Error::custom("expected a string or integer id")),
        }
    }

    pub fn serialize<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(id)
    }
}

/// Error payload returned by the API on non-2xx responses.
///
/// Different endpoints use `message` or `error`; either may be missing.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// The user-facing message, preferring `message` over `error`.
    pub fn best_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

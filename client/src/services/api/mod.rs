//! # DaemaCoin API
//!
//! Typed accessors for every backend endpoint the client uses, grouped by
//! concern. Each accessor is a free function over [`ApiClient`]; the client
//! also implements the [`crate::core::service`] traits by delegating to them.
//!
//! - **[`auth`]**: XQUARE login, GitHub registration, profile
//! - **[`wallet`]**: balance, history, today's mining, transfers
//! - **[`leaderboard`]**: leaderboard and user directory pages
//! - **[`store`]**: festival store owner and kiosk calls

pub mod auth;
pub mod client;
pub mod leaderboard;
pub mod store;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use client::ApiClient;

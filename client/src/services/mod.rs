//! # Services
//!
//! - **[`session`]**: the shared [`session::SessionContext`]
//! - **[`api`]**: HTTP client and endpoint accessors

pub mod api;
pub mod session;

//! # DaemaCoin Client - Library Root
//!
//! Headless client for the DaemaCoin (DMC) commit-mining service. Coin
//! accounting, mining rewards, ranking and order processing all happen on
//! the backend; this crate keeps a local, typed view of that state and
//! proxies user actions to it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  app        login, transfer wizard, kiosk, store     │
//! ├──────────────────────────────────────────────────────┤
//! │  sync       paginated lists, balance poller          │
//! ├──────────────────────────────────────────────────────┤
//! │  services   ApiClient + accessors, SessionContext    │
//! ├──────────────────────────────────────────────────────┤
//! │  core       ApiError / AppError, service traits      │
//! └──────────────────────────────────────────────────────┘
//!          │ HTTPS + JSON (bearer token)
//!          ▼
//!   DaemaCoin API
//! ```
//!
//! ## Module Structure
//!
//! - **core**: error taxonomy and the dependency-injection traits
//! - **config**: [`config::ClientConfig`] from environment variables
//! - **debug**: `tracing` subscriber setup
//! - **services**: HTTP client, endpoint accessors, session context
//! - **sync**: infinite-scroll lists and the balance poller
//! - **app**: view-state machines of the client screens
//!
//! ## Session Lifecycle
//!
//! One [`services::session::SessionContext`] is created at start-up and
//! shared by `Arc`. The API client reads the bearer token from it on every
//! request and expires it on HTTP 401/403. The balance poller follows its
//! authenticated flag:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dmc_client::config::ClientConfig;
//! use dmc_client::services::{api::ApiClient, session::SessionContext};
//! use dmc_client::sync::BalancePoller;
//!
//! # async fn run() -> dmc_client::core::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let session = Arc::new(SessionContext::new());
//! let api = Arc::new(ApiClient::new(&config, session.clone())?);
//!
//! let poller = BalancePoller::new(api.clone(), session.clone(), config.poll_interval);
//! poller.supervise();
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod sync;

pub use config::ClientConfig;
pub use crate::core::error::{ApiError, AppError, Result};
pub use services::api::ApiClient;
pub use services::session::{SessionContext, SessionEvent};

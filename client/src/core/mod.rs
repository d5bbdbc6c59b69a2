//! # Core Abstractions
//!
//! Error types and service traits shared by every other module.
//!
//! - **[`error`]**: [`ApiError`] (remote failures) and [`AppError`] (flow failures)
//! - **[`service`]**: dependency-injection traits ([`ApiService`], [`StoreService`],
//!   [`BalanceSource`], [`PageSource`])
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dmc_client::core::service::ApiService;
//! use dmc_client::services::{api::ApiClient, session::SessionContext};
//! use dmc_client::config::ClientConfig;
//!
//! let session = Arc::new(SessionContext::new());
//! let api: Arc<dyn ApiService> =
//!     Arc::new(ApiClient::new(&ClientConfig::default(), session).unwrap());
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result};
pub use service::{ApiService, BalanceSource, PageSource, StoreService};

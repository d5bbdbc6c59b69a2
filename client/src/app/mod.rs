//! # Application Flows
//!
//! View-state machines behind the client's screens. Each flow talks to the
//! backend only through the [`crate::core::service`] traits.
//!
//! - **[`auth`]**: XQUARE login, GitHub registration, logout
//! - **[`transfer`]**: coin transfer wizard
//! - **[`kiosk`]**: festival kiosk cart and QR checkout
//! - **[`store`]**: festival store owner dashboard

pub mod auth;
pub mod kiosk;
pub mod store;
pub mod transfer;

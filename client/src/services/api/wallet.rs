//! # Wallet Endpoints
//!
//! Balance, coin history, today's mining total and transfers.

use shared::{TodayMinedResponse, TransferRequest, TransferResponse, WalletHistoryResponse, WalletInfo};

use super::client::{ApiClient, Auth};
use crate::core::error::ApiError;

/// Get the signed-in user's balance.
pub async fn get_wallet_info(client: &ApiClient) -> Result<WalletInfo, ApiError> {
    client
        .get_json(&["wallet"], &[], Auth::Session, "Failed to fetch wallet information")
        .await
}

/// Get one page of coin history (0-based).
pub async fn get_wallet_history(client: &ApiClient, page: u32) -> Result<WalletHistoryResponse, ApiError> {
    client
        .get_json(
            &["coin", "history"],
            &[("page", page.to_string())],
            Auth::Session,
            "Failed to fetch wallet history",
        )
        .await
}

/// Get the number of coins mined today.
pub async fn get_today_mined(client: &ApiClient) -> Result<TodayMinedResponse, ApiError> {
    client
        .get_json(&["coin", "today-mined"], &[], Auth::Session, "Failed to fetch today's mined coins")
        .await
}

/// Send `amount` coins to user `to`.
#[tracing::instrument(skip(client))]
pub async fn transfer_coin(client: &ApiClient, to: String, amount: f64) -> Result<TransferResponse, ApiError> {
    let result = client
        .post_json(&["coin", "transfer"], &TransferRequest { to, amount }, Auth::Session, "Transfer failed")
        .await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Transfer rejected");
    }
    result
}

use serde::{Deserialize, Serialize};

/// Wallet balance (`GET /wallet`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub owner: String,
    pub balance: f64,
}

/// Kind of coin movement recorded in the wallet history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Mining,
    Bonus,
    Penalty,
    Transfer,
    Purchase,
    #[serde(other)]
    Other,
}

/// One entry of `GET /coin/history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletHistoryItem {
    #[serde(with = "super::id_string")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Page of wallet history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletHistoryResponse {
    pub history: Vec<WalletHistoryItem>,
    pub has_more: bool,
    #[serde(default)]
    pub total_count: u64,
    pub current_page: u32,
}

/// Coins mined today across the service (`GET /coin/today-mined`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodayMinedResponse {
    #[serde(alias = "todayMined", alias = "todayMinedCoins", alias = "amount")]
    pub total: f64,
}

/// Coin transfer request (`POST /coin/transfer`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Recipient user id.
    pub to: String,
    pub amount: f64,
}

/// Coin transfer acknowledgement. The backend returns a loose object;
/// every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_item_tolerates_unknown_kind_and_numeric_id() {
        let item: WalletHistoryItem = serde_json::from_str(
            r#"{"id": 7, "type": "airdrop", "amount": 25, "createdAt": "2025-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.kind, Some(TransactionKind::Other));
        assert_eq!(item.description, "");
    }

    #[test]
    fn today_mined_accepts_aliases() {
        let a: TodayMinedResponse = serde_json::from_str(r#"{"todayMined": 310}"#).unwrap();
        let b: TodayMinedResponse = serde_json::from_str(r#"{"total": 12.5}"#).unwrap();
        assert_eq!(a.total, 310.0);
        assert_eq!(b.total, 12.5);
    }
}

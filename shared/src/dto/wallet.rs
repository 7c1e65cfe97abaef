//! # Wallet DTOs
//!
//! Balance snapshot, transaction history, top-up/withdraw requests and the
//! monthly summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wallet balance snapshot. Always replaced wholesale, never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub balance: f64,
    #[serde(default)]
    pub pending_balance: f64,
    #[serde(default)]
    pub total_earned: f64,
    #[serde(default)]
    pub total_spent: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Credit,
    Debit,
    Topup,
    Withdrawal,
    EnergyPurchase,
    EnergySale,
    Investment,
    Payout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
            TransactionType::Topup => "topup",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::EnergyPurchase => "energy_purchase",
            TransactionType::EnergySale => "energy_sale",
            TransactionType::Investment => "investment",
            TransactionType::Payout => "payout",
        }
    }

    /// Money flowing into the wallet
    pub fn is_inflow(&self) -> bool {
        matches!(
            self,
            TransactionType::Credit
                | TransactionType::Topup
                | TransactionType::EnergySale
                | TransactionType::Payout
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

/// Ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign of its direction (inflow positive).
    pub fn signed_amount(&self) -> f64 {
        if self.kind.is_inflow() {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// Payload of `GET /wallet/balance`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalancePayload {
    pub wallet: WalletSnapshot,
    #[serde(default)]
    pub pending_transactions: Vec<Transaction>,
    #[serde(default)]
    pub recent_activity: Vec<Transaction>,
}

/// History filters. An all-`None` value means "everything".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilters {
    pub fn by_kind(kind: TransactionType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Query-string pairs for the set filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.to_string()));
        }
        pairs
    }
}

/// Top-up request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopupRequest {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl TopupRequest {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            payment_method: None,
        }
    }
}

/// Top-up response. `payment_url` is set when the payment must be completed
/// in an external checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<String>,
}

impl WithdrawRequest {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            bank_account_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Week,
    #[default]
    Month,
    Year,
}

impl SummaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
            SummaryPeriod::Year => "year",
        }
    }
}

/// Aggregate over a period, computed server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_credits: f64,
    pub total_debits: f64,
    pub net_change: f64,
    pub transaction_count: u32,
    #[serde(default)]
    pub energy_purchases: f64,
    #[serde(default)]
    pub energy_sales: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_wire_names() {
        let json = serde_json::to_string(&TransactionType::EnergyPurchase).unwrap();
        assert_eq!(json, "\"energy_purchase\"");

        let tx: Transaction = serde_json::from_str(
            r#"{"id":"t1","type":"credit","amount":50.0,"status":"completed","createdAt":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Credit);
        assert_eq!(tx.signed_amount(), 50.0);
    }

    #[test]
    fn test_filter_query_pairs() {
        let filters = TransactionFilters {
            kind: Some(TransactionType::Debit),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..TransactionFilters::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("type", "debit".to_string()),
                ("startDate", "2024-05-01".to_string())
            ]
        );
        assert!(TransactionFilters::default().query_pairs().is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a transaction, fixed at creation. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Outcome,
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxType::Income => write!(f, "income"),
            TxType::Outcome => write!(f, "outcome"),
        }
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxType::Income),
            "outcome" => Ok(TxType::Outcome),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

/// Lifecycle status. Only forward transitions are legal (pending -> confirmed),
/// and the promotion happens at most once per row. `Failed` is a terminal value
/// kept for the schema; nothing currently transitions into it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Confirmed => write!(f, "confirmed"),
            TxStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TxStatus::Pending),
            "confirmed" => Ok(TxStatus::Confirmed),
            "failed" => Ok(TxStatus::Failed),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}

/// Where a transaction entered the system. Manual entries represent
/// already-settled real-world events and are inserted confirmed; API sends
/// start pending and are promoted by the confirmation service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxSource {
    Manual,
    Api,
}

impl TxSource {
    pub fn initial_status(&self) -> TxStatus {
        match self {
            TxSource::Manual => TxStatus::Confirmed,
            TxSource::Api => TxStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub token: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub from_address: String,
    pub to_address: String,
    pub tx_hash: String,
    /// Network fee in USD. Native-unit fees exist only in previews.
    pub fee: f64,
    pub explorer_link: String,
    pub status: TxStatus,
}

/// Input for recording an incoming transfer.
#[derive(Debug, Clone)]
pub struct NewIncome {
    pub token_id: i64,
    pub amount_usd: f64,
    pub date: DateTime<Utc>,
    pub from_address: String,
    pub tx_hash: Option<String>,
    pub fee_usd: f64,
    pub explorer_link: Option<String>,
    pub source: TxSource,
}

/// Input for recording an outgoing transfer.
#[derive(Debug, Clone)]
pub struct NewOutcome {
    pub token_id: i64,
    pub amount_usd: f64,
    pub to_address: String,
    pub tx_hash: Option<String>,
    pub fee_usd: f64,
    pub explorer_link: Option<String>,
    pub source: TxSource,
}

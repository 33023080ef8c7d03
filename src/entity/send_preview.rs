use serde::{Deserialize, Serialize};

/// Dry-run computation shown before committing a send. Producing one never
/// writes to the store and may be repeated any number of times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendPreview {
    pub token_id: i64,
    pub symbol: String,
    pub name: String,
    pub network: String,
    pub from_address: String,
    pub to_address: String,
    /// Amount the caller asked to send, USD.
    pub requested_usd: f64,
    /// Amount that will actually be sent, USD. Differs from `requested_usd`
    /// when the naive amount plus fee would overdraw the balance.
    pub final_send_usd: f64,
    pub was_adjusted: bool,
    pub fee_usd: f64,
    /// Fee converted into the network's native coin, when a spot price was
    /// obtainable.
    pub fee_native: Option<f64>,
    pub fee_currency: String,
    pub total_debit_usd: f64,
    pub balance_usd: f64,
}

use chrono::{DateTime, Utc};

/// Dialogue state for the operator flows. Draft values only live here until
/// the final confirmation step; cancelling the dialogue discards them without
/// touching the store.
#[derive(Clone, Default, Debug)]
pub enum State {
    #[default]
    Start,

    // Income entry flow
    AwaitingIncomeAmount {
        token_id: i64,
    },
    AwaitingIncomeDate {
        token_id: i64,
        amount: f64,
    },
    AwaitingIncomeFromAddress {
        token_id: i64,
        amount: f64,
        date: DateTime<Utc>,
    },
    AwaitingIncomeTxHash {
        token_id: i64,
        amount: f64,
        date: DateTime<Utc>,
        from_address: String,
    },
    AwaitingIncomeFee {
        token_id: i64,
        amount: f64,
        date: DateTime<Utc>,
        from_address: String,
        tx_hash: Option<String>,
    },

    // Outgoing transfer flow
    AwaitingSendAmount {
        token_id: i64,
    },
    AwaitingSendAddress {
        token_id: i64,
        amount: f64,
    },
    AwaitingSendConfirmation {
        token_id: i64,
        amount: f64,
        to_address: String,
        fee_usd: f64,
    },

    // Token management
    AwaitingTokenAddress {
        token_id: i64,
    },
}

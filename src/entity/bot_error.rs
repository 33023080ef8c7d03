#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid address format")]
    InvalidAddress,

    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Token not found")]
    TokenNotFound,

    #[error("Symbol '{symbol}' is ambiguous, specify one of: {variants}")]
    AmbiguousSymbol { symbol: String, variants: String },

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Insufficient funds: maximum sendable amount is {max_sendable:.2} USD")]
    InsufficientFunds { max_sendable: f64 },

    #[error("Destination address matches the wallet's own address")]
    SelfTransfer,

    #[error("Price provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("This token is locked and cannot be toggled")]
    TokenLocked,
}

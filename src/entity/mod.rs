mod bot_error;
mod send_preview;
mod state;
mod token;
mod transaction;

pub use bot_error::WalletError;
pub use send_preview::SendPreview;
pub use state::State;
pub use token::Token;
pub use transaction::{NewIncome, NewOutcome, Transaction, TxSource, TxStatus, TxType};

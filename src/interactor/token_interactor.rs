use crate::entity::{Token, WalletError};
use crate::interactor::db;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Known symbol aliases: external callers use exchange-style tickers that
/// differ from the canonical ledger symbols.
const SYMBOL_ALIASES: &[(&str, &str)] = &[("pol", "matic"), ("trx", "tron")];

/// Symbols that exist only as per-network variants. A bare lookup must fail
/// with the list of candidates instead of silently picking one.
const AMBIGUOUS_SYMBOLS: &[(&str, &str)] =
    &[("usdt", "usdt_erc20, usdt_trc20, usdt_bep20")];

#[async_trait]
pub trait TokenInteractor: Send + Sync {
    async fn list_tokens(&self) -> Result<Vec<Token>, WalletError>;
    async fn get_token(&self, token_id: i64) -> Result<Token, WalletError>;
    async fn find_token_by_symbol(&self, symbol: &str) -> Result<Token, WalletError>;
    async fn set_enabled(&self, token_id: i64, enabled: bool) -> Result<(), WalletError>;
    async fn set_address(&self, token_id: i64, address: &str) -> Result<(), WalletError>;
    async fn reset_all(&self) -> Result<(), WalletError>;
}

pub struct TokenInteractorImpl {
    db_pool: Arc<SqlitePool>,
}

impl TokenInteractorImpl {
    pub fn new(db_pool: Arc<SqlitePool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TokenInteractor for TokenInteractorImpl {
    async fn list_tokens(&self) -> Result<Vec<Token>, WalletError> {
        Ok(db::get_tokens(&self.db_pool).await?)
    }

    async fn get_token(&self, token_id: i64) -> Result<Token, WalletError> {
        db::get_token_by_id(&self.db_pool, token_id)
            .await?
            .ok_or(WalletError::TokenNotFound)
    }

    async fn find_token_by_symbol(&self, symbol: &str) -> Result<Token, WalletError> {
        let lookup = symbol.trim().to_lowercase();
        if lookup.is_empty() {
            return Err(WalletError::EmptyField("symbol"));
        }

        if let Some((_, variants)) = AMBIGUOUS_SYMBOLS.iter().find(|(s, _)| *s == lookup) {
            return Err(WalletError::AmbiguousSymbol {
                symbol: lookup,
                variants: variants.to_string(),
            });
        }

        let canonical = SYMBOL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lookup)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(lookup);

        db::get_token_by_symbol(&self.db_pool, &canonical)
            .await?
            .ok_or(WalletError::TokenNotFound)
    }

    async fn set_enabled(&self, token_id: i64, enabled: bool) -> Result<(), WalletError> {
        let token = self.get_token(token_id).await?;

        if token.locked {
            return Err(WalletError::TokenLocked);
        }
        if token.enabled == enabled {
            return Ok(());
        }

        db::set_token_enabled(&self.db_pool, token_id, enabled).await?;
        Ok(())
    }

    async fn set_address(&self, token_id: i64, address: &str) -> Result<(), WalletError> {
        let address = address.trim();
        if !crate::utils::validate_crypto_address(address) {
            return Err(WalletError::InvalidAddress);
        }

        let token = self.get_token(token_id).await?;
        if token.address == address {
            return Ok(());
        }

        db::set_token_address(&self.db_pool, token_id, address).await?;
        Ok(())
    }

    async fn reset_all(&self) -> Result<(), WalletError> {
        Ok(db::reset_all(&self.db_pool).await?)
    }
}

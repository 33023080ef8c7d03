use crate::entity::{NewOutcome, SendPreview, Token, Transaction, TxType, WalletError};
use crate::interactor::db;
use crate::pricing::{fee_currency_for, FeeService, PriceService};
use crate::utils;
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sqlx::SqlitePool;
use std::sync::Arc;

#[async_trait]
pub trait SendInteractor: Send + Sync {
    /// Dry-run the total-debit arithmetic for a send. Never writes; callable
    /// any number of times before the operator commits.
    async fn preview_send(
        &self,
        token_id: i64,
        amount_usd: f64,
        to_address: &str,
    ) -> Result<SendPreview, WalletError>;

    /// Commit an outgoing transfer: conditional debit of amount + fee plus
    /// the transaction insert, in one unit of work. Refusals carry the
    /// maximum sendable amount so the caller can offer a corrected retry.
    async fn confirm_send(&self, outcome: NewOutcome) -> Result<Transaction, WalletError>;
}

pub struct SendInteractorImpl {
    db_pool: Arc<SqlitePool>,
    fee_service: Arc<dyn FeeService + Send + Sync>,
    price_service: Arc<dyn PriceService + Send + Sync>,
}

impl SendInteractorImpl {
    pub fn new(
        db_pool: Arc<SqlitePool>,
        fee_service: Arc<dyn FeeService + Send + Sync>,
        price_service: Arc<dyn PriceService + Send + Sync>,
    ) -> Self {
        Self {
            db_pool,
            fee_service,
            price_service,
        }
    }

    fn validate_destination(token: &Token, to_address: &str) -> Result<(), WalletError> {
        if !utils::validate_crypto_address(to_address) {
            return Err(WalletError::InvalidAddress);
        }
        if !token.address.is_empty() && token.address == to_address {
            return Err(WalletError::SelfTransfer);
        }
        Ok(())
    }
}

#[async_trait]
impl SendInteractor for SendInteractorImpl {
    async fn preview_send(
        &self,
        token_id: i64,
        amount_usd: f64,
        to_address: &str,
    ) -> Result<SendPreview, WalletError> {
        if !amount_usd.is_finite() || amount_usd <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }

        let token = db::get_token_by_id(&self.db_pool, token_id)
            .await?
            .ok_or(WalletError::TokenNotFound)?;

        Self::validate_destination(&token, to_address)?;

        let fee_usd = self.fee_service.estimate_fee_usd(&token.symbol).await?;

        // Native conversion is display-only; a missing spot price must not
        // block the preview since the fee itself is denominated in USD.
        let fee_currency = fee_currency_for(&token.symbol);
        let fee_native = match self.price_service.spot_price_usd(&fee_currency).await {
            Ok(price) if price > 0.0 => Some(fee_usd / price),
            Ok(_) => None,
            Err(e) => {
                warn!("No spot price for {}: {}", fee_currency, e);
                None
            }
        };

        let total_debit = amount_usd + fee_usd;
        let (final_send_usd, was_adjusted) = if total_debit > token.balance {
            let max_sendable = token.balance - fee_usd;
            if max_sendable <= 0.0 {
                return Err(WalletError::InsufficientFunds {
                    max_sendable: max_sendable.max(0.0),
                });
            }
            (max_sendable, true)
        } else {
            (amount_usd, false)
        };

        Ok(SendPreview {
            token_id: token.id,
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            network: token.network.clone(),
            from_address: token.address.clone(),
            to_address: to_address.to_string(),
            requested_usd: amount_usd,
            final_send_usd,
            was_adjusted,
            fee_usd,
            fee_native,
            fee_currency,
            total_debit_usd: final_send_usd + fee_usd,
            balance_usd: token.balance,
        })
    }

    async fn confirm_send(&self, outcome: NewOutcome) -> Result<Transaction, WalletError> {
        if !outcome.amount_usd.is_finite() || outcome.amount_usd <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        if !outcome.fee_usd.is_finite() || outcome.fee_usd < 0.0 {
            return Err(WalletError::InvalidAmount);
        }

        let token = db::get_token_by_id(&self.db_pool, outcome.token_id)
            .await?
            .ok_or(WalletError::TokenNotFound)?;

        Self::validate_destination(&token, &outcome.to_address)?;

        let total_debit = outcome.amount_usd + outcome.fee_usd;
        let tx_hash = outcome.tx_hash.unwrap_or_else(utils::generate_tx_hash);
        let explorer_link = outcome.explorer_link.unwrap_or_default();
        let status = outcome.source.initial_status();

        let mut tx = self.db_pool.begin().await?;

        // Check-then-write as a single conditional statement inside the same
        // unit of work as the insert: no orphaned debit, no unbacked row.
        if !db::deduct_if_sufficient(&mut tx, token.id, total_debit).await? {
            tx.rollback().await?;

            let current = db::get_token_by_id(&self.db_pool, token.id)
                .await?
                .ok_or(WalletError::TokenNotFound)?;
            let max_sendable = (current.balance - outcome.fee_usd).max(0.0);

            return Err(WalletError::InsufficientFunds { max_sendable });
        }

        let tx_id = db::insert_transaction(
            &mut tx,
            &token.symbol,
            TxType::Outcome,
            outcome.amount_usd,
            Utc::now(),
            &token.address,
            &outcome.to_address,
            &tx_hash,
            outcome.fee_usd,
            &explorer_link,
            status,
        )
        .await?;

        tx.commit().await?;

        info!(
            "Outcome {} recorded for {}: -{:.2} USD (fee {:.2})",
            tx_id, token.symbol, outcome.amount_usd, outcome.fee_usd
        );

        db::get_transaction_by_id(&self.db_pool, tx_id)
            .await?
            .ok_or(WalletError::TransactionNotFound)
    }
}

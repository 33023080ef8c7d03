use crate::entity::{NewIncome, Transaction, TxType, WalletError};
use crate::interactor::db;
use crate::utils;
use async_trait::async_trait;
use log::info;
use sqlx::SqlitePool;
use std::sync::Arc;

#[async_trait]
pub trait IncomeInteractor: Send + Sync {
    /// Record an incoming transfer: insert the transaction row and credit the
    /// token balance as one unit of work.
    async fn create_income(&self, income: NewIncome) -> Result<Transaction, WalletError>;
}

pub struct IncomeInteractorImpl {
    db_pool: Arc<SqlitePool>,
}

impl IncomeInteractorImpl {
    pub fn new(db_pool: Arc<SqlitePool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl IncomeInteractor for IncomeInteractorImpl {
    async fn create_income(&self, income: NewIncome) -> Result<Transaction, WalletError> {
        if !income.amount_usd.is_finite() || income.amount_usd <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        if !income.fee_usd.is_finite() || income.fee_usd < 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        if !utils::validate_crypto_address(&income.from_address) {
            return Err(WalletError::InvalidAddress);
        }

        let token = db::get_token_by_id(&self.db_pool, income.token_id)
            .await?
            .ok_or(WalletError::TokenNotFound)?;

        let tx_hash = income
            .tx_hash
            .unwrap_or_else(utils::generate_tx_hash);
        let explorer_link = income.explorer_link.unwrap_or_default();
        let status = income.source.initial_status();

        let mut tx = self.db_pool.begin().await?;

        let tx_id = db::insert_transaction(
            &mut tx,
            &token.symbol,
            TxType::Income,
            income.amount_usd,
            income.date,
            &income.from_address,
            &token.address,
            &tx_hash,
            income.fee_usd,
            &explorer_link,
            status,
        )
        .await?;

        db::adjust_balance(&mut tx, token.id, income.amount_usd).await?;

        tx.commit().await?;

        info!(
            "Income {} recorded for {}: +{:.2} USD",
            tx_id, token.symbol, income.amount_usd
        );

        db::get_transaction_by_id(&self.db_pool, tx_id)
            .await?
            .ok_or(WalletError::TransactionNotFound)
    }
}

use crate::entity::{Token, Transaction, TxStatus, TxType};
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{Error as SqlxError, SqliteConnection, SqlitePool};

// ======= Token ledger =======

pub async fn get_tokens(pool: &SqlitePool) -> Result<Vec<Token>, SqlxError> {
    let tokens = sqlx::query_as::<_, Token>("SELECT * FROM tokens ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(tokens)
}

pub async fn get_token_by_id(pool: &SqlitePool, token_id: i64) -> Result<Option<Token>, SqlxError> {
    let token = sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE id = ?")
        .bind(token_id)
        .fetch_optional(pool)
        .await?;

    Ok(token)
}

pub async fn get_token_by_symbol(
    pool: &SqlitePool,
    symbol: &str,
) -> Result<Option<Token>, SqlxError> {
    let token = sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE symbol = ?")
        .bind(symbol)
        .fetch_optional(pool)
        .await?;

    Ok(token)
}

/// Toggle a token's visibility. Locked system coins are excluded by the
/// predicate, so the call reports whether anything actually changed.
pub async fn set_token_enabled(
    pool: &SqlitePool,
    token_id: i64,
    enabled: bool,
) -> Result<bool, SqlxError> {
    let result = sqlx::query("UPDATE tokens SET enabled = ? WHERE id = ? AND locked = 0")
        .bind(enabled)
        .bind(token_id)
        .execute(pool)
        .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        info!("Token {} enabled set to {}", token_id, enabled);
    }

    Ok(changed)
}

pub async fn set_token_address(
    pool: &SqlitePool,
    token_id: i64,
    address: &str,
) -> Result<bool, SqlxError> {
    let result = sqlx::query("UPDATE tokens SET address = ? WHERE id = ?")
        .bind(address)
        .bind(token_id)
        .execute(pool)
        .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        info!("Token {} address updated", token_id);
    }

    Ok(changed)
}

// ======= Balance mutation =======
//
// These are the only writes that touch `tokens.balance`. Both run on a
// caller-supplied connection so a debit or credit always commits (or rolls
// back) together with its justifying transaction row.

pub async fn adjust_balance(
    conn: &mut SqliteConnection,
    token_id: i64,
    delta: f64,
) -> Result<(), SqlxError> {
    sqlx::query("UPDATE tokens SET balance = balance + ? WHERE id = ?")
        .bind(delta)
        .bind(token_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Conditional debit: leaves the balance untouched and returns false when the
/// amount exceeds it. The check and the write are a single statement, so two
/// racing debits against the same token serialize at the storage engine and
/// can never jointly overdraw.
pub async fn deduct_if_sufficient(
    conn: &mut SqliteConnection,
    token_id: i64,
    amount: f64,
) -> Result<bool, SqlxError> {
    let result =
        sqlx::query("UPDATE tokens SET balance = balance - ? WHERE id = ? AND balance >= ?")
            .bind(amount)
            .bind(token_id)
            .bind(amount)
            .execute(conn)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Bulk reset: zero every balance, blank every address, disable unlocked
/// tokens and drop the whole history, all-or-nothing.
pub async fn reset_all(pool: &SqlitePool) -> Result<(), SqlxError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE tokens SET balance = 0, address = ''")
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE tokens SET enabled = 0 WHERE locked = 0")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM transactions")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("Wallet reset: balances zeroed, addresses cleared, history deleted");

    Ok(())
}

// ======= Transaction store =======

#[allow(clippy::too_many_arguments)]
pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    token_symbol: &str,
    tx_type: TxType,
    amount: f64,
    date: DateTime<Utc>,
    from_address: &str,
    to_address: &str,
    tx_hash: &str,
    fee: f64,
    explorer_link: &str,
    status: TxStatus,
) -> Result<i64, SqlxError> {
    let row = sqlx::query_scalar::<_, i64>(
        "INSERT INTO transactions \
         (token, type, amount, date, from_address, to_address, tx_hash, fee, explorer_link, status) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(token_symbol)
    .bind(tx_type)
    .bind(amount)
    .bind(date)
    .bind(from_address)
    .bind(to_address)
    .bind(tx_hash)
    .bind(fee)
    .bind(explorer_link)
    .bind(status)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

pub async fn get_transactions(
    pool: &SqlitePool,
    token_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Transaction>, SqlxError> {
    let transactions = if let Some(token) = token_filter {
        sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE token = ? ORDER BY date DESC LIMIT ? OFFSET ?",
        )
        .bind(token)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions ORDER BY date DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?
    };

    Ok(transactions)
}

pub async fn get_transaction_by_id(
    pool: &SqlitePool,
    tx_id: i64,
) -> Result<Option<Transaction>, SqlxError> {
    let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
        .bind(tx_id)
        .fetch_optional(pool)
        .await?;

    Ok(transaction)
}

pub async fn get_transaction_by_hash(
    pool: &SqlitePool,
    tx_hash: &str,
) -> Result<Option<Transaction>, SqlxError> {
    let transaction =
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE tx_hash = ?")
            .bind(tx_hash)
            .fetch_optional(pool)
            .await?;

    Ok(transaction)
}

pub async fn get_pending_transactions(pool: &SqlitePool) -> Result<Vec<Transaction>, SqlxError> {
    let transactions = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE status = ? ORDER BY id",
    )
    .bind(TxStatus::Pending)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// Promote a pending transaction to confirmed. The status predicate makes the
/// promotion idempotent: a second attempt matches no row and reports false.
pub async fn confirm_transaction(pool: &SqlitePool, tx_id: i64) -> Result<bool, SqlxError> {
    let result =
        sqlx::query("UPDATE transactions SET status = ? WHERE id = ? AND status = ?")
            .bind(TxStatus::Confirmed)
            .bind(tx_id)
            .bind(TxStatus::Pending)
            .execute(pool)
            .await?;

    let promoted = result.rows_affected() > 0;
    if promoted {
        info!("Transaction {} confirmed", tx_id);
    }

    Ok(promoted)
}

use crate::interactor::db;
use log::{debug, error, info, warn};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep};

const POLL_INTERVAL_SECS: u64 = 2;
const MIN_CONFIRM_DELAY_SECS: f64 = 5.0;
const MAX_CONFIRM_DELAY_SECS: f64 = 10.0;

/// Long-lived background loop promoting pending transactions to confirmed
/// after a randomized delay. State lives entirely in the store: rows still
/// pending at startup are simply picked up on the first poll cycle.
pub struct ConfirmationService {
    db_pool: Arc<SqlitePool>,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl ConfirmationService {
    pub fn new(db_pool: Arc<SqlitePool>) -> Self {
        Self {
            db_pool,
            stop_tx: None,
        }
    }

    // Start the background task that polls for pending transactions
    pub fn start(&mut self) {
        if self.stop_tx.is_some() {
            warn!("Confirmation service is already running");
            return;
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let pool = self.db_pool.clone();

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(POLL_INTERVAL_SECS));

            loop {
                select! {
                    _ = interval.tick() => {
                        if let Err(e) = Self::process_pending(&pool).await {
                            // Transient storage failures only cost us this
                            // cycle; the rows stay pending and are retried
                            error!("Error processing pending transactions: {}", e);
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping confirmation service");
                        break;
                    }
                }
            }
        });

        info!("Confirmation service started");
    }

    // Stop the background task
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Confirmation service stop signal sent");
        }
    }

    async fn process_pending(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let pending = db::get_pending_transactions(pool).await?;

        if pending.is_empty() {
            return Ok(());
        }

        debug!("Found {} pending transactions", pending.len());

        for tx in pending {
            let delay = {
                use rand::Rng;
                rand::rng().random_range(MIN_CONFIRM_DELAY_SECS..=MAX_CONFIRM_DELAY_SECS)
            };
            sleep(Duration::from_secs_f64(delay)).await;

            // Guarded update: if another observer already promoted this row,
            // the predicate no longer matches and this becomes a no-op
            match db::confirm_transaction(pool, tx.id).await {
                Ok(true) => info!("Transaction {} ({}) confirmed", tx.id, tx.tx_hash),
                Ok(false) => debug!("Transaction {} already confirmed, skipping", tx.id),
                Err(e) => error!("Failed to confirm transaction {}: {}", tx.id, e),
            }
        }

        Ok(())
    }
}

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use wallet_admin_bot::entity::{NewIncome, NewOutcome, TxSource, TxStatus, TxType, WalletError};
use wallet_admin_bot::interactor::db;
use wallet_admin_bot::interactor::{
    IncomeInteractor, IncomeInteractorImpl, SendInteractor, SendInteractorImpl, TokenInteractor,
    TokenInteractorImpl,
};
use wallet_admin_bot::pricing::{FeeService, PriceService};

const DEST: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
const SENDER: &str = "0xde709f2102306220921060314715629080e2fb77";

struct FixedFeeService(f64);

#[async_trait]
impl FeeService for FixedFeeService {
    async fn estimate_fee_usd(&self, _symbol: &str) -> Result<f64, WalletError> {
        Ok(self.0)
    }
}

struct FixedPriceService(f64);

#[async_trait]
impl PriceService for FixedPriceService {
    async fn spot_price_usd(&self, _symbol: &str) -> Result<f64, WalletError> {
        Ok(self.0)
    }
}

struct UnavailablePriceService;

#[async_trait]
impl PriceService for UnavailablePriceService {
    async fn spot_price_usd(&self, symbol: &str) -> Result<f64, WalletError> {
        Err(WalletError::ProviderUnavailable(format!(
            "no price for {}",
            symbol
        )))
    }
}

async fn test_pool() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    Arc::new(pool)
}

fn send_interactor(pool: Arc<SqlitePool>, fee_usd: f64) -> SendInteractorImpl {
    SendInteractorImpl::new(
        pool,
        Arc::new(FixedFeeService(fee_usd)),
        Arc::new(FixedPriceService(2000.0)),
    )
}

async fn credit(pool: &Arc<SqlitePool>, token_id: i64, amount: f64) {
    let income = IncomeInteractorImpl::new(pool.clone());
    income
        .create_income(NewIncome {
            token_id,
            amount_usd: amount,
            date: Utc::now(),
            from_address: SENDER.to_string(),
            tx_hash: None,
            fee_usd: 0.0,
            explorer_link: None,
            source: TxSource::Manual,
        })
        .await
        .expect("income");
}

async fn token_id_of(pool: &Arc<SqlitePool>, symbol: &str) -> i64 {
    db::get_token_by_symbol(pool, symbol)
        .await
        .unwrap()
        .expect("seeded token")
        .id
}

fn outcome(token_id: i64, amount: f64, fee: f64, source: TxSource) -> NewOutcome {
    NewOutcome {
        token_id,
        amount_usd: amount,
        to_address: DEST.to_string(),
        tx_hash: None,
        fee_usd: fee,
        explorer_link: None,
        source,
    }
}

#[tokio::test]
async fn balance_conservation_over_mixed_operations() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    let sender = send_interactor(pool.clone(), 0.0);

    credit(&pool, btc, 500.0).await;
    credit(&pool, btc, 250.0).await;

    sender
        .confirm_send(outcome(btc, 100.0, 5.0, TxSource::Manual))
        .await
        .unwrap();
    sender
        .confirm_send(outcome(btc, 40.0, 2.5, TxSource::Manual))
        .await
        .unwrap();

    let token = db::get_token_by_id(&pool, btc).await.unwrap().unwrap();
    // 500 + 250 - (100 + 5) - (40 + 2.5)
    assert!((token.balance - 602.5).abs() < 1e-9);
    assert!(token.balance >= 0.0);
}

#[tokio::test]
async fn insufficient_funds_boundary() {
    let pool = test_pool().await;
    let eth = token_id_of(&pool, "eth").await;
    let sender = send_interactor(pool.clone(), 5.0);

    credit(&pool, eth, 100.0).await;

    // 96 + 5 = 101 > 100: refused, with the deterministic alternative
    let err = sender
        .confirm_send(outcome(eth, 96.0, 5.0, TxSource::Manual))
        .await
        .unwrap_err();
    match err {
        WalletError::InsufficientFunds { max_sendable } => {
            assert!((max_sendable - 95.0).abs() < 1e-9)
        }
        other => panic!("expected InsufficientFunds, got {:?}", other),
    }

    // The refusal left no partial state
    let token = db::get_token_by_id(&pool, eth).await.unwrap().unwrap();
    assert!((token.balance - 100.0).abs() < 1e-9);
    let txs = db::get_transactions(&pool, None, 50, 0).await.unwrap();
    assert_eq!(txs.len(), 1); // only the income

    // 95 + 5 = exactly the balance: succeeds and drains to zero
    sender
        .confirm_send(outcome(eth, 95.0, 5.0, TxSource::Manual))
        .await
        .unwrap();
    let token = db::get_token_by_id(&pool, eth).await.unwrap().unwrap();
    assert!(token.balance.abs() < 1e-9);
}

#[tokio::test]
async fn preview_is_idempotent_and_side_effect_free() {
    let pool = test_pool().await;
    let bnb = token_id_of(&pool, "bnb").await;
    let sender = send_interactor(pool.clone(), 3.0);

    credit(&pool, bnb, 50.0).await;

    let first = sender.preview_send(bnb, 20.0, DEST).await.unwrap();
    for _ in 0..4 {
        let again = sender.preview_send(bnb, 20.0, DEST).await.unwrap();
        assert_eq!(again.final_send_usd, first.final_send_usd);
        assert_eq!(again.fee_usd, first.fee_usd);
        assert!(!again.was_adjusted);
    }

    let token = db::get_token_by_id(&pool, bnb).await.unwrap().unwrap();
    assert!((token.balance - 50.0).abs() < 1e-9);
    let txs = db::get_transactions(&pool, Some("bnb"), 50, 0).await.unwrap();
    assert_eq!(txs.len(), 1); // only the seeding income
}

#[tokio::test]
async fn preview_adjusts_overdrawing_amount() {
    let pool = test_pool().await;
    let bnb = token_id_of(&pool, "bnb").await;
    let sender = send_interactor(pool.clone(), 5.0);

    credit(&pool, bnb, 100.0).await;

    let preview = sender.preview_send(bnb, 200.0, DEST).await.unwrap();
    assert!(preview.was_adjusted);
    assert!((preview.final_send_usd - 95.0).abs() < 1e-9);
    assert!((preview.total_debit_usd - 100.0).abs() < 1e-9);

    // Fee alone exceeding the balance is an outright refusal
    let sender = send_interactor(pool.clone(), 150.0);
    let err = sender.preview_send(bnb, 10.0, DEST).await.unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
}

#[tokio::test]
async fn preview_survives_missing_spot_price() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    credit(&pool, btc, 100.0).await;

    let sender = SendInteractorImpl::new(
        pool.clone(),
        Arc::new(FixedFeeService(2.0)),
        Arc::new(UnavailablePriceService),
    );

    // Fee is canonically USD; the native conversion is display-only
    let preview = sender.preview_send(btc, 10.0, DEST).await.unwrap();
    assert_eq!(preview.fee_native, None);
    assert!((preview.fee_usd - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn confirmation_is_at_most_once_and_forward_only() {
    let pool = test_pool().await;
    let eth = token_id_of(&pool, "eth").await;
    let sender = send_interactor(pool.clone(), 0.0);

    credit(&pool, eth, 100.0).await;

    let tx = sender
        .confirm_send(outcome(eth, 10.0, 0.0, TxSource::Api))
        .await
        .unwrap();
    assert_eq!(tx.status, TxStatus::Pending);

    let pending = db::get_pending_transactions(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, tx.id);

    // First promotion wins, the second observes nothing to do
    assert!(db::confirm_transaction(&pool, tx.id).await.unwrap());
    assert!(!db::confirm_transaction(&pool, tx.id).await.unwrap());

    let stored = db::get_transaction_by_id(&pool, tx.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TxStatus::Confirmed);
    assert_eq!(stored.tx_type, TxType::Outcome);
    assert!(db::get_pending_transactions(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn source_determines_initial_status() {
    let pool = test_pool().await;
    let eth = token_id_of(&pool, "eth").await;
    let sender = send_interactor(pool.clone(), 0.0);

    credit(&pool, eth, 100.0).await;

    let manual = sender
        .confirm_send(outcome(eth, 10.0, 0.0, TxSource::Manual))
        .await
        .unwrap();
    assert_eq!(manual.status, TxStatus::Confirmed);

    let api = sender
        .confirm_send(outcome(eth, 10.0, 0.0, TxSource::Api))
        .await
        .unwrap();
    assert_eq!(api.status, TxStatus::Pending);
}

#[tokio::test]
async fn uncommitted_work_leaves_no_trace() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    credit(&pool, btc, 100.0).await;

    // Simulate a failure between the insert and the commit: the transaction
    // is dropped without committing and must roll both writes back
    {
        let mut tx = pool.begin().await.unwrap();
        db::insert_transaction(
            &mut tx,
            "btc",
            TxType::Outcome,
            40.0,
            Utc::now(),
            "",
            DEST,
            "0xdeadbeef",
            1.0,
            "",
            TxStatus::Pending,
        )
        .await
        .unwrap();
        db::adjust_balance(&mut tx, btc, -41.0).await.unwrap();
        // dropped here, never committed
    }

    let token = db::get_token_by_id(&pool, btc).await.unwrap().unwrap();
    assert!((token.balance - 100.0).abs() < 1e-9);
    assert!(db::get_transaction_by_hash(&pool, "0xdeadbeef")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn concurrent_debits_cannot_jointly_overdraw() {
    let pool = test_pool().await;
    let eth = token_id_of(&pool, "eth").await;
    credit(&pool, eth, 10.0).await;

    let a = Arc::new(send_interactor(pool.clone(), 0.0));
    let b = a.clone();

    let (ra, rb) = tokio::join!(
        {
            let a = a.clone();
            async move { a.confirm_send(outcome(eth, 6.0, 0.0, TxSource::Api)).await }
        },
        async move { b.confirm_send(outcome(eth, 6.0, 0.0, TxSource::Api)).await }
    );

    let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one debit may win");

    let failure = if ra.is_err() { ra } else { rb };
    assert!(matches!(
        failure.unwrap_err(),
        WalletError::InsufficientFunds { .. }
    ));

    let token = db::get_token_by_id(&pool, eth).await.unwrap().unwrap();
    assert!((token.balance - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn income_validation_rejects_before_any_write() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    let income = IncomeInteractorImpl::new(pool.clone());

    let err = income
        .create_income(NewIncome {
            token_id: btc,
            amount_usd: 0.0,
            date: Utc::now(),
            from_address: SENDER.to_string(),
            tx_hash: None,
            fee_usd: 0.0,
            explorer_link: None,
            source: TxSource::Manual,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount));

    let err = income
        .create_income(NewIncome {
            token_id: 9999,
            amount_usd: 10.0,
            date: Utc::now(),
            from_address: SENDER.to_string(),
            tx_hash: None,
            fee_usd: 0.0,
            explorer_link: None,
            source: TxSource::Manual,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::TokenNotFound));

    assert!(db::get_transactions(&pool, None, 50, 0)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn non_finite_and_negative_inputs_are_rejected() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    credit(&pool, btc, 100.0).await;

    let income = IncomeInteractorImpl::new(pool.clone());
    for (amount, fee) in [(f64::INFINITY, 0.0), (f64::NAN, 0.0), (10.0, -1.0), (10.0, f64::NAN)] {
        let err = income
            .create_income(NewIncome {
                token_id: btc,
                amount_usd: amount,
                date: Utc::now(),
                from_address: SENDER.to_string(),
                tx_hash: None,
                fee_usd: fee,
                explorer_link: None,
                source: TxSource::Manual,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount));
    }

    let sender = send_interactor(pool.clone(), 0.0);
    for (amount, fee) in [(f64::INFINITY, 0.0), (10.0, f64::INFINITY), (10.0, -1.0)] {
        let err = sender
            .confirm_send(outcome(btc, amount, fee, TxSource::Manual))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount));
    }
    let err = sender.preview_send(btc, f64::NAN, DEST).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount));

    // Nothing got past validation
    let token = db::get_token_by_id(&pool, btc).await.unwrap().unwrap();
    assert!((token.balance - 100.0).abs() < 1e-9);
    assert_eq!(db::get_transactions(&pool, None, 50, 0).await.unwrap().len(), 1);
}

#[tokio::test]
async fn token_address_updates_are_validated() {
    let pool = test_pool().await;
    let tokens = TokenInteractorImpl::new(pool.clone());
    let btc = token_id_of(&pool, "btc").await;

    // Multi-byte text passes naive byte-length checks but is not an address
    let bogus = format!("z{}", "п".repeat(16));
    let err = tokens.set_address(btc, &bogus).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAddress));

    tokens.set_address(btc, DEST).await.unwrap();
    let stored = tokens.get_token(btc).await.unwrap();
    assert_eq!(stored.address, DEST);
}

#[tokio::test]
async fn self_transfer_is_rejected() {
    let pool = test_pool().await;
    let btc = token_id_of(&pool, "btc").await;
    db::set_token_address(&pool, btc, DEST).await.unwrap();
    credit(&pool, btc, 100.0).await;

    let sender = send_interactor(pool.clone(), 0.0);
    let err = sender
        .confirm_send(outcome(btc, 10.0, 0.0, TxSource::Manual))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::SelfTransfer));
}

#[tokio::test]
async fn alias_resolution() {
    let pool = test_pool().await;
    let tokens = TokenInteractorImpl::new(pool.clone());

    let by_alias = tokens.find_token_by_symbol("pol").await.unwrap();
    let canonical = tokens.find_token_by_symbol("matic").await.unwrap();
    assert_eq!(by_alias.id, canonical.id);

    let trx = tokens.find_token_by_symbol("TRX").await.unwrap();
    assert_eq!(trx.symbol, "tron");

    // A bare usdt must never silently pick a network variant
    let err = tokens.find_token_by_symbol("usdt").await.unwrap_err();
    assert!(matches!(err, WalletError::AmbiguousSymbol { .. }));

    let variant = tokens.find_token_by_symbol("usdt_trc20").await.unwrap();
    assert_eq!(variant.symbol, "usdt_trc20");
}

#[tokio::test]
async fn locked_tokens_cannot_be_toggled() {
    let pool = test_pool().await;
    let tokens = TokenInteractorImpl::new(pool.clone());

    let btc = tokens.find_token_by_symbol("btc").await.unwrap();
    assert!(btc.locked);

    let err = tokens.set_enabled(btc.id, false).await.unwrap_err();
    assert!(matches!(err, WalletError::TokenLocked));

    let still = tokens.get_token(btc.id).await.unwrap();
    assert!(still.enabled);

    // Custom tokens toggle freely, and toggling is idempotent
    let ton = tokens.find_token_by_symbol("ton").await.unwrap();
    assert!(!ton.locked);
    tokens.set_enabled(ton.id, true).await.unwrap();
    tokens.set_enabled(ton.id, true).await.unwrap();
    assert!(tokens.get_token(ton.id).await.unwrap().enabled);
}

#[tokio::test]
async fn reset_all_is_a_full_atomic_wipe() {
    let pool = test_pool().await;
    let tokens = TokenInteractorImpl::new(pool.clone());

    let btc = token_id_of(&pool, "btc").await;
    let ton = tokens.find_token_by_symbol("ton").await.unwrap();

    credit(&pool, btc, 100.0).await;
    db::set_token_address(&pool, btc, DEST).await.unwrap();
    tokens.set_enabled(ton.id, true).await.unwrap();

    tokens.reset_all().await.unwrap();

    for token in tokens.list_tokens().await.unwrap() {
        assert_eq!(token.balance, 0.0);
        assert!(token.address.is_empty());
        if token.locked {
            assert!(token.enabled, "locked tokens stay enabled");
        } else {
            assert!(!token.enabled, "custom tokens are disabled");
        }
    }

    assert!(db::get_transactions(&pool, None, 50, 0)
        .await
        .unwrap()
        .is_empty());
}

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::interactor::income_interactor::{IncomeInteractor, IncomeInteractorImpl};
use crate::interactor::send_interactor::{SendInteractor, SendInteractorImpl};
use crate::interactor::token_interactor::{TokenInteractor, TokenInteractorImpl};
use crate::pricing::fee_service::{EstimatedFeeService, FeeService};
use crate::pricing::price_service::{BinancePriceService, PriceService};
use crate::pricing::PricingConfig;

/// ServiceContainer wires the storage handle and the domain services.
/// Everything downstream receives its dependencies from here, nothing
/// imports a module-level singleton.
pub struct ServiceContainer {
    db_pool: Arc<SqlitePool>,

    price_service: Arc<dyn PriceService + Send + Sync>,
    fee_service: Arc<dyn FeeService + Send + Sync>,

    token_interactor: Arc<dyn TokenInteractor + Send + Sync>,
    income_interactor: Arc<dyn IncomeInteractor + Send + Sync>,
    send_interactor: Arc<dyn SendInteractor + Send + Sync>,

    pricing_config: PricingConfig,
}

impl ServiceContainer {
    pub fn new(db_pool: Arc<SqlitePool>) -> Self {
        let pricing_config = PricingConfig::from_env();

        let price_service = Arc::new(BinancePriceService::new(pricing_config.clone()))
            as Arc<dyn PriceService + Send + Sync>;

        let fee_service = Arc::new(EstimatedFeeService::new(
            price_service.clone(),
            pricing_config.clone(),
        )) as Arc<dyn FeeService + Send + Sync>;

        let token_interactor = Arc::new(TokenInteractorImpl::new(db_pool.clone()))
            as Arc<dyn TokenInteractor + Send + Sync>;

        let income_interactor = Arc::new(IncomeInteractorImpl::new(db_pool.clone()))
            as Arc<dyn IncomeInteractor + Send + Sync>;

        let send_interactor = Arc::new(SendInteractorImpl::new(
            db_pool.clone(),
            fee_service.clone(),
            price_service.clone(),
        )) as Arc<dyn SendInteractor + Send + Sync>;

        Self {
            db_pool,
            price_service,
            fee_service,
            token_interactor,
            income_interactor,
            send_interactor,
            pricing_config,
        }
    }

    // Accessor methods

    pub fn db_pool(&self) -> Arc<SqlitePool> {
        self.db_pool.clone()
    }

    pub fn price_service(&self) -> Arc<dyn PriceService + Send + Sync> {
        self.price_service.clone()
    }

    pub fn fee_service(&self) -> Arc<dyn FeeService + Send + Sync> {
        self.fee_service.clone()
    }

    pub fn token_interactor(&self) -> Arc<dyn TokenInteractor + Send + Sync> {
        self.token_interactor.clone()
    }

    pub fn income_interactor(&self) -> Arc<dyn IncomeInteractor + Send + Sync> {
        self.income_interactor.clone()
    }

    pub fn send_interactor(&self) -> Arc<dyn SendInteractor + Send + Sync> {
        self.send_interactor.clone()
    }

    pub fn pricing_config(&self) -> PricingConfig {
        self.pricing_config.clone()
    }
}

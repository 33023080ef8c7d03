use crate::entity::WalletError;
use crate::pricing::config::PricingConfig;
use crate::pricing::price_service::PriceService;
use async_trait::async_trait;
use log::debug;
use rand::Rng;
use std::sync::Arc;

/// Typical network fee in the gas coin's native units, per gas coin.
const BASE_FEES_NATIVE: &[(&str, f64)] = &[
    ("eth", 0.001),
    ("bnb", 0.00025),
    ("tron", 5.0),
    ("matic", 0.05),
    ("btc", 0.00005),
    ("sol", 0.000005),
    ("ton", 0.05),
];

const MIN_FEE_USD: f64 = 0.05;
const MAX_FEE_USD: f64 = 25.0;

/// The coin that pays gas for a given ledger symbol.
pub fn gas_symbol_for(symbol: &str) -> &'static str {
    match symbol {
        "usdt_erc20" | "eth" => "eth",
        "usdt_bep20" | "bnb" | "twt" => "bnb",
        "usdt_trc20" | "tron" => "tron",
        "matic" | "pol" => "matic",
        "btc" => "btc",
        "sol" => "sol",
        "ton" => "ton",
        _ => "eth",
    }
}

/// Display ticker of the fee currency for a given ledger symbol.
pub fn fee_currency_for(symbol: &str) -> String {
    match symbol {
        "usdt_erc20" | "eth" => "ETH".to_string(),
        "usdt_bep20" | "bnb" => "BNB".to_string(),
        "usdt_trc20" | "tron" => "TRX".to_string(),
        "matic" | "pol" => "POL".to_string(),
        "twt" => "TWT".to_string(),
        other => other.to_uppercase(),
    }
}

/// USD gas-fee estimate per ledger symbol.
#[async_trait]
pub trait FeeService: Send + Sync {
    async fn estimate_fee_usd(&self, symbol: &str) -> Result<f64, WalletError>;
}

pub struct EstimatedFeeService {
    price_service: Arc<dyn PriceService + Send + Sync>,
    config: PricingConfig,
}

impl EstimatedFeeService {
    pub fn new(price_service: Arc<dyn PriceService + Send + Sync>, config: PricingConfig) -> Self {
        Self {
            price_service,
            config,
        }
    }
}

#[async_trait]
impl FeeService for EstimatedFeeService {
    async fn estimate_fee_usd(&self, symbol: &str) -> Result<f64, WalletError> {
        let gas = gas_symbol_for(&symbol.trim().to_lowercase());

        let base_native = BASE_FEES_NATIVE
            .iter()
            .find(|(s, _)| *s == gas)
            .map(|(_, fee)| *fee);

        let base_usd = match base_native {
            Some(base) => match self.price_service.spot_price_usd(gas).await {
                Ok(price) => base * price,
                Err(_) => self.config.default_fee_usd,
            },
            None => self.config.default_fee_usd,
        };

        // +/- 10% jitter so repeated estimates look like live gas markets
        let variation = rand::rng().random_range(0.9..=1.1);
        let fee_usd = (base_usd * variation).clamp(MIN_FEE_USD, MAX_FEE_USD);
        let fee_usd = (fee_usd * 10_000.0).round() / 10_000.0;

        debug!("Estimated fee for {} ({} gas): {:.4} USD", symbol, gas, fee_usd);
        Ok(fee_usd)
    }
}

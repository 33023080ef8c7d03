use crate::entity::WalletError;
use crate::pricing::config::PricingConfig;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Binance spot pairs for the coins the wallet knows about. Symbols without a
/// pair have no obtainable price and callers must handle that outcome.
const BINANCE_PAIRS: &[(&str, &str)] = &[
    ("bnb", "BNBUSDT"),
    ("btc", "BTCUSDT"),
    ("eth", "ETHUSDT"),
    ("matic", "MATICUSDT"),
    ("tron", "TRXUSDT"),
    ("sol", "SOLUSDT"),
    ("ton", "TONUSDT"),
    ("twt", "TWTBUSD"),
];

/// USD spot price per symbol. `Err(ProviderUnavailable)` is a first-class
/// outcome: prices are not always obtainable and the core never assumes
/// otherwise.
#[async_trait]
pub trait PriceService: Send + Sync {
    async fn spot_price_usd(&self, symbol: &str) -> Result<f64, WalletError>;
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

pub struct BinancePriceService {
    client: reqwest::Client,
    config: PricingConfig,
}

impl BinancePriceService {
    pub fn new(config: PricingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.price_timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn pair_for(symbol: &str) -> Option<&'static str> {
        let canonical = match symbol {
            "pol" => "matic",
            "trx" => "tron",
            other => other,
        };

        BINANCE_PAIRS
            .iter()
            .find(|(s, _)| *s == canonical)
            .map(|(_, pair)| *pair)
    }
}

#[async_trait]
impl PriceService for BinancePriceService {
    async fn spot_price_usd(&self, symbol: &str) -> Result<f64, WalletError> {
        let symbol = symbol.trim().to_lowercase();

        // Stablecoin variants are pegged by definition
        if symbol == "usdt" || symbol.starts_with("usdt_") {
            return Ok(1.0);
        }

        let pair = Self::pair_for(&symbol).ok_or_else(|| {
            WalletError::ProviderUnavailable(format!("no market pair for {}", symbol))
        })?;

        let url = format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.config.binance_api_url, pair
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::ProviderUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(WalletError::ProviderUnavailable(format!(
                "ticker {} returned {}",
                pair,
                resp.status()
            )));
        }

        let ticker: TickerPrice = resp
            .json()
            .await
            .map_err(|e| WalletError::ProviderUnavailable(e.to_string()))?;

        let price = ticker
            .price
            .parse::<f64>()
            .map_err(|e| WalletError::ProviderUnavailable(e.to_string()))?;

        debug!("Spot price for {}: {} USD", symbol, price);
        Ok(price)
    }
}

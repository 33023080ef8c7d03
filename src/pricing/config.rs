/// Price/fee provider configuration
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Base URL of the Binance public market-data API
    pub binance_api_url: String,

    /// Timeout for ticker lookups, seconds
    pub price_timeout_secs: u64,

    /// Flat USD fee used when no spot price is obtainable for the gas coin
    pub default_fee_usd: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            binance_api_url: "https://api.binance.com".to_string(),
            price_timeout_secs: 3,
            default_fee_usd: 1.5,
        }
    }
}

impl PricingConfig {
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        Self {
            binance_api_url: env::var("BINANCE_API_URL")
                .unwrap_or(defaults.binance_api_url),
            price_timeout_secs: env::var("PRICE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.price_timeout_secs),
            default_fee_usd: env::var("DEFAULT_FEE_USD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_fee_usd),
        }
    }
}

pub mod config;
pub mod fee_service;
pub mod price_service;

pub use config::PricingConfig;
pub use fee_service::{fee_currency_for, gas_symbol_for, EstimatedFeeService, FeeService};
pub use price_service::{BinancePriceService, PriceService};

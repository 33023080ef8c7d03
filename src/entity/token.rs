use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Token {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub full_name: String,
    pub network: String,
    pub enabled: bool,
    pub address: String,
    pub balance: f64,
    pub locked: bool,
}

impl Token {
    /// Locked system coins are always usable; custom tokens only when enabled.
    pub fn is_active(&self) -> bool {
        self.locked || self.enabled
    }
}

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::di::ServiceContainer;
use crate::entity::Token;

#[derive(Serialize)]
pub struct TokenView {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub full_name: String,
    pub network: String,
    pub enabled: bool,
    pub locked: bool,
    pub address: String,
    pub balance_usd: f64,
}

#[derive(Serialize)]
pub struct TokenListResponse {
    pub success: bool,
    pub total_balance: f64,
    pub tokens: Vec<TokenView>,
}

fn view(token: &Token) -> TokenView {
    TokenView {
        id: token.id,
        symbol: token.symbol.clone(),
        name: token.name.clone(),
        full_name: token.full_name.clone(),
        network: token.network.clone(),
        enabled: token.enabled,
        locked: token.locked,
        address: token.address.clone(),
        balance_usd: (token.balance * 100.0).round() / 100.0,
    }
}

pub async fn list_tokens(
    State(services): State<Arc<ServiceContainer>>,
) -> Result<Json<TokenListResponse>, ApiError> {
    let all = services.token_interactor().list_tokens().await?;

    // System coins are always shown; custom tokens only while enabled
    let mut tokens: Vec<TokenView> = all.iter().filter(|t| t.is_active()).map(view).collect();
    tokens.sort_by(|a, b| {
        b.balance_usd
            .partial_cmp(&a.balance_usd)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_balance = tokens.iter().map(|t| t.balance_usd).sum::<f64>();

    Ok(Json(TokenListResponse {
        success: true,
        total_balance: (total_balance * 100.0).round() / 100.0,
        tokens,
    }))
}

//! Companion HTTP API: a thin read/submit surface over the same services the
//! bot uses. Previews are repeatable and side-effect free; only the confirm
//! endpoint persists state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::di::ServiceContainer;
use crate::entity::WalletError;

mod send;
mod tokens;
mod transactions;

pub fn api_router(services: Arc<ServiceContainer>) -> Router {
    Router::new()
        .route("/api/tokens", get(tokens::list_tokens))
        .route("/api/transactions", get(transactions::list_transactions))
        .route("/api/transactions/{id}", get(transactions::get_transaction))
        .route("/api/send/preview", post(send::preview))
        .route("/api/send/confirm", post(send::confirm))
        .route("/api/send/status/{tx_hash}", get(send::status))
        .with_state(services)
}

/// Maps the domain error taxonomy onto HTTP statuses. Insufficient funds
/// carries the computed maximum so the client can offer a corrected retry.
pub struct ApiError(WalletError);

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        ApiError(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError(WalletError::Database(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WalletError::InvalidAmount
            | WalletError::InvalidAddress
            | WalletError::EmptyField(_)
            | WalletError::SelfTransfer
            | WalletError::TokenLocked
            | WalletError::AmbiguousSymbol { .. }
            | WalletError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            WalletError::TokenNotFound | WalletError::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            WalletError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WalletError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = json!({
            "success": false,
            "error": self.0.to_string(),
        });
        if let WalletError::InsufficientFunds { max_sendable } = &self.0 {
            body["max_sendable"] = json!(max_sendable);
        }

        (status, Json(body)).into_response()
    }
}

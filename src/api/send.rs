use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::ApiError;
use crate::di::ServiceContainer;
use crate::entity::{NewOutcome, SendPreview, TxSource, TxStatus, WalletError};
use crate::interactor::db;

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub token: String,
    pub amount: f64,
    pub to: String,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub preview: SendPreview,
}

/// Side-effect-free dry run; repeatable any number of times.
pub async fn preview(
    State(services): State<Arc<ServiceContainer>>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let token = services
        .token_interactor()
        .find_token_by_symbol(&request.token)
        .await?;

    let preview = services
        .send_interactor()
        .preview_send(token.id, request.amount, &request.to)
        .await?;

    Ok(Json(PreviewResponse {
        success: true,
        preview,
    }))
}

#[derive(Deserialize)]
pub struct SendRequest {
    pub token: String,
    pub amount: f64,
    pub to: String,
    /// Fee in USD the client saw in the preview. Providing it explicitly lets
    /// a confirm succeed even when the fee provider is down.
    pub network_fee: f64,
}

/// The only call in this router that persists state. API sends start pending
/// and are promoted by the confirmation service.
pub async fn confirm(
    State(services): State<Arc<ServiceContainer>>,
    Json(request): Json<SendRequest>,
) -> Result<Json<Value>, ApiError> {
    let token = services
        .token_interactor()
        .find_token_by_symbol(&request.token)
        .await?;

    let transaction = services
        .send_interactor()
        .confirm_send(NewOutcome {
            token_id: token.id,
            amount_usd: request.amount,
            to_address: request.to,
            tx_hash: None,
            fee_usd: request.network_fee,
            explorer_link: None,
            source: TxSource::Api,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Transaction submitted",
        "transaction": transaction,
        "next_step": "/history",
    })))
}

pub async fn status(
    State(services): State<Arc<ServiceContainer>>,
    Path(tx_hash): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let pool = services.db_pool();
    let transaction = db::get_transaction_by_hash(&pool, &tx_hash)
        .await?
        .ok_or(WalletError::TransactionNotFound)?;

    let confirmations = if transaction.status == TxStatus::Confirmed {
        15
    } else {
        0
    };

    Ok(Json(json!({
        "success": true,
        "tx_hash": tx_hash,
        "status": transaction.status,
        "confirmations": confirmations,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

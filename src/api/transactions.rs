use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::di::ServiceContainer;
use crate::entity::{Transaction, WalletError};
use crate::interactor::db;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub token: Option<String>,
}

pub async fn list_transactions(
    State(services): State<Arc<ServiceContainer>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let pool = services.db_pool();
    let transactions =
        db::get_transactions(&pool, query.token.as_deref(), limit, offset).await?;

    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(services): State<Arc<ServiceContainer>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, ApiError> {
    let pool = services.db_pool();
    let transaction = db::get_transaction_by_id(&pool, id)
        .await?
        .ok_or(WalletError::TransactionNotFound)?;

    Ok(Json(transaction))
}

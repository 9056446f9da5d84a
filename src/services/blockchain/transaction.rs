use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BlockchainService, chain_unavailable};
use crate::models::{ApiResponse, ErrorCode};

/// 哈希格式已由路径提取器校验
pub async fn get_transaction(
    service: &BlockchainService,
    tx_hash: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_gateway(request).transaction_receipt(&tx_hash).await {
        Ok(Some(receipt)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            receipt,
            "Transaction retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TransactionNotFound,
            "Transaction not found",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read transaction", &e)),
    }
}

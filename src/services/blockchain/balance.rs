use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BlockchainService, chain_unavailable, load_user};
use crate::models::{ApiResponse, ErrorCode, blockchain::responses::BalanceResponse};

pub async fn get_balance(
    service: &BlockchainService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match load_user(&storage, user_id).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let Some(address) = user.wallet_address.as_deref().filter(|a| !a.is_empty()) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::WalletNotFound,
            "No wallet address for this user",
        )));
    };

    match service.get_gateway(request).balance(address).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BalanceResponse { balance },
            "Balance retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read balance", &e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::unauthorized;
use crate::middlewares::{self, RequireJWT};
use crate::services::BlockchainService;
use crate::utils::{SafeAddress, SafeIDI64, SafeTxHash};

static BLOCKCHAIN_SERVICE: Lazy<BlockchainService> = Lazy::new(BlockchainService::new_lazy);

pub async fn get_info(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    BLOCKCHAIN_SERVICE.get_info(user_id, &req).await
}

pub async fn get_balance(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    BLOCKCHAIN_SERVICE.get_balance(user_id, &req).await
}

pub async fn get_transaction(req: HttpRequest, hash: SafeTxHash) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE.get_transaction(hash.0, &req).await
}

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE.list_assignments(&req).await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE.get_assignment(id.0 as u64, &req).await
}

pub async fn get_assignment_submissions(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE
        .get_assignment_submissions(id.0 as u64, &req)
        .await
}

pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE.get_submission(id.0 as u64, &req).await
}

pub async fn get_submission_result(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE
        .get_submission_result(id.0 as u64, &req)
        .await
}

pub async fn get_result(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE.get_result(id.0 as u64, &req).await
}

pub async fn get_student_submissions(
    req: HttpRequest,
    address: SafeAddress,
) -> ActixResult<HttpResponse> {
    BLOCKCHAIN_SERVICE
        .get_student_submissions(address.0, &req)
        .await
}

// 配置路由，任意已登录角色可访问
pub fn configure_blockchain_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/blockchain")
            .wrap(middlewares::RequireJWT)
            .route("/info", web::get().to(get_info))
            .route("/balance", web::get().to(get_balance))
            .service(
                web::scope("")
                    .wrap(middlewares::RateLimit::chain_lookup())
                    .route("/transactions/{hash}", web::get().to(get_transaction))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments/{id}", web::get().to(get_assignment))
                    .route(
                        "/assignments/{id}/submissions",
                        web::get().to(get_assignment_submissions),
                    )
                    .route("/submissions/{id}", web::get().to(get_submission))
                    .route("/submissions/{id}/result", web::get().to(get_submission_result))
                    .route("/results/{id}", web::get().to(get_result))
                    .route(
                        "/students/{address}/submissions",
                        web::get().to(get_student_submissions),
                    ),
            ),
    );
}

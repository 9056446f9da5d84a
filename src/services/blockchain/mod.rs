//! 链上数据查询
//!
//! 只读：网络概况、当前用户的镜像交易、回执、余额与合约视图。
//! 链不可用时统一返回 503，不影响其他业务。

pub mod balance;
pub mod info;
pub mod transaction;
pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blockchain::ChainGateway;
use crate::cache::ObjectCache;
use crate::errors::EduChainError;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

pub struct BlockchainService {
    storage: Option<Arc<dyn Storage>>,
}

impl BlockchainService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_gateway(&self, request: &HttpRequest) -> Arc<dyn ChainGateway> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ChainGateway>>>()
            .expect("ChainGateway not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn get_info(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        info::get_info(self, user_id, request).await
    }

    pub async fn get_transaction(
        &self,
        tx_hash: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        transaction::get_transaction(self, tx_hash, request).await
    }

    pub async fn get_balance(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        balance::get_balance(self, user_id, request).await
    }

    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        views::list_assignments(self, request).await
    }

    pub async fn get_assignment(
        &self,
        id: u64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::get_assignment(self, id, request).await
    }

    pub async fn get_assignment_submissions(
        &self,
        assignment_id: u64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::get_assignment_submissions(self, assignment_id, request).await
    }

    pub async fn get_submission(
        &self,
        id: u64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::get_submission(self, id, request).await
    }

    pub async fn get_submission_result(
        &self,
        submission_id: u64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::get_submission_result(self, submission_id, request).await
    }

    pub async fn get_result(&self, id: u64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        views::get_result(self, id, request).await
    }

    pub async fn get_student_submissions(
        &self,
        address: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::get_student_submissions(self, address, request).await
    }
}

/// 重新读取当前用户，认证缓存里的钱包地址可能已过时
pub(crate) async fn load_user(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Err(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to load user",
            &e,
        ))),
    }
}

pub(crate) fn chain_unavailable(context: &str, err: &EduChainError) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::from_error(
        ErrorCode::BlockchainUnavailable,
        context,
        err,
    ))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{BlockchainService, load_user};
use crate::cache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    blockchain::{
        entities::NetworkInfo,
        responses::{BlockchainInfoResponse, ChainTransaction, sort_transactions},
    },
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

const NETWORK_INFO_CACHE_KEY: &str = "chain:network_info";
const RECENT_LIMIT: u64 = 10;

/// 网络概况，先读缓存，节点成功返回后按配置的短 TTL 缓存
async fn network_info(
    service: &BlockchainService,
    request: &HttpRequest,
) -> std::result::Result<NetworkInfo, String> {
    let cache = service.get_cache(request);
    if let Some(info) = cache::get_json::<NetworkInfo>(cache.as_ref(), NETWORK_INFO_CACHE_KEY).await
    {
        debug!("网络概况命中缓存");
        return Ok(info);
    }

    let info = service
        .get_gateway(request)
        .network_info()
        .await
        .map_err(|e| e.message().to_string())?;

    let ttl = AppConfig::get().blockchain.network_info_ttl;
    cache::insert_json(cache.as_ref(), NETWORK_INFO_CACHE_KEY.to_string(), &info, ttl).await;
    Ok(info)
}

/// 当前用户的镜像交易
///
/// 教师：最近创建的作业与最近发布的成绩；学生：最近的提交，以及其中已出成绩的。
async fn user_transactions(storage: &dyn Storage, user: &User) -> Result<Vec<ChainTransaction>> {
    let mut transactions = Vec::new();

    match user.role {
        UserRole::Professor => {
            let assignments = storage.list_mirrored_assignments(user.id, RECENT_LIMIT).await?;
            transactions.extend(assignments.iter().filter_map(ChainTransaction::assignment_created));

            let results = storage.list_published_results(user.id, RECENT_LIMIT).await?;
            transactions.extend(results.iter().filter_map(ChainTransaction::grade_published));
        }
        UserRole::Student => {
            let submissions = storage.list_mirrored_submissions(user.id, RECENT_LIMIT).await?;
            for detail in &submissions {
                transactions.extend(ChainTransaction::submission_received(detail));
                transactions.extend(ChainTransaction::grade_received(detail));
            }
        }
        UserRole::Admin => {}
    }

    sort_transactions(&mut transactions);
    Ok(transactions)
}

pub async fn get_info(
    service: &BlockchainService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match load_user(&storage, user_id).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let transactions = match user_transactions(storage.as_ref(), &user).await {
        Ok(transactions) => transactions,
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::InternalServerError,
                "Failed to load blockchain transactions",
                &e,
            )));
        }
    };

    let (network, network_error) = match network_info(service, request).await {
        Ok(info) => (Some(info), None),
        Err(e) => (None, Some(e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BlockchainInfoResponse {
            network,
            network_error,
            transactions,
            user_address: user.wallet_address,
        },
        "Blockchain info retrieved successfully",
    )))
}

//! 路径参数提取器
//!
//! 在进入 handler 前完成解析与校验，失败时直接返回 400 + 统一响应体。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_eth_address, validate_tx_hash};

fn bad_path(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 声明一个从路径参数中提取正整数 ID 的类型
macro_rules! declare_safe_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_path(format!("Invalid {}: '{}'", $param, raw))),
                })
            }
        }
    };
}

declare_safe_id!(SafeIDI64, "id");

/// 以太坊地址路径参数
#[derive(Debug, Clone)]
pub struct SafeAddress(pub String);

impl FromRequest for SafeAddress {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("address").unwrap_or_default();
        ready(
            validate_eth_address(raw)
                .map(|_| SafeAddress(raw.to_string()))
                .map_err(|e| bad_path(format!("Invalid address: {e}"))),
        )
    }
}

/// 交易哈希路径参数
#[derive(Debug, Clone)]
pub struct SafeTxHash(pub String);

impl FromRequest for SafeTxHash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("hash").unwrap_or_default();
        ready(
            validate_tx_hash(raw)
                .map(|_| SafeTxHash(raw.to_lowercase()))
                .map_err(|e| bad_path(format!("Invalid transaction hash: {e}"))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_rejects_non_positive() {
        let req = TestRequest::default().param("id", "12").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);

        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_safe_tx_hash_lowercased() {
        let hash = format!("0x{}", "AB".repeat(32));
        let req = TestRequest::default().param("hash", hash.clone()).to_http_request();
        let extracted = SafeTxHash::extract(&req).await.unwrap();
        assert_eq!(extracted.0, hash.to_lowercase());
    }
}

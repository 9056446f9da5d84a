use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::EduChainError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 存储层 / 链上错误直接转为响应体，消息带上错误类型前缀
    pub fn from_error(code: ErrorCode, context: &str, err: &EduChainError) -> Self {
        Self::error_empty(code, format!("{context}: {}", err.format_simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_omits_data() {
        let resp = ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], ErrorCode::CourseNotFound as i32);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_from_error_prefixes_type() {
        let err = EduChainError::blockchain("connection refused");
        let resp = ApiResponse::from_error(ErrorCode::BlockchainUnavailable, "Lookup failed", &err);
        assert_eq!(
            resp.message,
            "Lookup failed: Blockchain Error: connection refused"
        );
    }
}

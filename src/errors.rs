//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 链上中继与私钥加解密各自有独立的错误码，便于日志检索。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_educhain_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EduChainError {
            $($variant(String),)*
        }

        impl EduChainError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduChainError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduChainError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduChainError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduChainError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduChainError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_educhain_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Blockchain("E014", "Blockchain Error"),
    KeyVault("E015", "Key Vault Error"),
}

impl EduChainError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EduChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduChainError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EduChainError {
    fn from(err: sea_orm::DbErr) -> Self {
        EduChainError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EduChainError {
    fn from(err: std::io::Error) -> Self {
        EduChainError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EduChainError {
    fn from(err: serde_json::Error) -> Self {
        EduChainError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EduChainError {
    fn from(err: chrono::ParseError) -> Self {
        EduChainError::DateParse(err.to_string())
    }
}

impl EduChainError {
    /// 是否为唯一约束冲突（各数据库的报错文本不同）
    pub fn is_unique_violation(&self) -> bool {
        let msg = self.message();
        matches!(self, EduChainError::Conflict(_))
            || msg.contains("UNIQUE constraint failed")
            || msg.contains("duplicate key value")
            || msg.contains("Duplicate entry")
    }
}

pub type Result<T> = std::result::Result<T, EduChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduChainError::cache_connection("test").code(), "E001");
        assert_eq!(EduChainError::database_config("test").code(), "E003");
        assert_eq!(EduChainError::validation("test").code(), "E007");
        assert_eq!(EduChainError::authentication("test").code(), "E012");
        assert_eq!(EduChainError::blockchain("test").code(), "E014");
        assert_eq!(EduChainError::key_vault("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduChainError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EduChainError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduChainError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_unique_violation_detection() {
        let sqlite = EduChainError::database_operation(
            "创建用户失败: UNIQUE constraint failed: users.email",
        );
        assert!(sqlite.is_unique_violation());
        assert!(EduChainError::conflict("already enrolled").is_unique_violation());
        assert!(!EduChainError::not_found("missing").is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = EduChainError::blockchain("node unreachable");
        let formatted = err.format_simple();
        assert!(formatted.contains("Blockchain Error"));
        assert!(formatted.contains("node unreachable"));
    }
}

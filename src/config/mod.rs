//! 配置管理
//!
//! 配置来源优先级：`config.toml` < `config.{APP_ENV}.toml` < `EDUCHAIN_*` 环境变量 < 显式覆盖项。

mod r#impl;
mod structs;

pub use structs::*;

//! EduChain - 作业管理后端与以太坊审计中继
//!
//! 基于 Actix Web 与 SeaORM 的作业管理系统。作业发布、学生提交与成绩发布
//! 先写入关系库，再由中继镜像到 `AssignmentSystem` 合约。
//!
//! # 架构
//! - `blockchain`: 合约绑定、链网关、私钥加密与镜像中继
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod blockchain;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

//! 以太坊审计记录
//!
//! - `contract`: 合约绑定与部署清单
//! - `gateway`: 链访问接口
//! - `alloy_gateway` / `offline`: 在线与离线两种实现
//! - `key_vault`: 钱包私钥加密
//! - `hashing`: 上链内容哈希
//! - `relay`: 关系库写入后的镜像上链

pub mod alloy_gateway;
pub mod contract;
pub mod gateway;
pub mod hashing;
pub mod key_vault;
pub mod offline;
pub mod relay;

use std::sync::Arc;

use tracing::{info, warn};

pub use gateway::ChainGateway;
pub use key_vault::KeyVault;
pub use relay::{ChainRelay, FundingPolicy};

use crate::config::BlockchainConfig;

/// 按配置创建链网关
///
/// 未启用或清单加载失败时退化为离线网关，服务照常启动。
pub fn create_gateway(config: &BlockchainConfig) -> Arc<dyn ChainGateway> {
    if !config.enabled {
        info!("区块链中继未启用");
        return Arc::new(offline::OfflineChainGateway::new("blockchain.enabled = false"));
    }

    let gateway = contract::ContractManifest::load(&config.contract_manifest)
        .and_then(|manifest| alloy_gateway::AlloyChainGateway::new(config, &manifest));

    match gateway {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            warn!("链网关初始化失败，以离线模式运行: {}", e);
            Arc::new(offline::OfflineChainGateway::new(e.message().to_string()))
        }
    }
}

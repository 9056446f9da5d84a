//! 为缺少链上身份的教师和学生批量开通钱包
//!
//! 与服务端共用配置，可在部署合约后或链节点恢复后执行一次。

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{error, info, warn};

use rust_educhain::blockchain;
use rust_educhain::config::AppConfig;
use rust_educhain::runtime::lifetime::startup::create_relay;
use rust_educhain::storage;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    setup_panic!();

    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return std::process::ExitCode::FAILURE;
    }
    let config = AppConfig::get();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    let storage = match storage::create_storage().await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to create storage backend: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let gateway = blockchain::create_gateway(&config.blockchain);
    let relay = match create_relay(storage, gateway) {
        Ok(relay) => relay,
        Err(e) => {
            error!("Failed to initialize relay: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    match relay.provision_missing_profiles().await {
        Ok(report) => {
            info!(
                "Provisioning finished: {} total, {} succeeded, {} failed",
                report.total, report.succeeded, report.failed
            );
            if !report.failed_user_ids.is_empty() {
                warn!("Failed user IDs: {:?}", report.failed_user_ids);
            }
            if report.failed == 0 {
                std::process::ExitCode::SUCCESS
            } else {
                std::process::ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Provisioning aborted: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

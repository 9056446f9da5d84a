use crate::blockchain::{self, ChainGateway, ChainRelay, FundingPolicy, KeyVault};
use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub gateway: Arc<dyn ChainGateway>,
    pub relay: Arc<ChainRelay>,
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> std::result::Result<Arc<dyn ObjectCache>, String> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})"))
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 没有任何管理员时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users_by_role(UserRole::Admin).await {
        Ok(count) if count > 0 => {
            debug!("Found {} admin(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No admin found, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count admins: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量，否则生成随机密码并只打印一次
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = NewUser {
        firstname: "System".to_string(),
        lastname: "Administrator".to_string(),
        email: ADMIN_EMAIL.to_string(),
        password_hash,
        role: UserRole::Admin,
        status: UserStatus::Active,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, email: {})",
            user.id, user.email
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 用全局配置组装链上中继
pub fn create_relay(
    storage: Arc<dyn Storage>,
    gateway: Arc<dyn ChainGateway>,
) -> Result<Arc<ChainRelay>> {
    let config = AppConfig::get();
    let vault = KeyVault::new(&config.key_vault.secret)?;
    Ok(Arc::new(ChainRelay::new(
        storage,
        gateway,
        vault,
        FundingPolicy::from(&config.blockchain),
    )))
}

/// 准备服务器启动的上下文
/// 包括存储、链网关、中继和缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let gateway = blockchain::create_gateway(&AppConfig::get().blockchain);
    let relay = create_relay(storage.clone(), gateway.clone())
        .expect("Failed to initialize key vault");
    warn!("Blockchain relay initialized");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext {
        storage,
        cache,
        gateway,
        relay,
    }
}

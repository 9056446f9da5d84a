//! 集成测试公共设施：内存 SQLite、内存缓存和脚本化的链网关
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_educhain::blockchain::gateway::{
    AssignmentPayload, ChainGateway, ResultPayload, SubmissionPayload,
};
use rust_educhain::blockchain::{ChainRelay, FundingPolicy, KeyVault};
use rust_educhain::cache::ObjectCache;
use rust_educhain::cache::object_cache::moka::MokaObjectCache;
use rust_educhain::config::AppConfig;
use rust_educhain::errors::{EduChainError, Result};
use rust_educhain::models::blockchain::entities::{
    AccountBalance, AssignmentReceipt, ChainAccount, ChainAssignment, ChainResult,
    ChainSubmission, NetworkInfo, ReceiptSummary, ResultReceipt, SubmissionReceipt, TxOutcome,
};
use rust_educhain::models::users::entities::{User, UserRole, UserStatus};
use rust_educhain::models::users::requests::NewUser;
use rust_educhain::storage::Storage;
use rust_educhain::storage::sea_orm_storage::SeaOrmStorage;
use rust_educhain::utils::jwt::JwtUtils;
use rust_educhain::utils::password::hash_password;

/// 记录调用并按计数器分配链上 ID 的假网关
///
/// `fail_writes` 打开后所有交易类调用返回 `Blockchain` 错误，只读视图不受影响。
#[derive(Default)]
pub struct FakeGateway {
    accounts: AtomicU64,
    assignments: AtomicU64,
    submissions: AtomicU64,
    results: AtomicU64,
    fail_writes: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail_writes.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(EduChainError::blockchain("node unreachable"))
        } else {
            Ok(())
        }
    }

    fn tx(prefix: u8, n: u64) -> TxOutcome {
        TxOutcome {
            tx_hash: format!("0x{:02x}{:062x}", prefix, n),
            block_number: Some(n),
            gas_used: 21_000,
        }
    }
}

#[async_trait]
impl ChainGateway for FakeGateway {
    fn create_account(&self) -> Result<ChainAccount> {
        let n = self.accounts.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ChainAccount {
            address: format!("0x{:040x}", n),
            private_key: format!("0x{:064x}", n),
        })
    }

    async fn balance(&self, address: &str) -> Result<AccountBalance> {
        Ok(AccountBalance {
            address: address.to_string(),
            balance_wei: "1000000000000000000".to_string(),
            balance_eth: "1".to_string(),
        })
    }

    async fn fund_account(&self, address: &str, amount_eth: f64) -> Result<TxOutcome> {
        self.check_writes()?;
        self.record(format!("fund:{address}:{amount_eth}"));
        Ok(Self::tx(0xf0, self.accounts.load(Ordering::SeqCst)))
    }

    async fn refund_if_needed(
        &self,
        address: &str,
        min_eth: f64,
        refund_eth: f64,
    ) -> Result<Option<TxOutcome>> {
        self.check_writes()?;
        self.record(format!("refund:{address}:{min_eth}:{refund_eth}"));
        Ok(None)
    }

    async fn create_assignment(
        &self,
        _private_key: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentReceipt> {
        self.check_writes()?;
        let id = self.assignments.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(format!("create_assignment:{}", payload.title));
        Ok(AssignmentReceipt {
            tx: Self::tx(0xa0, id),
            chain_assignment_id: id,
        })
    }

    async fn submit_assignment(
        &self,
        _private_key: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt> {
        self.check_writes()?;
        let id = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(format!(
            "submit_assignment:{}:{}",
            payload.chain_assignment_id, payload.student_info
        ));
        Ok(SubmissionReceipt {
            tx: Self::tx(0xb0, id),
            chain_submission_id: id,
            block_timestamp: Some(1_700_000_000),
        })
    }

    async fn publish_result(
        &self,
        _private_key: &str,
        payload: &ResultPayload,
    ) -> Result<ResultReceipt> {
        self.check_writes()?;
        let id = self.results.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(format!(
            "publish_result:{}:{}",
            payload.chain_submission_id, payload.grade
        ));
        Ok(ResultReceipt {
            tx: Self::tx(0xc0, id),
            chain_result_id: id,
        })
    }

    async fn get_assignment(&self, id: u64) -> Result<ChainAssignment> {
        if id == 0 || id > self.assignments.load(Ordering::SeqCst) {
            return Err(EduChainError::blockchain(format!("assignment {id} does not exist")));
        }
        Ok(ChainAssignment {
            id,
            teacher: format!("0x{:040x}", 1),
            title: format!("Assignment {id}"),
            description: String::new(),
            deadline: 0,
            public_key: "pk".to_string(),
            assignment_hash: format!("0x{:064x}", id),
            is_active: true,
        })
    }

    async fn assignment_counter(&self) -> Result<u64> {
        Ok(self.assignments.load(Ordering::SeqCst))
    }

    async fn get_assignment_submissions(&self, _assignment_id: u64) -> Result<Vec<u64>> {
        Ok((1..=self.submissions.load(Ordering::SeqCst)).collect())
    }

    async fn get_submission(&self, id: u64) -> Result<ChainSubmission> {
        Ok(ChainSubmission {
            id,
            assignment_id: 1,
            student: format!("0x{:040x}", 2),
            encrypted_answer: "cipher".to_string(),
            student_info: "student".to_string(),
            submission_hash: format!("0x{:064x}", id),
            timestamp: 1_700_000_000,
            is_graded: id <= self.results.load(Ordering::SeqCst),
        })
    }

    async fn get_student_submissions(&self, _address: &str) -> Result<Vec<u64>> {
        Ok((1..=self.submissions.load(Ordering::SeqCst)).collect())
    }

    async fn get_result(&self, id: u64) -> Result<ChainResult> {
        Ok(ChainResult {
            id,
            submission_id: id,
            grade: 15,
            comment: "ok".to_string(),
            result_hash: format!("0x{:064x}", id),
            timestamp: 1_700_000_100,
        })
    }

    async fn submission_result_id(&self, submission_id: u64) -> Result<u64> {
        if submission_id <= self.results.load(Ordering::SeqCst) {
            Ok(submission_id)
        } else {
            Ok(0)
        }
    }

    async fn network_info(&self) -> Result<NetworkInfo> {
        self.record("network_info");
        Ok(NetworkInfo {
            connected: true,
            chain_id: 1337,
            block_number: 42,
            contract_address: format!("0x{:040x}", 0xc0ffee),
            assignment_count: self.assignments.load(Ordering::SeqCst),
            submission_count: self.submissions.load(Ordering::SeqCst),
            result_count: self.results.load(Ordering::SeqCst),
        })
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptSummary>> {
        if tx_hash.starts_with("0xa0") {
            Ok(Some(ReceiptSummary {
                tx_hash: tx_hash.to_string(),
                block_number: Some(1),
                gas_used: 21_000,
                status: true,
                from: format!("0x{:040x}", 1),
                to: Some(format!("0x{:040x}", 0xc0ffee)),
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub gateway: Arc<FakeGateway>,
    pub relay: Arc<ChainRelay>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_gateway(FakeGateway::default()).await
    }

    pub async fn with_gateway(gateway: FakeGateway) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_in_memory()
                .await
                .expect("in-memory storage"),
        );
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::with_capacity(1024, 60));
        let gateway = Arc::new(gateway);
        let dyn_gateway: Arc<dyn ChainGateway> = gateway.clone();
        let relay = Arc::new(ChainRelay::new(
            storage.clone(),
            dyn_gateway,
            KeyVault::new("integration-test-secret").expect("key vault"),
            FundingPolicy::from(&AppConfig::get().blockchain),
        ));

        Self {
            storage,
            cache,
            gateway,
            relay,
        }
    }

    pub fn dyn_gateway(&self) -> Arc<dyn ChainGateway> {
        self.gateway.clone()
    }

    /// 直接写库创建用户，密码哈希不可用于登录
    pub async fn create_user(&self, firstname: &str, lastname: &str, role: UserRole) -> User {
        let email = format!(
            "{}.{}@school.test",
            firstname.to_lowercase(),
            lastname.to_lowercase()
        );
        self.storage
            .create_user(NewUser {
                firstname: firstname.to_string(),
                lastname: lastname.to_string(),
                email,
                password_hash: "not-a-real-hash".to_string(),
                role,
                status: UserStatus::Active,
            })
            .await
            .expect("create user")
    }

    /// 以真实 Argon2 哈希创建可登录的用户
    pub async fn create_login_user(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
        status: UserStatus,
    ) -> User {
        self.storage
            .create_user(NewUser {
                firstname: "Login".to_string(),
                lastname: "User".to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).expect("hash password"),
                role,
                status,
            })
            .await
            .expect("create user")
    }

    /// 创建用户并同步开通链上身份
    pub async fn create_chain_user(&self, firstname: &str, lastname: &str, role: UserRole) -> User {
        let user = self.create_user(firstname, lastname, role).await;
        self.relay
            .provision_profile(&user)
            .await
            .expect("provision chain profile");
        self.storage
            .get_user_by_id(user.id)
            .await
            .expect("reload user")
            .expect("user exists")
    }
}

pub fn bearer(user: &User) -> (String, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).expect("token");
    ("Authorization".to_string(), format!("Bearer {token}"))
}

/// 以完整路由表初始化测试服务
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_educhain::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(rust_educhain::utils::query_error_handler),
                )
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .app_data(actix_web::web::Data::new($ctx.dyn_gateway()))
                .app_data(actix_web::web::Data::new($ctx.relay.clone()))
                .configure(rust_educhain::routes::configure_api_routes),
        )
        .await
    };
}

//! 链上对象与交易回执

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assignments::entities::Assignment;

/// 新生成的以太坊账户
///
/// 私钥为 0x 前缀的十六进制，只在加密入库前短暂存在于内存中。
#[derive(Clone)]
pub struct ChainAccount {
    pub address: String,
    pub private_key: String,
}

impl std::fmt::Debug for ChainAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainAccount")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// 已上链交易的基本结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct TxOutcome {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct AssignmentReceipt {
    pub tx: TxOutcome,
    pub chain_assignment_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct SubmissionReceipt {
    pub tx: TxOutcome,
    pub chain_submission_id: u64,
    /// 打包区块的时间戳（秒）
    pub block_timestamp: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ResultReceipt {
    pub tx: TxOutcome,
    pub chain_result_id: u64,
}

// 合约中的作业记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainAssignment {
    pub id: u64,
    pub teacher: String,
    pub title: String,
    pub description: String,
    pub deadline: u64,
    pub public_key: String,
    pub assignment_hash: String,
    pub is_active: bool,
}

// 合约中的提交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainSubmission {
    pub id: u64,
    pub assignment_id: u64,
    pub student: String,
    pub encrypted_answer: String,
    pub student_info: String,
    pub submission_hash: String,
    pub timestamp: u64,
    pub is_graded: bool,
}

// 合约中的成绩记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainResult {
    pub id: u64,
    pub submission_id: u64,
    pub grade: u64,
    pub comment: String,
    pub result_hash: String,
    pub timestamp: u64,
}

// 网络概况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct NetworkInfo {
    pub connected: bool,
    pub chain_id: u64,
    pub block_number: u64,
    pub contract_address: String,
    pub assignment_count: u64,
    pub submission_count: u64,
    pub result_count: u64,
}

// 交易回执摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ReceiptSummary {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// true 表示执行成功
    pub status: bool,
    pub from: String,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct AccountBalance {
    pub address: String,
    pub balance_wei: String,
    pub balance_eth: String,
}

/// 已镜像上链的作业及其课程名
#[derive(Debug, Clone)]
pub struct MirroredAssignment {
    pub assignment: Assignment,
    pub course_name: String,
}

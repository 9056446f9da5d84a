//! 链访问接口
//!
//! 中继层和 HTTP 只读视图都通过 [`ChainGateway`] 访问以太坊节点，
//! 测试中以脚本化实现替换。

use alloy::primitives::B256;
use async_trait::async_trait;

use crate::errors::Result;
use crate::models::blockchain::entities::{
    AccountBalance, AssignmentReceipt, ChainAccount, ChainAssignment, ChainResult,
    ChainSubmission, NetworkInfo, ReceiptSummary, ResultReceipt, SubmissionReceipt, TxOutcome,
};

/// 上链作业所需的内容
#[derive(Debug, Clone)]
pub struct AssignmentPayload {
    pub title: String,
    pub description: String,
    /// unix 秒
    pub deadline: u64,
    pub public_key: String,
    pub assignment_hash: B256,
}

#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub chain_assignment_id: u64,
    pub encrypted_answer: String,
    pub student_info: String,
    pub submission_hash: B256,
}

#[derive(Debug, Clone)]
pub struct ResultPayload {
    pub chain_submission_id: u64,
    pub grade: u64,
    pub comment: String,
    pub result_hash: B256,
}

#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// 生成新账户，不触网
    fn create_account(&self) -> Result<ChainAccount>;

    async fn balance(&self, address: &str) -> Result<AccountBalance>;

    /// 从资助账户转账
    async fn fund_account(&self, address: &str, amount_eth: f64) -> Result<TxOutcome>;

    /// 余额低于 `min_eth` 时补充 `refund_eth`，无需补充返回 None
    async fn refund_if_needed(
        &self,
        address: &str,
        min_eth: f64,
        refund_eth: f64,
    ) -> Result<Option<TxOutcome>>;

    async fn create_assignment(
        &self,
        private_key: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentReceipt>;

    async fn submit_assignment(
        &self,
        private_key: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt>;

    async fn publish_result(
        &self,
        private_key: &str,
        payload: &ResultPayload,
    ) -> Result<ResultReceipt>;

    async fn get_assignment(&self, id: u64) -> Result<ChainAssignment>;

    async fn assignment_counter(&self) -> Result<u64>;

    /// 逐个读取 1..=counter，单条读取失败的记录被跳过
    async fn list_assignments(&self) -> Result<Vec<ChainAssignment>> {
        let count = self.assignment_counter().await?;
        let mut items = Vec::with_capacity(count as usize);
        for id in 1..=count {
            match self.get_assignment(id).await {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!("读取链上作业 {} 失败: {}", id, e),
            }
        }
        Ok(items)
    }

    async fn get_assignment_submissions(&self, assignment_id: u64) -> Result<Vec<u64>>;

    async fn get_submission(&self, id: u64) -> Result<ChainSubmission>;

    async fn get_student_submissions(&self, address: &str) -> Result<Vec<u64>>;

    async fn get_result(&self, id: u64) -> Result<ChainResult>;

    /// 提交对应的成绩 id，0 表示尚未评分
    async fn submission_result_id(&self, submission_id: u64) -> Result<u64>;

    async fn get_submission_result(&self, submission_id: u64) -> Result<Option<ChainResult>> {
        match self.submission_result_id(submission_id).await? {
            0 => Ok(None),
            result_id => self.get_result(result_id).await.map(Some),
        }
    }

    async fn network_info(&self) -> Result<NetworkInfo>;

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptSummary>>;
}

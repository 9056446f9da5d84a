//! 未启用链或合约清单不可用时的网关
//!
//! 所有调用都返回 `Blockchain` 错误，中继层会记录后继续。

use async_trait::async_trait;

use super::gateway::{AssignmentPayload, ChainGateway, ResultPayload, SubmissionPayload};
use crate::errors::{EduChainError, Result};
use crate::models::blockchain::entities::{
    AccountBalance, AssignmentReceipt, ChainAccount, ChainAssignment, ChainResult,
    ChainSubmission, NetworkInfo, ReceiptSummary, ResultReceipt, SubmissionReceipt, TxOutcome,
};

pub struct OfflineChainGateway {
    reason: String,
}

impl OfflineChainGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable<T>(&self) -> Result<T> {
        Err(EduChainError::blockchain(format!(
            "区块链不可用: {}",
            self.reason
        )))
    }
}

#[async_trait]
impl ChainGateway for OfflineChainGateway {
    fn create_account(&self) -> Result<ChainAccount> {
        self.unavailable()
    }

    async fn balance(&self, _address: &str) -> Result<AccountBalance> {
        self.unavailable()
    }

    async fn fund_account(&self, _address: &str, _amount_eth: f64) -> Result<TxOutcome> {
        self.unavailable()
    }

    async fn refund_if_needed(
        &self,
        _address: &str,
        _min_eth: f64,
        _refund_eth: f64,
    ) -> Result<Option<TxOutcome>> {
        self.unavailable()
    }

    async fn create_assignment(
        &self,
        _private_key: &str,
        _payload: &AssignmentPayload,
    ) -> Result<AssignmentReceipt> {
        self.unavailable()
    }

    async fn submit_assignment(
        &self,
        _private_key: &str,
        _payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt> {
        self.unavailable()
    }

    async fn publish_result(
        &self,
        _private_key: &str,
        _payload: &ResultPayload,
    ) -> Result<ResultReceipt> {
        self.unavailable()
    }

    async fn get_assignment(&self, _id: u64) -> Result<ChainAssignment> {
        self.unavailable()
    }

    async fn assignment_counter(&self) -> Result<u64> {
        self.unavailable()
    }

    async fn get_assignment_submissions(&self, _assignment_id: u64) -> Result<Vec<u64>> {
        self.unavailable()
    }

    async fn get_submission(&self, _id: u64) -> Result<ChainSubmission> {
        self.unavailable()
    }

    async fn get_student_submissions(&self, _address: &str) -> Result<Vec<u64>> {
        self.unavailable()
    }

    async fn get_result(&self, _id: u64) -> Result<ChainResult> {
        self.unavailable()
    }

    async fn submission_result_id(&self, _submission_id: u64) -> Result<u64> {
        self.unavailable()
    }

    async fn network_info(&self) -> Result<NetworkInfo> {
        self.unavailable()
    }

    async fn transaction_receipt(&self, _tx_hash: &str) -> Result<Option<ReceiptSummary>> {
        self.unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_is_blockchain_error() {
        let gateway = OfflineChainGateway::new("disabled");
        assert_eq!(gateway.create_account().unwrap_err().code(), "E014");
        assert_eq!(gateway.network_info().await.unwrap_err().code(), "E014");
        let err = gateway.list_assignments().await.unwrap_err();
        assert!(err.message().contains("disabled"));
        assert!(gateway.get_submission_result(1).await.is_err());
    }
}

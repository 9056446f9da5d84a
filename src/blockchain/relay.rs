//! 链上中继
//!
//! 关系库写入完成后再把作业、提交和成绩镜像到合约。链上失败只记录日志，
//! 不回滚也不重试，调用方拿到 `None` 后按未上链处理。

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::gateway::{AssignmentPayload, ChainGateway, ResultPayload, SubmissionPayload};
use super::hashing;
use super::key_vault::KeyVault;
use crate::config::BlockchainConfig;
use crate::errors::{EduChainError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::blockchain::entities::{AssignmentReceipt, ResultReceipt, SubmissionReceipt};
use crate::models::blockchain::responses::ProvisionReport;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 资助与补充余额的阈值（ETH）
#[derive(Debug, Clone, PartialEq)]
pub struct FundingPolicy {
    pub initial_funding_eth: f64,
    pub min_balance_eth: f64,
    pub refund_amount_eth: f64,
}

impl From<&BlockchainConfig> for FundingPolicy {
    fn from(config: &BlockchainConfig) -> Self {
        Self {
            initial_funding_eth: config.initial_funding_eth,
            min_balance_eth: config.min_balance_eth,
            refund_amount_eth: config.refund_amount_eth,
        }
    }
}

pub struct ChainRelay {
    storage: Arc<dyn Storage>,
    gateway: Arc<dyn ChainGateway>,
    vault: KeyVault,
    policy: FundingPolicy,
}

impl ChainRelay {
    pub fn new(
        storage: Arc<dyn Storage>,
        gateway: Arc<dyn ChainGateway>,
        vault: KeyVault,
        policy: FundingPolicy,
    ) -> Self {
        Self {
            storage,
            gateway,
            vault,
            policy,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn ChainGateway> {
        &self.gateway
    }

    /// 为教师或学生开通链上身份，返回新地址
    ///
    /// 管理员和已有身份的用户直接跳过。初始资助失败只告警，身份仍然保留。
    pub async fn provision_profile(&self, user: &User) -> Option<String> {
        if !user.role.has_chain_identity() || user.has_chain_profile() {
            return None;
        }

        match self.try_provision(user).await {
            Ok(address) => Some(address),
            Err(e) => {
                warn!("为用户 {} 开通链上身份失败: {}", user.id, e);
                None
            }
        }
    }

    async fn try_provision(&self, user: &User) -> Result<String> {
        let account = self.gateway.create_account()?;
        let encrypted = self.vault.encrypt(&account.private_key)?;

        if !self
            .storage
            .set_user_wallet(user.id, &account.address, &encrypted)
            .await?
        {
            return Err(EduChainError::not_found(format!("用户 {} 不存在", user.id)));
        }
        info!("用户 {} 已开通链上身份: {}", user.id, account.address);

        if let Err(e) = self
            .gateway
            .fund_account(&account.address, self.policy.initial_funding_eth)
            .await
        {
            warn!("为 {} 注资失败: {}", account.address, e);
        }
        Ok(account.address)
    }

    /// 批量为缺少链上身份的教师和学生开通
    pub async fn provision_missing_profiles(&self) -> Result<ProvisionReport> {
        let users = self.storage.list_users_without_wallet().await?;
        let mut report = ProvisionReport {
            total: users.len(),
            ..Default::default()
        };

        for user in &users {
            match self.provision_profile(user).await {
                Some(_) => report.succeeded += 1,
                None => {
                    report.failed += 1;
                    report.failed_user_ids.push(user.id);
                }
            }
        }

        info!(
            "链上身份批量开通完成: 共 {}，成功 {}，失败 {}",
            report.total, report.succeeded, report.failed
        );
        Ok(report)
    }

    /// 重新从库中读取用户并解密私钥，无链上身份返回 None
    async fn signing_identity(&self, user_id: i64) -> Result<Option<(User, String)>> {
        let Some(user) = self.storage.get_user_by_id(user_id).await? else {
            return Ok(None);
        };
        let (Some(address), Some(encrypted)) =
            (user.wallet_address.as_deref(), user.encrypted_private_key.as_deref())
        else {
            return Ok(None);
        };
        if address.is_empty() || encrypted.is_empty() {
            return Ok(None);
        }
        let private_key = self.vault.decrypt(encrypted)?;
        Ok(Some((user, private_key)))
    }

    /// 每笔交易前检查余额，低于 `min_balance_eth` 时补充
    async fn top_up(&self, address: &str) {
        if let Err(e) = self
            .gateway
            .refund_if_needed(
                address,
                self.policy.min_balance_eth,
                self.policy.refund_amount_eth,
            )
            .await
        {
            warn!("为 {} 补充余额失败: {}", address, e);
        }
    }

    pub async fn mirror_assignment(&self, assignment: &Assignment) -> Option<AssignmentReceipt> {
        match self.try_mirror_assignment(assignment).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("作业 {} 上链失败: {}", assignment.id, e);
                None
            }
        }
    }

    async fn try_mirror_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<Option<AssignmentReceipt>> {
        let Some((professor, private_key)) =
            self.signing_identity(assignment.professor_id).await?
        else {
            debug!("教师 {} 无链上身份，作业 {} 不上链", assignment.professor_id, assignment.id);
            return Ok(None);
        };
        let address = professor.wallet_address.as_deref().unwrap_or_default();
        self.top_up(address).await;

        let payload = AssignmentPayload {
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            deadline: assignment.due_date.timestamp().max(0) as u64,
            public_key: assignment.public_key.clone(),
            assignment_hash: hashing::assignment_hash(&assignment.title, &assignment.description),
        };
        let receipt = self.gateway.create_assignment(&private_key, &payload).await?;

        self.storage
            .set_assignment_chain_record(
                assignment.id,
                &receipt.tx.tx_hash,
                receipt.chain_assignment_id as i64,
            )
            .await?;
        Ok(Some(receipt))
    }

    /// 作业未上链时提交也不上链
    pub async fn mirror_submission(
        &self,
        submission: &Submission,
        assignment: &Assignment,
    ) -> Option<SubmissionReceipt> {
        match self.try_mirror_submission(submission, assignment).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("提交 {} 上链失败: {}", submission.id, e);
                None
            }
        }
    }

    async fn try_mirror_submission(
        &self,
        submission: &Submission,
        assignment: &Assignment,
    ) -> Result<Option<SubmissionReceipt>> {
        let Some(chain_assignment_id) = assignment.chain_assignment_id else {
            debug!("作业 {} 未上链，提交 {} 不上链", assignment.id, submission.id);
            return Ok(None);
        };
        let Some((student, private_key)) = self.signing_identity(submission.student_id).await?
        else {
            debug!("学生 {} 无链上身份，提交 {} 不上链", submission.student_id, submission.id);
            return Ok(None);
        };
        let address = student.wallet_address.as_deref().unwrap_or_default();
        self.top_up(address).await;

        let payload = SubmissionPayload {
            chain_assignment_id: chain_assignment_id as u64,
            encrypted_answer: submission.encrypted_content.clone(),
            student_info: student.full_name(),
            submission_hash: hashing::submission_hash(&submission.encrypted_content),
        };
        let receipt = self.gateway.submit_assignment(&private_key, &payload).await?;

        self.storage
            .set_submission_chain_record(
                submission.id,
                &receipt.tx.tx_hash,
                receipt.chain_submission_id as i64,
            )
            .await?;
        Ok(Some(receipt))
    }

    /// 以评分教师的身份发布成绩，提交未上链时跳过
    pub async fn mirror_grade(
        &self,
        professor_id: i64,
        submission: &Submission,
    ) -> Option<ResultReceipt> {
        match self.try_mirror_grade(professor_id, submission).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("提交 {} 的成绩上链失败: {}", submission.id, e);
                None
            }
        }
    }

    async fn try_mirror_grade(
        &self,
        professor_id: i64,
        submission: &Submission,
    ) -> Result<Option<ResultReceipt>> {
        let Some(chain_submission_id) = submission.chain_submission_id else {
            debug!("提交 {} 未上链，成绩不上链", submission.id);
            return Ok(None);
        };
        let Some((professor, private_key)) = self.signing_identity(professor_id).await? else {
            debug!("教师 {} 无链上身份，成绩不上链", professor_id);
            return Ok(None);
        };
        let address = professor.wallet_address.as_deref().unwrap_or_default();
        self.top_up(address).await;

        let grade = submission.grade.unwrap_or_default();
        let feedback = submission.feedback.clone().unwrap_or_default();
        let payload = ResultPayload {
            chain_submission_id: chain_submission_id as u64,
            // 合约只存整数成绩
            grade: grade.max(0.0) as u64,
            result_hash: hashing::result_hash(grade, &feedback),
            comment: feedback,
        };
        let receipt = self.gateway.publish_result(&private_key, &payload).await?;

        self.storage
            .set_submission_result_hash(submission.id, &receipt.tx.tx_hash)
            .await?;
        Ok(Some(receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_policy_from_config() {
        let policy = FundingPolicy::from(&AppConfig::get().blockchain);
        assert_eq!(policy.initial_funding_eth, 1000.0);
        assert_eq!(policy.min_balance_eth, 10.0);
        assert_eq!(policy.refund_amount_eth, 100.0);
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{
    AccountBalance, ChainAssignment, ChainResult, ChainSubmission, MirroredAssignment, NetworkInfo,
};
use crate::models::submissions::entities::SubmissionDetail;

// 链上交易动态中的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tx_hash: String,
    /// unix 秒
    pub timestamp: i64,
    pub details: String,
    pub status: String,
    pub blockchain_id: Option<i64>,
}

impl ChainTransaction {
    pub const ASSIGNMENT_CREATED: &'static str = "Assignment Created";
    pub const GRADE_PUBLISHED: &'static str = "Grade Published";
    pub const SUBMISSION_RECEIVED: &'static str = "Submission Received";
    pub const GRADE_RECEIVED: &'static str = "Grade Received";

    const CONFIRMED: &'static str = "confirmed";

    pub fn assignment_created(item: &MirroredAssignment) -> Option<Self> {
        let a = &item.assignment;
        Some(Self {
            id: a.id.to_string(),
            kind: Self::ASSIGNMENT_CREATED.to_string(),
            tx_hash: a.chain_tx_hash.clone()?,
            timestamp: a.created_at.timestamp(),
            details: format!("{} - {}", a.title, item.course_name),
            status: Self::CONFIRMED.to_string(),
            blockchain_id: a.chain_assignment_id,
        })
    }

    pub fn grade_published(detail: &SubmissionDetail) -> Option<Self> {
        let s = &detail.submission;
        Some(Self {
            id: s.id.to_string(),
            kind: Self::GRADE_PUBLISHED.to_string(),
            tx_hash: s.chain_result_hash.clone()?,
            timestamp: s.graded_at.map(|t| t.timestamp()).unwrap_or_default(),
            details: format!(
                "{} - Grade: {}/{}",
                detail.student_name,
                s.grade.unwrap_or_default(),
                s.max_grade
            ),
            status: Self::CONFIRMED.to_string(),
            blockchain_id: s.chain_submission_id,
        })
    }

    pub fn submission_received(detail: &SubmissionDetail) -> Option<Self> {
        let s = &detail.submission;
        Some(Self {
            id: s.id.to_string(),
            kind: Self::SUBMISSION_RECEIVED.to_string(),
            tx_hash: s.chain_tx_hash.clone()?,
            timestamp: s.submitted_at.timestamp(),
            details: format!("{} - {}", detail.assignment_title, detail.course_name),
            status: Self::CONFIRMED.to_string(),
            blockchain_id: s.chain_submission_id,
        })
    }

    pub fn grade_received(detail: &SubmissionDetail) -> Option<Self> {
        let s = &detail.submission;
        Some(Self {
            id: format!("{}_grade", s.id),
            kind: Self::GRADE_RECEIVED.to_string(),
            tx_hash: s.chain_result_hash.clone()?,
            timestamp: s.graded_at.map(|t| t.timestamp()).unwrap_or_default(),
            details: format!(
                "Grade: {}/{} - {}",
                s.grade.unwrap_or_default(),
                s.max_grade,
                detail.assignment_title
            ),
            status: Self::CONFIRMED.to_string(),
            blockchain_id: s.chain_submission_id,
        })
    }
}

/// 按时间倒序排列，时间相同保持原顺序
pub fn sort_transactions(transactions: &mut [ChainTransaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct BlockchainInfoResponse {
    pub network: Option<NetworkInfo>,
    pub network_error: Option<String>,
    pub transactions: Vec<ChainTransaction>,
    pub user_address: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct BalanceResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub balance: AccountBalance,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainAssignmentListResponse {
    pub total: u64,
    pub items: Vec<ChainAssignment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct SubmissionIdListResponse {
    pub submission_ids: Vec<u64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ChainSubmissionResponse {
    pub submission: ChainSubmission,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct SubmissionResultResponse {
    pub submission_id: u64,
    /// 尚未发布成绩时为空
    pub result: Option<ChainResult>,
}

/// 批量开通链上身份的结果
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/blockchain.ts")]
pub struct ProvisionReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_user_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, timestamp: i64) -> ChainTransaction {
        ChainTransaction {
            id: id.to_string(),
            kind: ChainTransaction::SUBMISSION_RECEIVED.to_string(),
            tx_hash: format!("0x{id}"),
            timestamp,
            details: String::new(),
            status: "confirmed".to_string(),
            blockchain_id: None,
        }
    }

    #[test]
    fn test_transactions_sorted_newest_first() {
        let mut list = vec![tx("a", 100), tx("b", 300), tx("c", 200), tx("d", 300)];
        sort_transactions(&mut list);
        let ids: Vec<_> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_kind_serialized_as_type() {
        let json = serde_json::to_value(tx("1", 1)).unwrap();
        assert_eq!(json["type"], "Submission Received");
        assert!(json.get("kind").is_none());
    }
}

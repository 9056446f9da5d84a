use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教师 RSA 私钥从不上传，数据库中固定写入该占位值
pub const PRIVATE_KEY_PLACEHOLDER: &str = "NEVER_STORED";

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub course_id: i64,
    pub professor_id: i64,
    pub public_key: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub private_key_hash: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub chain_tx_hash: Option<String>,
    pub chain_assignment_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn is_overdue(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now > self.due_date
    }
}

// 教师视角的作业列表项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ProfessorAssignmentItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub course_name: String,
    pub course_code: String,
    pub submissions_count: i64,
    pub total_students: i64,
}

// 学生视角的作业列表项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub course_name: String,
    pub course_code: String,
    pub professor_name: Option<String>,
    pub has_submitted: bool,
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment_due(due: chrono::DateTime<Utc>) -> Assignment {
        Assignment {
            id: 1,
            title: "Essay".to_string(),
            description: "Write".to_string(),
            course_id: 1,
            professor_id: 2,
            public_key: "pk".to_string(),
            private_key_hash: PRIVATE_KEY_PLACEHOLDER.to_string(),
            due_date: due,
            chain_tx_hash: None,
            chain_assignment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overdue_only_after_due_date() {
        let now = Utc::now();
        assert!(!assignment_due(now + Duration::hours(1)).is_overdue(now));
        assert!(!assignment_due(now).is_overdue(now));
        assert!(assignment_due(now - Duration::seconds(1)).is_overdue(now));
    }

    #[test]
    fn test_private_key_hash_hidden() {
        let json = serde_json::to_value(assignment_due(Utc::now())).unwrap();
        assert!(json.get("private_key_hash").is_none());
    }
}

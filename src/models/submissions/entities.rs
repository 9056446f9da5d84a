use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未指定时的满分
pub const DEFAULT_MAX_GRADE: f64 = 20.0;

// 提交状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 已提交，待评分
    Graded,    // 已评分
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub encrypted_content: String,
    pub student_id_hash: String,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub max_grade: f64,
    pub feedback: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub chain_tx_hash: Option<String>,
    pub chain_submission_id: Option<i64>,
    pub chain_result_hash: Option<String>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }

    /// 成绩必须落在 [0, max_grade] 内
    pub fn grade_in_range(&self, grade: f64) -> bool {
        grade.is_finite() && (0.0..=self.max_grade).contains(&grade)
    }
}

// 提交详情：附带作业、课程与学生信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub professor_id: i64,
    pub course_name: String,
    pub course_code: String,
    pub student_name: String,
    pub student_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            id: 1,
            assignment_id: 1,
            student_id: 3,
            encrypted_content: "cipher".to_string(),
            student_id_hash: "h".to_string(),
            status: SubmissionStatus::Submitted,
            grade: None,
            max_grade: DEFAULT_MAX_GRADE,
            feedback: None,
            submitted_at: chrono::Utc::now(),
            graded_at: None,
            chain_tx_hash: None,
            chain_submission_id: None,
            chain_result_hash: None,
        }
    }

    #[test]
    fn test_grade_bounds() {
        let s = submission();
        assert!(s.grade_in_range(0.0));
        assert!(s.grade_in_range(20.0));
        assert!(s.grade_in_range(12.5));
        assert!(!s.grade_in_range(-0.5));
        assert!(!s.grade_in_range(20.01));
        assert!(!s.grade_in_range(f64::NAN));
    }

    #[test]
    fn test_status_round_trip_text() {
        assert_eq!("graded".parse::<SubmissionStatus>(), Ok(SubmissionStatus::Graded));
        assert_eq!(SubmissionStatus::Submitted.to_string(), "submitted");
        assert!("late".parse::<SubmissionStatus>().is_err());
    }
}

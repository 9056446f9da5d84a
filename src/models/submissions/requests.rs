use serde::Deserialize;
use ts_rs::TS;

// 学生提交请求，字段缺失时由服务层返回 400
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub assignment_id: Option<i64>,
    pub encrypted_content: Option<String>,
    pub student_id_hash: Option<String>,
}

// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub submission_id: i64,
    pub grade: f64,
    pub feedback: Option<String>,
}

// 写入存储层的提交数据
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub encrypted_content: String,
    pub student_id_hash: String,
}

use serde::Deserialize;
use ts_rs::TS;

// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub course_id: i64,
    /// RFC 3339 格式的截止时间
    pub due_date: String,
    /// 教师生成的 RSA 公钥（PEM）
    pub public_key: String,
}

// 写入存储层的作业数据
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub course_id: i64,
    pub professor_id: i64,
    pub public_key: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

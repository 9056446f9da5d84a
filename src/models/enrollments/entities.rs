use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserBrief;

// 选课实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentCourse {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub professor_name: Option<String>,
}

// 选课详情：附带学生与课程信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentDetail {
    pub id: i64,
    pub student: UserBrief,
    pub course: EnrollmentCourse,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

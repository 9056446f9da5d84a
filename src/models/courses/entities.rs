use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserBrief;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub description: String,
    pub professor_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程概要：附带授课教师与统计数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseSummary {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub description: String,
    pub professor: Option<UserBrief>,
    pub enrollment_count: i64,
    pub assignment_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseSummary {
    pub fn from_course(
        course: Course,
        professor: Option<UserBrief>,
        enrollment_count: i64,
        assignment_count: i64,
    ) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code,
            course_name: course.course_name,
            description: course.description,
            professor,
            enrollment_count,
            assignment_count,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }

    pub fn has_dependents(&self) -> bool {
        self.enrollment_count > 0 || self.assignment_count > 0
    }
}

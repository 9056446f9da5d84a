use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 选课查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub professor_id: Option<i64>,
}

// 选课列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub professor_id: Option<i64>,
}

impl From<EnrollmentListParams> for EnrollmentListQuery {
    fn from(params: EnrollmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            student_id: params.student_id,
            course_id: params.course_id,
            professor_id: params.professor_id,
        }
    }
}

// 单个选课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
}

// 批量选课请求，两个字段均为必填，缺失时由服务层返回 400
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollmentRequest {
    pub course_id: Option<i64>,
    pub student_ids: Option<Vec<i64>>,
}

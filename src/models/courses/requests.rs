use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64, double_option};
use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub professor_id: Option<i64>,
    /// true 只看已分配教师的课程，false 只看未分配的
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub assigned: Option<bool>,
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub course_name: String,
    #[serde(default)]
    pub description: String,
    pub professor_id: Option<i64>,
}

// 更新课程请求
//
// `professor_id` 为三态字段：
// - 缺失：不修改
// - `null` 或 `0`：取消分配
// - 其他值：改为该教师
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub professor_id: Option<Option<i64>>,
}

impl UpdateCourseRequest {
    /// 归一化后的教师变更：`None` 不修改，`Some(None)` 取消分配
    pub fn professor_change(&self) -> Option<Option<i64>> {
        match self.professor_id {
            None => None,
            Some(None) | Some(Some(0)) => Some(None),
            Some(Some(id)) => Some(Some(id)),
        }
    }
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub professor_id: Option<i64>,
    pub assigned: Option<bool>,
}

impl From<CourseListParams> for CourseListQuery {
    fn from(params: CourseListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            professor_id: params.professor_id,
            assigned: params.assigned,
        }
    }
}

// 写入存储层的课程数据
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    pub description: String,
    pub professor_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub professor_id: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_professor_field_is_tri_state() {
        let absent: UpdateCourseRequest = serde_json::from_str(r#"{"course_name":"X"}"#).unwrap();
        assert_eq!(absent.professor_change(), None);

        let null: UpdateCourseRequest = serde_json::from_str(r#"{"professor_id":null}"#).unwrap();
        assert_eq!(null.professor_change(), Some(None));

        let zero: UpdateCourseRequest = serde_json::from_str(r#"{"professor_id":0}"#).unwrap();
        assert_eq!(zero.professor_change(), Some(None));

        let set: UpdateCourseRequest = serde_json::from_str(r#"{"professor_id":9}"#).unwrap();
        assert_eq!(set.professor_change(), Some(Some(9)));
    }

    #[test]
    fn test_list_params_parse_filters() {
        let params = actix_web::web::Query::<CourseListParams>::from_query(
            "page=1&size=20&professor_id=3&assigned=true",
        )
        .unwrap()
        .into_inner();
        let query = CourseListQuery::from(params);
        assert_eq!(query.professor_id, Some(3));
        assert_eq!(query.assigned, Some(true));
        assert_eq!(query.size, Some(20));
    }
}

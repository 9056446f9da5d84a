use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, require_course};
use crate::models::{
    ApiResponse, ErrorCode, enrollments::requests::BulkEnrollmentRequest,
    users::entities::UserRole,
};

pub async fn bulk_enroll(
    service: &EnrollmentService,
    bulk: BulkEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(course_id), Some(student_ids)) = (bulk.course_id, bulk.student_ids) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "course_id and student_ids are required",
        )));
    };
    if student_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "student_ids must not be empty",
        )));
    }

    let storage = service.get_storage(request);

    if let Err(resp) = require_course(&storage, course_id).await {
        return Ok(resp);
    }

    let students: HashSet<i64> = match storage.get_users_by_ids(&student_ids).await {
        Ok(users) => users
            .into_iter()
            .filter(|u| u.role == UserRole::Student)
            .map(|u| u.id)
            .collect(),
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::EnrollmentFailed,
                "Bulk enrollment failed",
                &e,
            )));
        }
    };

    let invalid: Vec<String> = student_ids
        .iter()
        .filter(|id| !students.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !invalid.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentStudentInvalid,
            format!("Invalid student IDs: {}", invalid.join(", ")),
        )));
    }

    match storage.bulk_enroll(course_id, &student_ids).await {
        Ok(result) => {
            info!(
                "课程 {} 批量选课: 新增 {}，跳过 {}",
                course_id, result.created_count, result.skipped_count
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                result,
                "Bulk enrollment completed",
            )))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::EnrollmentFailed,
            "Bulk enrollment failed",
            &e,
        ))),
    }
}
